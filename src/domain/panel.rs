// Panel view model: typed configuration and the frames handed to the sink
use super::error::{ConfigError, RenderInputError};
use super::format::Formatter;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Live,
    Fallback,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Live => "live",
            Origin::Fallback => "fallback",
        }
    }
}

/// Identifier of the visual element a panel paints into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Area,
    Line,
    Bar,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Area => "area",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub name: String,
    pub color: String,
}

impl SeriesStyle {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Fixed visual options of one chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub height: u32,
    pub subtitle: Option<String>,
    pub series: Vec<SeriesStyle>,
    pub axis: Formatter,
    pub tooltip: Formatter,
}

impl ChartOptions {
    pub fn new(
        title: &str,
        kind: ChartKind,
        height: u32,
        series: Vec<SeriesStyle>,
        axis: Formatter,
        tooltip: Formatter,
    ) -> Result<Self, ConfigError> {
        if series.is_empty() {
            return Err(ConfigError::NoSeries(title.to_string()));
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight(title.to_string()));
        }
        if kind == ChartKind::Pie && series.len() != 1 {
            return Err(ConfigError::PieSeries(title.to_string()));
        }
        for (index, style) in series.iter().enumerate() {
            if style.name.trim().is_empty() {
                return Err(ConfigError::UnnamedSeries {
                    chart: title.to_string(),
                    index,
                });
            }
            if !is_hex_color(&style.color) {
                return Err(ConfigError::InvalidColor {
                    chart: title.to_string(),
                    color: style.color.clone(),
                });
            }
        }

        Ok(Self {
            kind,
            height,
            subtitle: None,
            series,
            axis,
            tooltip,
        })
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    /// Pair categories with one value vector per configured series.
    pub fn frame(
        &self,
        categories: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<ChartFrame, RenderInputError> {
        if values.len() != self.series.len() {
            return Err(RenderInputError::SeriesCount {
                expected: self.series.len(),
                found: values.len(),
            });
        }
        if categories.is_empty() {
            return Err(RenderInputError::Empty);
        }

        let mut series = Vec::with_capacity(values.len());
        for (style, data) in self.series.iter().zip(values) {
            if data.len() != categories.len() {
                return Err(RenderInputError::LengthMismatch {
                    series: style.name.clone(),
                    labels: categories.len(),
                    values: data.len(),
                });
            }
            series.push(NamedSeries {
                name: style.name.clone(),
                data,
            });
        }

        Ok(ChartFrame {
            categories,
            series,
            axis: self.axis,
            tooltip: self.tooltip,
        })
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone)]
pub enum PanelLayout {
    Chart(ChartOptions),
    Cards,
    List,
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub element: ElementRef,
    pub title: String,
    pub layout: PanelLayout,
}

impl PanelConfig {
    pub fn chart(element: &str, title: &str, options: ChartOptions) -> Self {
        Self {
            element: ElementRef::new(element),
            title: title.to_string(),
            layout: PanelLayout::Chart(options),
        }
    }

    pub fn cards(element: &str, title: &str) -> Self {
        Self {
            element: ElementRef::new(element),
            title: title.to_string(),
            layout: PanelLayout::Cards,
        }
    }

    pub fn list(element: &str, title: &str) -> Self {
        Self {
            element: ElementRef::new(element),
            title: title.to_string(),
            layout: PanelLayout::List,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct ChartFrame {
    pub categories: Vec<String>,
    pub series: Vec<NamedSeries>,
    pub axis: Formatter,
    pub tooltip: Formatter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
}

impl StatCard {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// One clickable row; `key` identifies the block or transaction behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub key: String,
    pub cells: Vec<String>,
    pub highlight: bool,
}

#[derive(Debug, Clone)]
pub enum FrameBody {
    Loading,
    Chart(ChartFrame),
    Cards(Vec<StatCard>),
    Rows(Vec<ListRow>),
    Empty(String),
    Failed(String),
}

/// Complete input for one paint of a panel's element.
#[derive(Debug, Clone)]
pub struct PanelFrame {
    pub body: FrameBody,
    pub origin: Option<Origin>,
}

impl PanelFrame {
    pub fn loading() -> Self {
        Self {
            body: FrameBody::Loading,
            origin: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            body: FrameBody::Failed(message.into()),
            origin: None,
        }
    }

    pub fn sourced(body: FrameBody, origin: Origin) -> Self {
        Self {
            body,
            origin: Some(origin),
        }
    }
}
