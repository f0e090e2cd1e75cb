// In-memory render target: keeps the last painted state of every panel
use crate::application::render_sink::RenderSink;
use crate::domain::error::SinkError;
use crate::domain::panel::{
    ChartFrame, ElementRef, FrameBody, ListRow, PanelConfig, PanelFrame, PanelLayout, StatCard,
};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use tokio::sync::broadcast;

const UPDATE_CAPACITY: usize = 64;
const AXIS_TICKS: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedSeries {
    pub name: String,
    pub color: String,
    pub data: Vec<f64>,
    /// Tooltip text for each point.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedBody {
    Loading,
    Chart {
        chart_type: &'static str,
        height: u32,
        subtitle: Option<String>,
        categories: Vec<String>,
        axis_ticks: Vec<String>,
        series: Vec<RenderedSeries>,
    },
    Cards {
        cards: Vec<StatCard>,
    },
    Rows {
        rows: Vec<ListRow>,
    },
    Empty {
        message: String,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedPanel {
    pub element: String,
    pub title: String,
    /// Bumped on every paint.
    pub revision: u64,
    pub origin: Option<&'static str>,
    pub body: RenderedBody,
}

struct Entry {
    config: PanelConfig,
    rendered: RenderedPanel,
}

pub struct SnapshotSink {
    entries: Mutex<Vec<Entry>>,
    updates: broadcast::Sender<RenderedPanel>,
}

impl Default for SnapshotSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSink {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            entries: Mutex::new(Vec::new()),
            updates,
        }
    }

    /// Panels in creation order.
    pub fn snapshot(&self) -> Vec<RenderedPanel> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|entry| entry.rendered.clone())
            .collect()
    }

    #[cfg(test)]
    pub fn panel(&self, element: &str) -> Option<RenderedPanel> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|entry| entry.config.element.to_string() == element)
            .map(|entry| entry.rendered.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RenderedPanel> {
        self.updates.subscribe()
    }

    fn publish(&self, panel: RenderedPanel) {
        // No subscribers is fine
        let _ = self.updates.send(panel);
    }
}

impl RenderSink for SnapshotSink {
    type Handle = ElementRef;

    fn create(&self, config: &PanelConfig, frame: &PanelFrame) -> Result<ElementRef, SinkError> {
        let rendered = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if entries.iter().any(|e| e.config.element == config.element) {
                return Err(SinkError::DuplicateElement(config.element.to_string()));
            }
            let rendered = render(config, frame, 1);
            entries.push(Entry {
                config: config.clone(),
                rendered: rendered.clone(),
            });
            rendered
        };

        tracing::debug!(panel = %config.element, "Created panel element");
        self.publish(rendered);
        Ok(config.element.clone())
    }

    fn update(&self, handle: &ElementRef, frame: &PanelFrame) {
        let rendered = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(entry) = entries.iter_mut().find(|e| &e.config.element == handle) else {
                tracing::warn!(panel = %handle, "Update for unknown panel element");
                return;
            };
            entry.rendered = render(&entry.config, frame, entry.rendered.revision + 1);
            entry.rendered.clone()
        };
        self.publish(rendered);
    }
}

fn render(config: &PanelConfig, frame: &PanelFrame, revision: u64) -> RenderedPanel {
    let body = match &frame.body {
        FrameBody::Loading => RenderedBody::Loading,
        FrameBody::Chart(chart) => render_chart(config, chart),
        FrameBody::Cards(cards) => RenderedBody::Cards {
            cards: cards.clone(),
        },
        FrameBody::Rows(rows) => RenderedBody::Rows { rows: rows.clone() },
        FrameBody::Empty(message) => RenderedBody::Empty {
            message: message.clone(),
        },
        FrameBody::Failed(message) => RenderedBody::Failed {
            message: message.clone(),
        },
    };

    RenderedPanel {
        element: config.element.to_string(),
        title: config.title.clone(),
        revision,
        origin: frame.origin.map(|origin| origin.as_str()),
        body,
    }
}

fn render_chart(config: &PanelConfig, chart: &ChartFrame) -> RenderedBody {
    let PanelLayout::Chart(options) = &config.layout else {
        return RenderedBody::Failed {
            message: format!("{} is not configured as a chart", config.title),
        };
    };

    let series = chart
        .series
        .iter()
        .zip(&options.series)
        .map(|(data, style)| RenderedSeries {
            name: data.name.clone(),
            color: style.color.clone(),
            data: data.data.clone(),
            labels: data.data.iter().map(|v| (chart.tooltip)(*v)).collect(),
        })
        .collect();

    RenderedBody::Chart {
        chart_type: options.kind.as_str(),
        height: options.height,
        subtitle: options.subtitle.clone(),
        categories: chart.categories.clone(),
        axis_ticks: axis_ticks(chart),
        series,
    }
}

/// Evenly spaced ticks from zero to the largest value, formatted for the axis.
fn axis_ticks(chart: &ChartFrame) -> Vec<String> {
    let max = chart
        .series
        .iter()
        .flat_map(|s| s.data.iter().copied())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![(chart.axis)(0.0)];
    }

    let step = max / (AXIS_TICKS - 1) as f64;
    (0..AXIS_TICKS)
        .map(|i| (chart.axis)(step * i as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::format::{format_compact, format_fee_rate};
    use crate::domain::panel::{ChartKind, ChartOptions, Origin, SeriesStyle};

    fn chart_config() -> PanelConfig {
        let options = ChartOptions::new(
            "Transaction Fees",
            ChartKind::Area,
            300,
            vec![SeriesStyle::new("Average Fee", "#f7931a")],
            format_compact,
            format_fee_rate,
        )
        .unwrap();
        PanelConfig::chart("tx-fee-chart", "Transaction Fees", options)
    }

    fn chart_frame(config: &PanelConfig, values: Vec<f64>) -> PanelFrame {
        let PanelLayout::Chart(options) = &config.layout else {
            unreachable!()
        };
        let categories = (0..values.len()).map(|i| format!("day {}", i)).collect();
        let chart = options.frame(categories, vec![values]).unwrap();
        PanelFrame::sourced(FrameBody::Chart(chart), Origin::Live)
    }

    #[test]
    fn test_create_then_update_bumps_revision() {
        let sink = SnapshotSink::new();
        let config = chart_config();

        let handle = sink.create(&config, &PanelFrame::loading()).unwrap();
        let first = sink.panel("tx-fee-chart").unwrap();
        assert_eq!(first.revision, 1);
        assert_eq!(first.body, RenderedBody::Loading);
        assert_eq!(first.origin, None);

        sink.update(&handle, &chart_frame(&config, vec![10.0, 20.0]));
        let second = sink.panel("tx-fee-chart").unwrap();
        assert_eq!(second.revision, 2);
        assert_eq!(second.origin, Some("live"));
        match second.body {
            RenderedBody::Chart {
                chart_type,
                series,
                axis_ticks,
                ..
            } => {
                assert_eq!(chart_type, "area");
                assert_eq!(series[0].color, "#f7931a");
                assert_eq!(series[0].labels.len(), 2);
                assert_eq!(axis_ticks.len(), AXIS_TICKS);
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert_eq!(sink.snapshot().len(), 1);
    }

    #[test]
    fn test_duplicate_element_is_rejected() {
        let sink = SnapshotSink::new();
        let config = chart_config();
        sink.create(&config, &PanelFrame::loading()).unwrap();

        let err = sink.create(&config, &PanelFrame::loading()).unwrap_err();
        assert_eq!(err, SinkError::DuplicateElement("tx-fee-chart".to_string()));
    }

    #[test]
    fn test_snapshot_keeps_creation_order() {
        let sink = SnapshotSink::new();
        for element in ["summary-stats", "recent-blocks", "mempool-stats"] {
            sink.create(&PanelConfig::cards(element, element), &PanelFrame::loading())
                .unwrap();
        }
        let order: Vec<_> = sink.snapshot().into_iter().map(|p| p.element).collect();
        assert_eq!(order, vec!["summary-stats", "recent-blocks", "mempool-stats"]);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_paint() {
        let sink = SnapshotSink::new();
        let mut updates = sink.subscribe();
        let config = PanelConfig::cards("summary-stats", "Summary");

        let handle = sink.create(&config, &PanelFrame::loading()).unwrap();
        sink.update(&handle, &PanelFrame::failed("Failed to load summary."));

        assert_eq!(updates.recv().await.unwrap().revision, 1);
        let failed = updates.recv().await.unwrap();
        assert_eq!(
            failed.body,
            RenderedBody::Failed {
                message: "Failed to load summary.".to_string()
            }
        );
    }

    #[test]
    fn test_rendered_panel_serializes_with_type_tag() {
        let sink = SnapshotSink::new();
        sink.create(&PanelConfig::list("recent-blocks", "Recent Blocks"), &PanelFrame::loading())
            .unwrap();
        let json = serde_json::to_value(sink.panel("recent-blocks").unwrap()).unwrap();
        assert_eq!(json["body"]["type"], "loading");
        assert_eq!(json["title"], "Recent Blocks");
    }
}
