// Error types shared across the dashboard
use thiserror::Error;

/// Data that reached a panel but cannot be painted.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderInputError {
    #[error("expected {expected} data, got {found}")]
    UnexpectedRecord {
        expected: &'static str,
        found: &'static str,
    },

    #[error("no data points to display")]
    Empty,

    #[error("series '{series}' has {values} values for {labels} labels")]
    LengthMismatch {
        series: String,
        labels: usize,
        values: usize,
    },

    #[error("chart expects {expected} series, got {found}")]
    SeriesCount { expected: usize, found: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserInputError {
    #[error("search query is empty")]
    EmptyQuery,
}

/// Invalid typed panel configuration, raised once at construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chart '{0}' has no series")]
    NoSeries(String),

    #[error("chart '{chart}' series #{index} has an empty name")]
    UnnamedSeries { chart: String, index: usize },

    #[error("chart '{chart}' color '{color}' is not a #rrggbb value")]
    InvalidColor { chart: String, color: String },

    #[error("chart '{0}' must have a non-zero height")]
    ZeroHeight(String),

    #[error("pie chart '{0}' takes exactly one series")]
    PieSeries(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("element '{0}' is already bound to a panel")]
    DuplicateElement(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PanelError {
    #[error(transparent)]
    Render(#[from] RenderInputError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
