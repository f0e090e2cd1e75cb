// Port to the analytics backend
use crate::domain::query::Query;
use crate::domain::records::Record;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, body read errors.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed {query} payload: {reason}")]
    Malformed { query: &'static str, reason: String },

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait QueryService: Send + Sync {
    /// Run one catalog query against the live backend.
    async fn query(&self, query: &Query) -> Result<Record, TransportError>;
}

/// Stand-in data used whenever the backend cannot answer.
pub trait FallbackGenerator: Send + Sync {
    fn generate(&self, query: &Query) -> Record;
}
