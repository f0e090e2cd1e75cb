// Data source with transparent fallback substitution
use crate::application::query_service::{FallbackGenerator, QueryService, TransportError};
use crate::domain::panel::Origin;
use crate::domain::query::Query;
use crate::domain::records::Record;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Sourced {
    pub record: Record,
    pub origin: Origin,
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Never fails: transport problems resolve to fallback data.
    async fn fetch(&self, query: &Query) -> Sourced;
}

pub struct ResilientSource {
    backend: Option<Arc<dyn QueryService>>,
    fallback: Arc<dyn FallbackGenerator>,
    timeout: Duration,
}

impl ResilientSource {
    pub fn new(
        backend: Arc<dyn QueryService>,
        fallback: Arc<dyn FallbackGenerator>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend: Some(backend),
            fallback,
            timeout,
        }
    }

    /// Serves fallback data only, without touching a backend.
    pub fn mock(fallback: Arc<dyn FallbackGenerator>) -> Self {
        Self {
            backend: None,
            fallback,
            timeout: Duration::ZERO,
        }
    }

    async fn query_live(
        &self,
        backend: &dyn QueryService,
        query: &Query,
    ) -> Result<Record, TransportError> {
        let record = tokio::time::timeout(self.timeout, backend.query(query))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;

        if !record.is_well_formed() {
            return Err(TransportError::Malformed {
                query: query.name(),
                reason: "series lengths disagree with labels".to_string(),
            });
        }
        if let (Some(window), Some(labels)) = (query.window(), record.label_count()) {
            if labels != window.points() {
                tracing::debug!(
                    query = query.name(),
                    requested = window.points(),
                    labels,
                    "Backend returned a different window than requested"
                );
            }
        }
        Ok(record)
    }

    fn substitute(&self, query: &Query) -> Sourced {
        Sourced {
            record: self.fallback.generate(query),
            origin: Origin::Fallback,
        }
    }
}

#[async_trait]
impl DataSource for ResilientSource {
    async fn fetch(&self, query: &Query) -> Sourced {
        let Some(backend) = &self.backend else {
            return self.substitute(query);
        };

        match self.query_live(backend.as_ref(), query).await {
            Ok(record) => Sourced {
                record,
                origin: Origin::Live,
            },
            Err(e) => {
                tracing::warn!(
                    query = query.name(),
                    error = %e,
                    "Backend fetch failed, serving fallback data"
                );
                self.substitute(query)
            }
        }
    }
}
