// REST client for the blockchain analytics API
use crate::application::query_service::{QueryService, TransportError};
use crate::domain::query::Query;
use crate::domain::records::Record;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct RestQueryService {
    base_url: String,
    client: reqwest::Client,
}

impl RestQueryService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn build_url(&self, query: &Query) -> String {
        let mut url = format!("{}/{}", self.base_url, query.endpoint());
        let params = query.params();
        if !params.is_empty() {
            let pairs: Vec<String> = params
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }
}

#[async_trait]
impl QueryService for RestQueryService {
    async fn query(&self, query: &Query) -> Result<Record, TransportError> {
        let url = self.build_url(query);
        tracing::debug!(query = query.name(), %url, "Querying analytics API");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        let payload = response.bytes().await?;
        query
            .decode(&payload)
            .map_err(|e| TransportError::Malformed {
                query: query.name(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query as QueryParams},
        http::StatusCode,
        routing::get,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/api/charts/tx-fees",
                get(|QueryParams(params): QueryParams<HashMap<String, String>>| async move {
                    let days: usize = params["days"].parse().unwrap();
                    Json(json!({
                        "labels": (0..days).map(|d| format!("2024-01-0{}", d + 1)).collect::<Vec<_>>(),
                        "data": vec![1.5; days],
                    }))
                }),
            )
            .route(
                "/api/addresses/:address",
                get(|Path(address): Path<String>| async move {
                    Json(json!({
                        "address": address,
                        "balance": 150_000_000u64,
                        "transaction_count": 12,
                        "first_seen": "2020-01-01T00:00:00Z",
                        "last_seen": "2024-01-01T00:00:00Z",
                        "activity": []
                    }))
                }),
            )
            .route(
                "/api/summary",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route("/api/mempool", get(|| async { Json(json!({"unexpected": true})) }))
    }

    #[test]
    fn test_build_url_encodes_parameters() {
        let service = RestQueryService::new("http://localhost:8123/api/");
        assert_eq!(
            service.build_url(&Query::RecentBlocks { limit: 5 }),
            "http://localhost:8123/api/blocks?limit=5"
        );
        assert_eq!(
            service.build_url(&Query::AddressInfo("bc1q x".to_string())),
            "http://localhost:8123/api/addresses/bc1q%20x"
        );
        assert_eq!(
            service.build_url(&Query::Summary),
            "http://localhost:8123/api/summary"
        );
    }

    #[tokio::test]
    async fn test_series_query_decodes_payload() {
        let base = serve(test_router()).await;
        let service = RestQueryService::new(&base);

        match service.query(&Query::TxFeeHistory { days: 7 }).await.unwrap() {
            Record::Series(series) => {
                assert_eq!(series.labels.len(), 7);
                assert_eq!(series.data, vec![1.5; 7]);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_address_segment_round_trips() {
        let base = serve(test_router()).await;
        let service = RestQueryService::new(&base);

        match service.query(&Query::AddressInfo("bc1q...".to_string())).await.unwrap() {
            Record::Address(info) => {
                assert_eq!(info.address, "bc1q...");
                assert_eq!(info.transaction_count, 12);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let base = serve(test_router()).await;
        let service = RestQueryService::new(&base);

        match service.query(&Query::Summary).await.unwrap_err() {
            TransportError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_shape_is_malformed() {
        let base = serve(test_router()).await;
        let service = RestQueryService::new(&base);

        let err = service.query(&Query::MempoolStats).await.unwrap_err();
        assert!(matches!(err, TransportError::Malformed { query: "mempool_stats", .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = RestQueryService::new(&format!("http://{}/api", addr));
        let err = service.query(&Query::Summary).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
