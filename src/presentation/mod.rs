// Presentation layer - HTTP surface over the dashboard
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    block_details, force_refresh, get_dashboard, health_check, search_address, stream_dashboard,
    transaction_details,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Compression is done in the response builders, so no CompressionLayer here.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/refresh", post(force_refresh))
        .route("/search", get(search_address))
        .route("/blocks/:number", get(block_details))
        .route("/transactions/:hash", get(transaction_details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::address_panel::AddressPanel;
    use crate::application::controller::{DashboardController, Phase};
    use crate::application::detail_service::DetailService;
    use crate::application::panel::{DataPanel, Panel};
    use crate::application::streaming_service::StreamingDashboardService;
    use crate::application::views::dashboard_views;
    use crate::infrastructure::config::PanelSettings;
    use crate::infrastructure::snapshot_sink::SnapshotSink;
    use crate::test_support::StubSource;
    use serde_json::Value;
    use std::time::Duration;

    struct Server {
        base: String,
        source: Arc<StubSource>,
    }

    async fn start() -> Server {
        let source = Arc::new(StubSource::new());
        let sink = Arc::new(SnapshotSink::new());
        let panels: Vec<Arc<dyn Panel>> = dashboard_views(&PanelSettings::default())
            .unwrap()
            .into_iter()
            .map(|view| {
                Arc::new(DataPanel::new(view, source.clone(), sink.clone())) as Arc<dyn Panel>
            })
            .collect();
        let address = Arc::new(AddressPanel::new(source.clone(), sink.clone()));
        let (controller, handle) =
            DashboardController::new(panels, address, Duration::from_secs(300));
        tokio::spawn(controller.run());

        let mut status = handle.watch_status();
        status.wait_for(|s| s.phase == Phase::Ready).await.unwrap();

        let state = Arc::new(AppState {
            streaming_service: StreamingDashboardService::new(sink.clone(), handle.watch_status()),
            detail_service: DetailService::new(source.clone()),
            controller: handle,
            sink,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        Server {
            base: format!("http://{}", addr),
            source,
        }
    }

    #[tokio::test]
    async fn test_dashboard_snapshot_lists_every_panel() {
        let server = start().await;
        let response = reqwest::get(format!("{}/dashboard", server.base)).await.unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["phase"], "ready");
        let panels = body["panels"].as_array().unwrap();
        assert_eq!(panels.len(), 12);
        assert!(panels.iter().all(|p| p["body"]["type"] != "loading"));

        let states = body["panel_states"].as_array().unwrap();
        assert_eq!(states.len(), 13);
        assert!(states[..12].iter().all(|s| s["state"] == "loaded"));
        assert_eq!(states[12]["element"], "address-details");
        assert_eq!(states[12]["state"], "idle");
    }

    #[tokio::test]
    async fn test_blank_search_is_bad_request() {
        let server = start().await;
        let response = reqwest::get(format!("{}/search?address=%20%20", server.base))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(server.source.calls_named("address_info"), 0);
    }

    #[tokio::test]
    async fn test_search_is_accepted_with_trimmed_address() {
        let server = start().await;
        let response = reqwest::get(format!("{}/search?address=%20bc1qxyz%20", server.base))
            .await
            .unwrap();
        assert_eq!(response.status(), 202);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["address"], "bc1qxyz");
    }

    #[tokio::test]
    async fn test_refresh_is_accepted() {
        let server = start().await;
        let response = reqwest::Client::new()
            .post(format!("{}/refresh", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 202);
    }

    #[tokio::test]
    async fn test_block_detail_route() {
        let server = start().await;
        let body: Value = reqwest::get(format!("{}/blocks/800000", server.base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["origin"], "live");
        assert_eq!(body["record"]["block_number"], 800000);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = start().await;
        let text = reqwest::get(format!("{}/healthz", server.base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }
}
