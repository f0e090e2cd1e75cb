// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::address_panel::AddressPanel;
use crate::application::controller::DashboardController;
use crate::application::data_source::{DataSource, ResilientSource};
use crate::application::detail_service::DetailService;
use crate::application::panel::{DataPanel, Panel};
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::views::dashboard_views;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::mock_data::MockGenerator;
use crate::infrastructure::rest_client::RestQueryService;
use crate::infrastructure::snapshot_sink::SnapshotSink;
use crate::presentation::app_state::AppState;
use crate::presentation::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_dashboard_config()?;
    let addr = config.bind_addr()?;

    // Data source (infrastructure adapters behind the application port)
    let fallback = Arc::new(MockGenerator::new());
    let source: Arc<dyn DataSource> = if config.api.mock_mode {
        tracing::info!("Mock mode enabled, serving generated data");
        Arc::new(ResilientSource::mock(fallback))
    } else {
        tracing::info!(base_url = %config.api.base_url, "Using analytics API");
        Arc::new(ResilientSource::new(
            Arc::new(RestQueryService::new(&config.api.base_url)),
            fallback,
            config.request_timeout(),
        ))
    };

    // Panels paint into the shared snapshot sink
    let sink = Arc::new(SnapshotSink::new());
    let panels: Vec<Arc<dyn Panel>> = dashboard_views(&config.panels)
        .context("invalid panel configuration")?
        .into_iter()
        .map(|view| {
            Arc::new(DataPanel::new(view, source.clone(), sink.clone())) as Arc<dyn Panel>
        })
        .collect();
    let address = Arc::new(AddressPanel::new(source.clone(), sink.clone()));

    let (controller, handle) = DashboardController::new(panels, address, config.refresh_interval());
    let controller_task = tokio::spawn(controller.run());

    let state = Arc::new(AppState {
        controller: handle.clone(),
        sink: sink.clone(),
        streaming_service: StreamingDashboardService::new(sink, handle.watch_status()),
        detail_service: DetailService::new(source),
    });

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Starting chain-dashboard service");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("Shutting down");
    let _ = handle.shutdown().await;
    controller_task.await.context("dashboard controller task failed")?;
    Ok(())
}
