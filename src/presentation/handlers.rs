// HTTP request handlers
use crate::application::controller::{CommandError, CycleReport, PanelStatus};
use crate::domain::error::UserInputError;
use crate::domain::panel::Origin;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::snapshot_sink::RenderedPanel;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub address: Option<String>,
}

#[derive(Serialize)]
struct DashboardSnapshot {
    phase: &'static str,
    completed_cycles: u64,
    error: Option<String>,
    last_cycle: Option<CycleReport>,
    panel_states: Vec<PanelStatus>,
    panels: Vec<RenderedPanel>,
}

#[derive(Serialize)]
struct Accepted {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

#[derive(Serialize)]
struct DetailBody<T> {
    origin: &'static str,
    record: T,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn respond_error(status: StatusCode, message: String, headers: &HeaderMap) -> Response {
    respond(status, &ErrorBody { error: message }, headers).await
}

fn command_status(e: &CommandError) -> StatusCode {
    match e {
        CommandError::Input(_) => StatusCode::BAD_REQUEST,
        CommandError::Stopped => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn detail<T>(record: T, origin: Origin) -> DetailBody<T> {
    DetailBody {
        origin: origin.as_str(),
        record,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Last painted state of every panel
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let status = state.controller.status();
    let snapshot = DashboardSnapshot {
        phase: status.phase.as_str(),
        completed_cycles: status.completed_cycles,
        error: status.error,
        last_cycle: status.last_cycle,
        panel_states: state.controller.panel_states(),
        panels: state.sink.snapshot(),
    };
    respond(StatusCode::OK, &snapshot, &headers).await
}

/// Snapshot followed by live panel updates, one length-prefixed frame each
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.streaming_service.stream_dashboard();
    stream_from_receiver(rx, accepts_brotli(&headers))
}

pub async fn force_refresh(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.controller.refresh().await {
        Ok(()) => {
            let body = Accepted {
                status: "refreshing",
                address: None,
            };
            respond(StatusCode::ACCEPTED, &body, &headers).await
        }
        Err(e) => respond_error(command_status(&e), e.to_string(), &headers).await,
    }
}

pub async fn search_address(
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let input = query.address.unwrap_or_default();
    match state.controller.search(&input).await {
        Ok(()) => {
            let body = Accepted {
                status: "searching",
                address: Some(input.trim().to_string()),
            };
            respond(StatusCode::ACCEPTED, &body, &headers).await
        }
        Err(CommandError::Input(UserInputError::EmptyQuery)) => {
            respond_error(
                StatusCode::BAD_REQUEST,
                "Please enter a Bitcoin address.".to_string(),
                &headers,
            )
            .await
        }
        Err(e) => respond_error(command_status(&e), e.to_string(), &headers).await,
    }
}

pub async fn block_details(
    Path(number): Path<u64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.detail_service.block_details(number).await {
        Ok(found) => respond(StatusCode::OK, &detail(found.record, found.origin), &headers).await,
        Err(e) => {
            tracing::error!(number, error = %e, "Block detail lookup failed");
            respond_error(StatusCode::BAD_GATEWAY, e.to_string(), &headers).await
        }
    }
}

pub async fn transaction_details(
    Path(hash): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.detail_service.transaction_details(&hash).await {
        Ok(found) => respond(StatusCode::OK, &detail(found.record, found.origin), &headers).await,
        Err(e) => {
            tracing::error!(%hash, error = %e, "Transaction detail lookup failed");
            respond_error(StatusCode::BAD_GATEWAY, e.to_string(), &headers).await
        }
    }
}
