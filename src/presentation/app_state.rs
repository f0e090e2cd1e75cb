// Application state for HTTP handlers
use crate::application::controller::ControllerHandle;
use crate::application::detail_service::DetailService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::snapshot_sink::SnapshotSink;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: ControllerHandle,
    pub sink: Arc<SnapshotSink>,
    pub streaming_service: StreamingDashboardService,
    pub detail_service: DetailService,
}
