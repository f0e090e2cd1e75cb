// Streaming dashboard service - snapshot first, then live panel updates
use crate::application::controller::ControllerStatus;
use crate::infrastructure::snapshot_sink::{RenderedPanel, SnapshotSink};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

const STREAM_BUFFER: usize = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Snapshot {
        panels: Vec<RenderedPanel>,
    },
    Update {
        panel: RenderedPanel,
    },
    Status {
        phase: &'static str,
        completed_cycles: u64,
        error: Option<String>,
    },
    /// The client fell behind and missed `skipped` updates.
    Lagged {
        skipped: u64,
    },
}

impl StreamMessage {
    fn status(status: ControllerStatus) -> Self {
        StreamMessage::Status {
            phase: status.phase.as_str(),
            completed_cycles: status.completed_cycles,
            error: status.error,
        }
    }
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    sink: Arc<SnapshotSink>,
    status: watch::Receiver<ControllerStatus>,
}

impl StreamingDashboardService {
    pub fn new(sink: Arc<SnapshotSink>, status: watch::Receiver<ControllerStatus>) -> Self {
        Self { sink, status }
    }

    pub fn stream_dashboard(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        // Subscribe before the snapshot so no paint falls in between.
        let updates = BroadcastStream::new(self.sink.subscribe()).map(|item| match item {
            Ok(panel) => StreamMessage::Update { panel },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => StreamMessage::Lagged { skipped },
        });
        let status = WatchStream::new(self.status.clone()).map(StreamMessage::status);
        let snapshot = StreamMessage::Snapshot {
            panels: self.sink.snapshot(),
        };

        tokio::spawn(async move {
            if tx.send(snapshot).await.is_err() {
                return;
            }

            let messages = updates.merge(status);
            tokio::pin!(messages);
            while let Some(msg) = messages.next().await {
                if tx.send(msg).await.is_err() {
                    tracing::debug!("Dashboard stream client disconnected");
                    break;
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::controller::Phase;
    use crate::application::render_sink::RenderSink;
    use crate::domain::panel::{PanelConfig, PanelFrame};

    fn ready_status() -> ControllerStatus {
        ControllerStatus {
            phase: Phase::Ready,
            completed_cycles: 1,
            last_cycle: None,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_stream_starts_with_snapshot_then_updates() {
        let sink = Arc::new(SnapshotSink::new());
        let handle = sink
            .create(&PanelConfig::cards("summary-stats", "Summary"), &PanelFrame::loading())
            .unwrap();
        let (_status_tx, status_rx) = watch::channel(ready_status());
        let service = StreamingDashboardService::new(sink.clone(), status_rx);

        let mut rx = service.stream_dashboard();
        match rx.recv().await.unwrap() {
            StreamMessage::Snapshot { panels } => {
                assert_eq!(panels.len(), 1);
                assert_eq!(panels[0].element, "summary-stats");
            }
            other => panic!("expected snapshot first, got {:?}", other),
        }

        sink.update(&handle, &PanelFrame::failed("Failed to load summary."));
        loop {
            match rx.recv().await.unwrap() {
                StreamMessage::Update { panel } => {
                    assert_eq!(panel.revision, 2);
                    break;
                }
                StreamMessage::Status { phase, .. } => assert_eq!(phase, "ready"),
                other => panic!("unexpected message {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_status_changes_are_streamed() {
        let sink = Arc::new(SnapshotSink::new());
        let (status_tx, status_rx) = watch::channel(ready_status());
        let service = StreamingDashboardService::new(sink, status_rx);

        let mut rx = service.stream_dashboard();
        assert!(matches!(rx.recv().await.unwrap(), StreamMessage::Snapshot { .. }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            StreamMessage::Status { completed_cycles: 1, .. }
        ));

        status_tx.send_modify(|s| {
            s.phase = Phase::Refreshing;
        });
        match rx.recv().await.unwrap() {
            StreamMessage::Status { phase, .. } => assert_eq!(phase, "refreshing"),
            other => panic!("unexpected message {:?}", other),
        }
    }
}
