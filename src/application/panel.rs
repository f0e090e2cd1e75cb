// Panel contract and the generic fetch-then-render panel
use crate::application::data_source::DataSource;
use crate::application::render_sink::RenderSink;
use crate::domain::error::{PanelError, RenderInputError, SinkError};
use crate::domain::panel::{ElementRef, FrameBody, PanelConfig, PanelFrame, PanelState};
use crate::domain::query::Query;
use crate::domain::records::Record;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOutcome {
    Loaded,
    /// A newer fetch was issued before this one resolved; nothing was painted.
    Superseded,
}

#[async_trait]
pub trait Panel: Send + Sync {
    fn element(&self) -> &ElementRef;

    fn state(&self) -> PanelState;

    /// First fetch and render; creates the visual element.
    async fn initialize(&self) -> Result<PanelOutcome, PanelError>;

    /// Fetch again and update the existing element in place.
    async fn refresh(&self) -> Result<PanelOutcome, PanelError>;
}

/// Maps one record shape to the frame a panel paints.
pub trait PanelView: Send + Sync {
    fn query(&self) -> Query;

    fn config(&self) -> &PanelConfig;

    fn render(&self, record: Record) -> Result<FrameBody, RenderInputError>;
}

/// Element handle plus the sequence guard that keeps late responses from
/// overwriting newer ones.
pub struct PanelSlot<S: RenderSink> {
    config: PanelConfig,
    sink: Arc<S>,
    issued: AtomicU64,
    state: watch::Sender<PanelState>,
    handle: Mutex<Option<S::Handle>>,
}

impl<S: RenderSink> PanelSlot<S> {
    pub fn new(config: PanelConfig, sink: Arc<S>) -> Self {
        let (state, _) = watch::channel(PanelState::Idle);
        Self {
            config,
            sink,
            issued: AtomicU64::new(0),
            state,
            handle: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn state(&self) -> PanelState {
        *self.state.borrow()
    }

    /// Issue a new sequence number; any fetch tagged earlier becomes stale.
    pub fn begin(&self) -> u64 {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(PanelState::Loading);
        seq
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }

    /// Paint `frame` and move to `next` if `seq` is still the latest fetch.
    /// Returns `false` when the frame was dropped as stale.
    pub fn commit(
        &self,
        seq: u64,
        frame: &PanelFrame,
        next: PanelState,
    ) -> Result<bool, SinkError> {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(seq) {
            return Ok(false);
        }

        match handle.as_ref() {
            Some(existing) => self.sink.update(existing, frame),
            None => match self.sink.create(&self.config, frame) {
                Ok(created) => *handle = Some(created),
                Err(e) => {
                    self.state.send_replace(PanelState::Failed);
                    return Err(e);
                }
            },
        }

        if next != PanelState::Loading {
            self.state.send_replace(next);
        }
        Ok(true)
    }

    pub fn failure_text(&self) -> String {
        format!(
            "Failed to load {}. Please try again later.",
            self.config.title.to_lowercase()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    Initial,
    Refresh,
}

/// A panel driven by a [`PanelView`]: fetch through the data source, map the
/// record, paint the result.
pub struct DataPanel<S: RenderSink> {
    view: Box<dyn PanelView>,
    source: Arc<dyn DataSource>,
    slot: PanelSlot<S>,
}

impl<S: RenderSink> DataPanel<S> {
    pub fn new(view: Box<dyn PanelView>, source: Arc<dyn DataSource>, sink: Arc<S>) -> Self {
        let slot = PanelSlot::new(view.config().clone(), sink);
        Self { view, source, slot }
    }

    async fn load(&self, mode: LoadMode) -> Result<PanelOutcome, PanelError> {
        let seq = self.slot.begin();
        if mode == LoadMode::Initial {
            self.slot.commit(seq, &PanelFrame::loading(), PanelState::Loading)?;
        }

        let query = self.view.query();
        let sourced = self.source.fetch(&query).await;

        if !self.slot.is_current(seq) {
            tracing::debug!(panel = %self.element(), seq, "Dropping superseded response");
            return Ok(PanelOutcome::Superseded);
        }

        let (frame, next, result) = match self.view.render(sourced.record) {
            Ok(body) => (
                PanelFrame::sourced(body, sourced.origin),
                PanelState::Loaded,
                Ok(()),
            ),
            Err(e) => (
                PanelFrame::failed(self.slot.failure_text()),
                PanelState::Failed,
                Err(e),
            ),
        };

        if !self.slot.commit(seq, &frame, next)? {
            tracing::debug!(panel = %self.element(), seq, "Dropping superseded response");
            return Ok(PanelOutcome::Superseded);
        }

        result?;
        tracing::debug!(panel = %self.element(), query = query.name(), "Panel painted");
        Ok(PanelOutcome::Loaded)
    }
}

#[async_trait]
impl<S: RenderSink> Panel for DataPanel<S> {
    fn element(&self) -> &ElementRef {
        &self.slot.config().element
    }

    fn state(&self) -> PanelState {
        self.slot.state()
    }

    async fn initialize(&self) -> Result<PanelOutcome, PanelError> {
        self.load(LoadMode::Initial).await
    }

    async fn refresh(&self) -> Result<PanelOutcome, PanelError> {
        self.load(LoadMode::Refresh).await
    }
}
