// Port to the rendering surface that draws panels
use crate::domain::error::SinkError;
use crate::domain::panel::{PanelConfig, PanelFrame};

/// Rendering surface. Calls are synchronous and never suspend.
pub trait RenderSink: Send + Sync + 'static {
    /// Live element owned by exclusively one panel.
    type Handle: Send + Sync;

    /// Create the element described by `config` and paint the first frame.
    fn create(&self, config: &PanelConfig, frame: &PanelFrame) -> Result<Self::Handle, SinkError>;

    /// Repaint an existing element in place, keeping its interaction state.
    fn update(&self, handle: &Self::Handle, frame: &PanelFrame);
}
