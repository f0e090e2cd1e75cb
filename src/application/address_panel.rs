// Address detail panel driven by the search box
use crate::application::data_source::DataSource;
use crate::application::panel::{PanelOutcome, PanelSlot};
use crate::application::render_sink::RenderSink;
use crate::domain::error::{PanelError, RenderInputError};
use crate::domain::format::{format_btc, format_thousands};
use crate::domain::panel::{ElementRef, FrameBody, PanelConfig, PanelFrame, PanelState, StatCard};
use crate::domain::query::Query;
use crate::domain::records::{AddressInfo, Record};
use async_trait::async_trait;
use std::sync::Arc;

const LOADING: &str = "Loading...";
const LOAD_ERROR: &str = "Error loading data";

#[async_trait]
pub trait AddressSearch: Send + Sync {
    fn element(&self) -> &ElementRef;

    fn state(&self) -> PanelState;

    /// Look up `address` (already trimmed and non-empty) and paint the result.
    async fn search(&self, address: &str) -> Result<PanelOutcome, PanelError>;
}

pub struct AddressPanel<S: RenderSink> {
    source: Arc<dyn DataSource>,
    slot: PanelSlot<S>,
}

impl<S: RenderSink> AddressPanel<S> {
    pub fn new(source: Arc<dyn DataSource>, sink: Arc<S>) -> Self {
        Self {
            source,
            slot: PanelSlot::new(
                PanelConfig::cards("address-details", "Address Details"),
                sink,
            ),
        }
    }

    fn cards(address: &str, balance: &str, transactions: &str, first_seen: &str) -> FrameBody {
        FrameBody::Cards(vec![
            StatCard::new("Address", address),
            StatCard::new("Balance", balance),
            StatCard::new("Transactions", transactions),
            StatCard::new("First Seen", first_seen),
        ])
    }

    fn render(info: &AddressInfo) -> FrameBody {
        Self::cards(
            &info.address,
            &format_btc(info.balance),
            &format_thousands(info.transaction_count),
            &info.first_seen.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
    }
}

#[async_trait]
impl<S: RenderSink> AddressSearch for AddressPanel<S> {
    fn element(&self) -> &ElementRef {
        &self.slot.config().element
    }

    fn state(&self) -> PanelState {
        self.slot.state()
    }

    async fn search(&self, address: &str) -> Result<PanelOutcome, PanelError> {
        let seq = self.slot.begin();
        let placeholder = PanelFrame {
            body: Self::cards(LOADING, LOADING, LOADING, LOADING),
            origin: None,
        };
        self.slot.commit(seq, &placeholder, PanelState::Loading)?;

        let sourced = self
            .source
            .fetch(&Query::AddressInfo(address.to_string()))
            .await;

        let rendered = match &sourced.record {
            Record::Address(info) if !info.address.is_empty() => Ok(Self::render(info)),
            Record::Address(_) => Err(RenderInputError::Empty),
            other => Err(RenderInputError::UnexpectedRecord {
                expected: "address",
                found: other.kind(),
            }),
        };

        let (frame, next) = match &rendered {
            Ok(body) => (
                PanelFrame::sourced(body.clone(), sourced.origin),
                PanelState::Loaded,
            ),
            Err(_) => (
                PanelFrame {
                    body: Self::cards(address, LOAD_ERROR, LOAD_ERROR, LOAD_ERROR),
                    origin: None,
                },
                PanelState::Failed,
            ),
        };

        if !self.slot.commit(seq, &frame, next)? {
            tracing::debug!(address, "Dropping superseded address lookup");
            return Ok(PanelOutcome::Superseded);
        }

        if let Err(e) = rendered {
            tracing::error!(address, error = %e, "Address lookup failed");
            return Err(e.into());
        }
        Ok(PanelOutcome::Loaded)
    }
}
