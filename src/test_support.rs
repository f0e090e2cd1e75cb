// Test doubles for the data source and rendering sink
use crate::application::data_source::{DataSource, Sourced};
use crate::application::query_service::FallbackGenerator;
use crate::application::render_sink::RenderSink;
use crate::domain::error::SinkError;
use crate::domain::panel::{ElementRef, Origin, PanelConfig, PanelFrame};
use crate::domain::query::Query;
use crate::domain::records::Record;
use crate::infrastructure::mock_data::MockGenerator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::{Notify, oneshot};

/// Answers with canned records, falling back to generated data, and records
/// every query it receives.
#[derive(Default)]
pub struct StubSource {
    records: Mutex<HashMap<Query, Record>>,
    calls: Mutex<Vec<Query>>,
    generator: MockGenerator,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, query: Query, record: Record) -> Self {
        self.set(query, record);
        self
    }

    pub fn set(&self, query: Query, record: Record) {
        self.records.lock().unwrap().insert(query, record);
    }

    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_named(&self, name: &str) -> usize {
        self.calls().iter().filter(|q| q.name() == name).count()
    }
}

#[async_trait]
impl DataSource for StubSource {
    async fn fetch(&self, query: &Query) -> Sourced {
        self.calls.lock().unwrap().push(query.clone());
        let canned = self.records.lock().unwrap().get(query).cloned();
        Sourced {
            record: canned.unwrap_or_else(|| self.generator.generate(query)),
            origin: Origin::Live,
        }
    }
}

/// Holds every fetch open until the test releases it.
#[derive(Default)]
pub struct GatedSource {
    pending: Mutex<HashMap<Query, Vec<Option<oneshot::Sender<Record>>>>>,
    arrived: Notify,
}

impl GatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn wait_for_pending(&self, query: &Query, count: usize) {
        loop {
            let notified = self.arrived.notified();
            let seen = self
                .pending
                .lock()
                .unwrap()
                .get(query)
                .map_or(0, |gates| gates.len());
            if seen >= count {
                return;
            }
            notified.await;
        }
    }

    /// Resolve the `index`-th fetch issued for `query`.
    pub fn release(&self, query: &Query, index: usize, record: Record) {
        let gate = self
            .pending
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(|gates| gates.get_mut(index))
            .and_then(Option::take)
            .expect("no pending fetch at that index");
        let _ = gate.send(record);
    }
}

#[async_trait]
impl DataSource for GatedSource {
    async fn fetch(&self, query: &Query) -> Sourced {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap()
            .entry(query.clone())
            .or_default()
            .push(Some(tx));
        self.arrived.notify_waiters();

        Sourced {
            record: rx.await.expect("gate dropped without release"),
            origin: Origin::Live,
        }
    }
}

/// Keeps every frame painted per element.
#[derive(Default)]
pub struct RecordingSink {
    frames: Mutex<HashMap<ElementRef, Vec<PanelFrame>>>,
    creates: Mutex<HashMap<ElementRef, usize>>,
}

impl RecordingSink {
    pub fn frames(&self, element: &str) -> Vec<PanelFrame> {
        self.frames
            .lock()
            .unwrap()
            .get(&ElementRef::new(element))
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_frame(&self, element: &str) -> Option<PanelFrame> {
        self.frames(element).pop()
    }

    pub fn creates(&self, element: &str) -> usize {
        self.creates
            .lock()
            .unwrap()
            .get(&ElementRef::new(element))
            .copied()
            .unwrap_or(0)
    }
}

impl RenderSink for RecordingSink {
    type Handle = ElementRef;

    fn create(&self, config: &PanelConfig, frame: &PanelFrame) -> Result<ElementRef, SinkError> {
        *self
            .creates
            .lock()
            .unwrap()
            .entry(config.element.clone())
            .or_default() += 1;
        self.update(&config.element, frame);
        Ok(config.element.clone())
    }

    fn update(&self, handle: &ElementRef, frame: &PanelFrame) {
        self.frames
            .lock()
            .unwrap()
            .entry(handle.clone())
            .or_default()
            .push(frame.clone());
    }
}
