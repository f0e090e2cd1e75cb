// Dashboard controller - initial load, periodic refresh, search
use crate::application::address_panel::AddressSearch;
use crate::application::panel::{Panel, PanelOutcome};
use crate::domain::error::UserInputError;
use crate::domain::panel::{ElementRef, PanelState};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Ready,
    Refreshing,
    Stopped,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Initializing => "initializing",
            Phase::Ready => "ready",
            Phase::Refreshing => "refreshing",
            Phase::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Startup,
    Timer,
    Manual,
}

/// Outcome of one fan-out over every panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub trigger: Trigger,
    pub loaded: usize,
    pub superseded: usize,
    pub failed: Vec<ElementRef>,
    /// Panel tasks that panicked or were cancelled.
    pub aborted: usize,
}

impl CycleReport {
    fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            loaded: 0,
            superseded: 0,
            failed: Vec::new(),
            aborted: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerStatus {
    pub phase: Phase,
    pub completed_cycles: u64,
    pub last_cycle: Option<CycleReport>,
    /// Set only when the initial load could not bring up a single panel.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelStatus {
    pub element: ElementRef,
    pub state: PanelState,
}

#[derive(Debug)]
enum Command {
    Refresh,
    Search(String),
    Shutdown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Input(#[from] UserInputError),

    #[error("dashboard controller is not running")]
    Stopped,
}

/// Cloneable front door to a running controller.
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<ControllerStatus>,
    panels: Vec<Arc<dyn Panel>>,
    address: Arc<dyn AddressSearch>,
}

impl ControllerHandle {
    pub async fn refresh(&self) -> Result<(), CommandError> {
        self.send(Command::Refresh).await
    }

    /// Submit an address search. Blank input is rejected before anything is fetched.
    pub async fn search(&self, input: &str) -> Result<(), CommandError> {
        let address = input.trim();
        if address.is_empty() {
            return Err(UserInputError::EmptyQuery.into());
        }
        self.send(Command::Search(address.to_string())).await
    }

    pub async fn shutdown(&self) -> Result<(), CommandError> {
        self.send(Command::Shutdown).await
    }

    pub fn status(&self) -> ControllerStatus {
        self.status.borrow().clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<ControllerStatus> {
        self.status.clone()
    }

    /// Current state of every dashboard panel, then the address panel.
    pub fn panel_states(&self) -> Vec<PanelStatus> {
        self.panels
            .iter()
            .map(|panel| PanelStatus {
                element: panel.element().clone(),
                state: panel.state(),
            })
            .chain(std::iter::once(PanelStatus {
                element: self.address.element().clone(),
                state: self.address.state(),
            }))
            .collect()
    }

    async fn send(&self, command: Command) -> Result<(), CommandError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CommandError::Stopped)
    }
}

pub struct DashboardController {
    panels: Vec<Arc<dyn Panel>>,
    address: Arc<dyn AddressSearch>,
    interval: Duration,
    commands: mpsc::Receiver<Command>,
    status: watch::Sender<ControllerStatus>,
}

impl DashboardController {
    pub fn new(
        panels: Vec<Arc<dyn Panel>>,
        address: Arc<dyn AddressSearch>,
        interval: Duration,
    ) -> (Self, ControllerHandle) {
        let interval = if interval > MAX_REFRESH_INTERVAL {
            tracing::warn!(
                requested_secs = interval.as_secs(),
                max_secs = MAX_REFRESH_INTERVAL.as_secs(),
                "Refresh interval too long, clamping"
            );
            MAX_REFRESH_INTERVAL
        } else {
            interval
        };
        let (commands_tx, commands) = mpsc::channel(32);
        let (status, status_rx) = watch::channel(ControllerStatus {
            phase: Phase::Uninitialized,
            completed_cycles: 0,
            last_cycle: None,
            error: None,
        });

        let handle = ControllerHandle {
            commands: commands_tx,
            status: status_rx,
            panels: panels.clone(),
            address: address.clone(),
        };
        let controller = Self {
            panels,
            address,
            interval,
            commands,
            status,
        };
        (controller, handle)
    }

    /// Run until shutdown is requested or every handle is dropped.
    pub async fn run(mut self) {
        self.set_phase(Phase::Initializing);
        tracing::info!(panels = self.panels.len(), "Initializing dashboard");

        let report = fan_out(self.panels.clone(), Trigger::Startup).await;
        let error = (!self.panels.is_empty() && report.loaded == 0)
            .then(|| "Failed to initialize dashboard. No panel could be loaded.".to_string());
        match &error {
            Some(message) => tracing::error!("{}", message),
            None => tracing::info!(
                loaded = report.loaded,
                failed = report.failed.len(),
                "Dashboard initialized"
            ),
        }
        self.status.send_modify(|status| {
            status.phase = Phase::Ready;
            status.completed_cycles += 1;
            status.last_cycle = Some(report);
            status.error = error;
        });

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles: JoinSet<CycleReport> = JoinSet::new();
        let mut searches: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => self.start_cycle(&mut cycles, Trigger::Timer),
                command = self.commands.recv() => match command {
                    Some(Command::Refresh) => self.start_cycle(&mut cycles, Trigger::Manual),
                    Some(Command::Search(address)) => {
                        let panel = self.address.clone();
                        searches.spawn(async move {
                            if let Err(e) = panel.search(&address).await {
                                tracing::error!(%address, error = %e, "Address search failed");
                            }
                        });
                    }
                    Some(Command::Shutdown) | None => break,
                },
                Some(joined) = cycles.join_next() => self.finish_cycle(joined, cycles.is_empty()),
                Some(joined) = searches.join_next() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Address search task aborted");
                    }
                }
            }
        }

        cycles.abort_all();
        searches.abort_all();
        self.set_phase(Phase::Stopped);
        tracing::info!("Dashboard controller stopped");
    }

    fn start_cycle(&self, cycles: &mut JoinSet<CycleReport>, trigger: Trigger) {
        tracing::info!(?trigger, "Refreshing dashboard");
        self.set_phase(Phase::Refreshing);
        cycles.spawn(fan_out(self.panels.clone(), trigger));
    }

    fn finish_cycle(&self, joined: Result<CycleReport, JoinError>, idle: bool) {
        let report = match joined {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Refresh cycle aborted");
                if idle {
                    self.set_phase(Phase::Ready);
                }
                return;
            }
        };

        tracing::info!(
            trigger = ?report.trigger,
            loaded = report.loaded,
            superseded = report.superseded,
            failed = report.failed.len(),
            "Dashboard refreshed"
        );
        self.status.send_modify(|status| {
            status.completed_cycles += 1;
            status.last_cycle = Some(report);
            if idle {
                status.phase = Phase::Ready;
            }
        });
    }

    fn set_phase(&self, phase: Phase) {
        self.status.send_modify(|status| status.phase = phase);
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Initialize,
    Refresh,
}

/// Run one step on every panel at once and wait for all of them. A failing
/// or panicking panel is recorded and never cuts the others short.
async fn fan_out(panels: Vec<Arc<dyn Panel>>, trigger: Trigger) -> CycleReport {
    let step = match trigger {
        Trigger::Startup => Step::Initialize,
        Trigger::Timer | Trigger::Manual => Step::Refresh,
    };

    let mut tasks = JoinSet::new();
    for panel in panels {
        tasks.spawn(async move {
            let result = match step {
                Step::Initialize => panel.initialize().await,
                Step::Refresh => panel.refresh().await,
            };
            (panel.element().clone(), result)
        });
    }

    let mut report = CycleReport::new(trigger);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(PanelOutcome::Loaded))) => report.loaded += 1,
            Ok((_, Ok(PanelOutcome::Superseded))) => report.superseded += 1,
            Ok((element, Err(e))) => {
                tracing::error!(panel = %element, error = %e, "Panel failed to load");
                report.failed.push(element);
            }
            Err(e) => {
                tracing::error!(error = %e, "Panel task aborted");
                report.aborted += 1;
            }
        }
    }
    report.failed.sort();
    report
}
