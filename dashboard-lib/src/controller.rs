//! Dashboard controller: periodic sync, roster polling and the countdown,
//! composed into one snapshot for the presentation layer.
//!
//! Sync and roster calls each run in their own spawned task, so a slow or
//! failing call never delays the other or the next tick. Attempts may
//! overlap. Whichever call resolves last wins, and the write history is
//! ordered by resolution, not dispatch. With a 10-tick cadence and
//! sub-second round trips this reordering is not expected in practice.
//!
//! Stopping the controller cancels the timers but does not abort calls
//! already in flight. Their results are dropped when they resolve.

use crate::backend::{RosterSource, SyncBackend};
use crate::config::PollSettings;
use crate::countdown::Countdown;
use crate::history::WriteHistory;
use crate::scheduler::Scheduler;
use chrono::{DateTime, Utc};
use shared::{Agent, SyncRequest, SyncResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The external services a running dashboard talks to
#[derive(Clone)]
pub struct DashboardBackends {
    pub sync: Arc<dyn SyncBackend>,
    pub roster: Arc<dyn RosterSource>,
}

/// Outcome of the most recent sync attempt, as shown in the status panel
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    /// Nothing dispatched yet
    Starting,
    /// A call is in flight
    Working,
    Completed(SyncResult),
    Failed(String),
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Starting => write!(f, "Starting auto-sync..."),
            SyncStatus::Working => write!(f, "working..."),
            SyncStatus::Completed(result) => write!(f, "{}", result.pretty()),
            SyncStatus::Failed(message) => write!(f, "Error: {}", message),
        }
    }
}

/// Read-only view of a running dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub last_sync: SyncStatus,
    pub write_history: WriteHistory,
    pub agents: Vec<Agent>,
    pub countdown: Countdown,
    /// When the last sync attempt completed, successful or not
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    fn new(settings: &PollSettings) -> Self {
        Self {
            last_sync: SyncStatus::Starting,
            write_history: WriteHistory::with_capacity(settings.history_capacity),
            agents: Vec::new(),
            countdown: Countdown::new(settings.sync_every_ticks),
            last_sync_at: None,
        }
    }

    pub fn seconds_until_next_sync(&self) -> u32 {
        self.countdown.remaining()
    }

    /// `("#1", v1) .. ("#n", vn)` for charting the write history
    pub fn chart_points(&self) -> Vec<(String, i64)> {
        self.write_history
            .to_vec()
            .into_iter()
            .enumerate()
            .map(|(idx, count)| (format!("#{}", idx + 1), count))
            .collect()
    }
}

struct Shared {
    state: watch::Sender<DashboardSnapshot>,
    active: AtomicBool,
}

impl Shared {
    /// Apply `f` unless the controller has been stopped. Returns whether
    /// anything was applied.
    fn apply(&self, f: impl FnOnce(&mut DashboardSnapshot)) -> bool {
        self.state.send_if_modified(|snapshot| {
            if !self.active.load(Ordering::SeqCst) {
                return false;
            }
            f(snapshot);
            true
        })
    }
}

pub struct DashboardController {
    admin_id: String,
    settings: PollSettings,
    backends: DashboardBackends,
    shared: Arc<Shared>,
    scheduler: Scheduler,
}

impl DashboardController {
    /// Start polling for `admin_id`.
    ///
    /// Dispatches one sync and one roster fetch immediately, then both every
    /// `sync_every_ticks` ticks, and moves the countdown every tick. Must be
    /// called from within a tokio runtime.
    pub fn start(
        admin_id: impl Into<String>,
        settings: PollSettings,
        backends: DashboardBackends,
    ) -> Self {
        let admin_id = admin_id.into();
        let (state, _) = watch::channel(DashboardSnapshot::new(&settings));
        let shared = Arc::new(Shared {
            state,
            active: AtomicBool::new(true),
        });

        let mut controller = Self {
            admin_id,
            settings,
            backends,
            shared,
            scheduler: Scheduler::new(),
        };

        info!(
            admin_id = %controller.admin_id,
            period_ms = controller.settings.sync_period().as_millis() as u64,
            mode = controller.settings.sync_mode.as_str(),
            "Starting dashboard"
        );

        controller.refresh();

        let dispatcher = controller.dispatcher();
        controller
            .scheduler
            .every(controller.settings.sync_period(), move || {
                dispatcher.dispatch_sync();
                dispatcher.dispatch_roster();
            });

        let shared = controller.shared.clone();
        controller.scheduler.every(controller.settings.tick_period(), move || {
            shared.apply(|snapshot| snapshot.countdown.tick());
        });

        controller
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Dispatch one sync and one roster fetch now, outside the cadence
    pub fn refresh(&self) {
        if !self.is_active() {
            return;
        }
        let dispatcher = self.dispatcher();
        dispatcher.dispatch_sync();
        dispatcher.dispatch_roster();
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.shared.state.subscribe()
    }

    /// Cancel all timers and freeze state. Calls still in flight resolve
    /// into nothing. Idempotent.
    pub fn stop(&mut self) {
        // Flip the flag under the watch lock so no apply straddles teardown
        let mut was_active = false;
        self.shared.state.send_if_modified(|_| {
            was_active = self.shared.active.swap(false, Ordering::SeqCst);
            false
        });
        self.scheduler.cancel();

        if was_active {
            info!(admin_id = %self.admin_id, "Dashboard stopped");
        }
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            request: SyncRequest {
                admin_id: self.admin_id.clone(),
                mode: self.settings.sync_mode,
            },
            backends: self.backends.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Everything a timer needs to fire off calls
struct Dispatcher {
    request: SyncRequest,
    backends: DashboardBackends,
    shared: Arc<Shared>,
}

impl Dispatcher {
    fn dispatch_sync(&self) {
        self.shared
            .apply(|snapshot| snapshot.last_sync = SyncStatus::Working);

        let request = self.request.clone();
        let backend = self.backends.sync.clone();
        let shared = self.shared.clone();

        tokio::spawn(async move {
            let admin_id = request.admin_id.clone();
            let result = backend.sync(request).await;

            match &result {
                Ok(sync) => debug!(%admin_id, written_count = ?sync.written_count(), "Sync completed"),
                Err(e) => warn!(%admin_id, error = %e, "Sync failed"),
            }

            let applied = shared.apply(|snapshot| {
                match result {
                    Ok(sync) => {
                        if let Some(count) = sync.written_count() {
                            snapshot.write_history.push(count);
                        }
                        snapshot.last_sync = SyncStatus::Completed(sync);
                    }
                    Err(e) => snapshot.last_sync = SyncStatus::Failed(e.to_string()),
                }
                snapshot.countdown.reset();
                snapshot.last_sync_at = Some(Utc::now());
            });

            if !applied {
                debug!(%admin_id, "Discarding sync result that arrived after teardown");
            }
        });
    }

    fn dispatch_roster(&self) {
        let admin_id = self.request.admin_id.clone();
        let source = self.backends.roster.clone();
        let shared = self.shared.clone();

        tokio::spawn(async move {
            match source.fetch_roster(&admin_id).await {
                Ok(agents) => {
                    let count = agents.len();
                    if shared.apply(|snapshot| snapshot.agents = agents) {
                        debug!(%admin_id, agents = count, "Roster updated");
                    } else {
                        debug!(%admin_id, "Discarding roster that arrived after teardown");
                    }
                }
                // Stale roster beats an error banner; log only
                Err(e) => warn!(%admin_id, error = %e, "Roster fetch failed"),
            }
        });
    }
}
