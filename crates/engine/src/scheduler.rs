use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::notify::Notifier;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// The unit of work the scheduler runs per tick. Implementations absorb
/// their own operational failures; a cycle never returns an error.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_cycle(&self, first_run: bool);
}

/// Read-only view of the run flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub is_on: bool,
    pub is_running: bool,
    pub is_first_run: bool,
}

/// The run flags plus the interval timer handle, owned exclusively by the
/// scheduler. Everyone else gets `RunStatus` snapshots.
struct RunState {
    on: AtomicBool,
    running: AtomicBool,
    first_run: AtomicBool,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl RunState {
    fn new() -> Self {
        Self {
            on: AtomicBool::new(false),
            running: AtomicBool::new(false),
            first_run: AtomicBool::new(true),
            timer: Mutex::new(None),
        }
    }
}

/// Single-flight scrape scheduler: one cycle immediately on activation,
/// then one per interval. A tick that lands while a cycle is in flight is
/// dropped, never queued.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    state: RunState,
    cycle: Arc<dyn CycleRunner>,
    interval: Duration,
    notifier: Arc<dyn Notifier>,
}

impl Scheduler {
    pub fn new(cycle: Arc<dyn CycleRunner>, interval: Duration, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                state: RunState::new(),
                cycle,
                interval,
                notifier,
            }),
        }
    }

    /// Switches the bot on. No-op when already on.
    pub async fn activate(&self) {
        // The toggle and the timer handle change under one lock so two
        // timers can never coexist.
        let mut timer = self.inner.state.timer.lock().await;
        if self.inner.state.on.swap(true, Ordering::SeqCst) {
            debug!("Activate ignored, scheduler already on");
            return;
        }

        let minutes = self.inner.interval.as_secs() / 60;
        info!("Scheduler activated, one cycle every {} minutes", minutes);
        self.inner
            .notify(&format!("🤖 Signal bot activated. Scraping every {} minutes.", minutes))
            .await;

        let inner = self.inner.clone();
        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.interval);
            // A tick that fires late must not be made up for later.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                // The first tick completes immediately, which is the
                // activation-time cycle.
                ticker.tick().await;
                let inner = inner.clone();
                // Detached, so aborting the timer never cancels a cycle
                // that is already in flight.
                tokio::spawn(async move { inner.tick().await });
            }
        }));
    }

    /// Switches the bot off and stops the timer. A cycle already in flight
    /// keeps running to completion. No-op when already off.
    pub async fn deactivate(&self) {
        let mut timer = self.inner.state.timer.lock().await;
        if !self.inner.state.on.swap(false, Ordering::SeqCst) {
            debug!("Deactivate ignored, scheduler already off");
            return;
        }

        if let Some(handle) = timer.take() {
            handle.abort();
        }

        info!("Scheduler deactivated, in-flight cycle (if any) runs to completion");
        self.inner.notify("⛔ Signal bot stopped.").await;
    }

    /// Runs one cycle now unless one is already in flight.
    pub async fn tick(&self) {
        self.inner.tick().await;
    }

    pub fn status(&self) -> RunStatus {
        let state = &self.inner.state;
        RunStatus {
            is_on: state.on.load(Ordering::SeqCst),
            is_running: state.running.load(Ordering::SeqCst),
            is_first_run: state.first_run.load(Ordering::SeqCst),
        }
    }

    /// Parks until no cycle is in flight. Used on shutdown.
    pub async fn wait_until_idle(&self) {
        while self.status().is_running {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }
}

impl SchedulerInner {
    async fn tick(&self) {
        if self
            .state
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Tick skipped, a scrape cycle is already in flight");
            return;
        }

        let first_run = self.state.first_run.load(Ordering::SeqCst);

        // Clears the busy flag and latches first_run on every exit path,
        // panics included.
        let _finalizer = CycleFinalizer { state: &self.state };
        self.cycle.run_cycle(first_run).await;
    }

    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            warn!("Failed to send scheduler notification: {}", e);
        }
    }
}

struct CycleFinalizer<'a> {
    state: &'a RunState,
}

impl Drop for CycleFinalizer<'_> {
    fn drop(&mut self) {
        self.state.running.store(false, Ordering::SeqCst);
        self.state.first_run.store(false, Ordering::SeqCst);
    }
}
