//! The recurring trigger loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Semaphore};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use pulsehook_core::DispatchResult;
use pulsehook_dispatch::Dispatcher;
use pulsehook_store::JobStore;

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;

/// Trigger loop configuration.
#[derive(Debug, Clone)]
pub struct TriggerLoopConfig {
    /// Time between ticks.
    pub cadence: Duration,

    /// Cap on simultaneous in-flight dispatches within one tick.
    pub max_concurrent_dispatches: usize,
}

impl Default for TriggerLoopConfig {
    fn default() -> Self {
        Self {
            cadence: Duration::from_secs(60),
            max_concurrent_dispatches: 8,
        }
    }
}

/// Observable loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickState {
    /// Waiting for the next tick.
    Idle,
    /// Fetch + evaluate + dispatch in progress.
    Ticking,
}

/// The recurring trigger.
///
/// Each tick fetches a fresh snapshot of jobs, evaluates every schedule
/// against the tick time, and dispatches the due ones. Ticks are
/// serialized: a tick that overruns the cadence causes missed firings to be
/// skipped rather than overlapped.
pub struct TriggerLoop {
    store: Arc<dyn JobStore>,
    dispatcher: Arc<Dispatcher>,
    config: TriggerLoopConfig,
    semaphore: Arc<Semaphore>,
    ticking: AtomicBool,
    ticks: AtomicU64,
    dispatched: AtomicU64,
}

impl TriggerLoop {
    /// Create a new trigger loop.
    pub fn new(
        store: Arc<dyn JobStore>,
        dispatcher: Arc<Dispatcher>,
        config: TriggerLoopConfig,
    ) -> Self {
        let permits = config.max_concurrent_dispatches;
        Self {
            store,
            dispatcher,
            config,
            semaphore: Arc::new(Semaphore::new(permits)),
            ticking: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
        }
    }

    /// Current loop state.
    pub fn state(&self) -> TickState {
        if self.ticking.load(Ordering::SeqCst) {
            TickState::Ticking
        } else {
            TickState::Idle
        }
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Number of dispatches attempted across all ticks.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::SeqCst)
    }

    /// Run one tick at `now`.
    ///
    /// A store failure aborts only this tick: nothing is dispatched and the
    /// next tick starts from a fresh fetch. A job with an invalid schedule
    /// is skipped and logged without disturbing its siblings. All due jobs
    /// are attempted; the returned results carry their outcomes.
    pub async fn tick(&self, now: DateTime<Utc>) -> Vec<DispatchResult> {
        self.ticking.store(true, Ordering::SeqCst);
        self.ticks.fetch_add(1, Ordering::SeqCst);

        let jobs = match self.store.fetch_all().await {
            Ok(jobs) => jobs,
            Err(e) => {
                error!("Job fetch failed, skipping tick: {}", e);
                self.ticking.store(false, Ordering::SeqCst);
                return Vec::new();
            }
        };

        let mut due = Vec::new();
        for job in jobs {
            match pulsehook_schedule::is_due(&job.schedule, now) {
                Ok(true) => due.push(job),
                Ok(false) => {}
                Err(e) => {
                    warn!(job_id = %job.id, "Skipping job with invalid schedule: {}", e);
                }
            }
        }
        debug!(due = due.len(), "Schedules evaluated");

        let results = futures::future::join_all(due.iter().map(|job| async {
            let _permit = self.semaphore.acquire().await.ok();
            self.dispatcher.dispatch(job).await
        }))
        .await;

        for result in &results {
            if result.is_success() {
                info!(
                    job_id = %result.job_id,
                    endpoint = %result.endpoint,
                    "Dispatched: {}", result.outcome
                );
            } else {
                warn!(
                    job_id = %result.job_id,
                    endpoint = %result.endpoint,
                    "Dispatch failed: {}", result.outcome
                );
            }
        }

        self.dispatched
            .fetch_add(results.len() as u64, Ordering::SeqCst);
        self.ticking.store(false, Ordering::SeqCst);
        results
    }

    /// Run until the shutdown broadcast fires.
    ///
    /// The first evaluation happens one cadence after startup. An in-flight
    /// tick is allowed to finish after shutdown is requested; its individual
    /// dispatches are bounded by their own timeouts.
    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.config.cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval firing is immediate; consume it.
        interval.tick().await;

        info!(
            cadence_secs = self.config.cadence.as_secs(),
            max_concurrent = self.config.max_concurrent_dispatches,
            "Trigger loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Trigger loop shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.tick(Utc::now()).await;
                }
            }
        }
    }
}
