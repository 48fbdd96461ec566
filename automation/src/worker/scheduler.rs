use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::SchedulerError;
use crate::worker::observer::Observer;

/// Runs one flow on a fixed interval until cancelled.
///
/// Every tick dispatches a pass on its own task and goes straight back to
/// waiting. Passes are not awaited, so a slow pass may overlap the next one;
/// each is bounded by the observer's time limit.
pub struct PipelineScheduler {
    observer: Arc<Observer>,
    interval: Duration,
    running: Mutex<Option<CancellationToken>>,
}

impl PipelineScheduler {
    /// `interval` must be non-zero.
    pub fn new(observer: Arc<Observer>, interval: Duration) -> Self {
        Self { observer, interval, running: Mutex::new(None) }
    }

    pub fn name(&self) -> &'static str {
        self.observer.name()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn observer(&self) -> &Arc<Observer> {
        &self.observer
    }

    /// Ticks until `parent` is cancelled or [`close`](Self::close) is called.
    ///
    /// The first pass runs one full interval after start. Returns
    /// [`SchedulerError::AlreadyRunning`] if a previous start is still live.
    pub async fn start(&self, parent: CancellationToken) -> Result<(), SchedulerError> {
        let token = {
            let mut running = self.running.lock().map_err(|e| SchedulerError::MutexPoisonError(e.to_string()))?;
            if running.as_ref().is_some_and(|token| !token.is_cancelled()) {
                return Err(SchedulerError::AlreadyRunning(self.name().to_string()));
            }
            let token = parent.child_token();
            *running = Some(token.clone());
            token
        };
        // Cancels the run on every exit path, including an aborted task, so
        // the slot never holds a live token nobody is ticking.
        let _guard = token.clone().drop_guard();

        info!(flow = self.name(), interval = ?self.interval, "Starting flow scheduler");
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => self.dispatch(),
            }
        }

        // A cancelled token left in the slot belongs to this run. A live one
        // means a newer start has already taken over.
        let mut running = self.running.lock().map_err(|e| SchedulerError::MutexPoisonError(e.to_string()))?;
        if running.as_ref().is_some_and(|token| token.is_cancelled()) {
            *running = None;
        }
        info!(flow = self.name(), "Flow scheduler stopped");
        Ok(())
    }

    /// Stops a running scheduler. Calling it again, or before any start, does nothing.
    pub fn close(&self) -> Result<(), SchedulerError> {
        let running = self.running.lock().map_err(|e| SchedulerError::MutexPoisonError(e.to_string()))?;
        if let Some(token) = running.as_ref() {
            token.cancel();
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().map(|running| running.as_ref().is_some_and(|token| !token.is_cancelled())).unwrap_or(false)
    }

    fn dispatch(&self) {
        let observer = self.observer.clone();
        debug!(flow = observer.name(), "Dispatching pipeline pass");
        tokio::spawn(async move {
            if let Err(e) = observer.process().await {
                error!(flow = observer.name(), error = %e, "Pipeline pass failed");
            }
        });
    }
}
