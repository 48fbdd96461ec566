use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};

use crate::error::{AutomationError, AutomationResult, SchedulerError};
use crate::worker::scheduler::PipelineScheduler;

/// Owns every flow scheduler running on a node and their shared shutdown.
#[derive(Clone)]
pub struct FlowController {
    schedulers: Vec<Arc<PipelineScheduler>>,
    cancellation_token: CancellationToken,
}

impl FlowController {
    /// new - Create a new FlowController
    /// # Arguments
    /// * `schedulers` - The flows to run, usually built with [`build_all`](crate::worker::flows::build_all)
    /// * `cancellation_token` - Token for coordinated shutdown
    pub fn new(schedulers: Vec<PipelineScheduler>, cancellation_token: CancellationToken) -> Self {
        Self { schedulers: schedulers.into_iter().map(Arc::new).collect(), cancellation_token }
    }

    pub fn schedulers(&self) -> &[Arc<PipelineScheduler>] {
        &self.schedulers
    }

    /// run - Run every scheduler until shutdown
    /// Each scheduler loop gets its own task and span. Returns once all loops
    /// have stopped; passes already dispatched are left to drain on their own.
    /// A scheduler that refuses to start does not stop the others.
    /// # Errors
    /// * `AutomationError` - The first scheduler that refused to start or whose task panicked
    pub async fn run(&self) -> AutomationResult<()> {
        let mut flow_set = tokio::task::JoinSet::new();
        for scheduler in &self.schedulers {
            let scheduler = scheduler.clone();
            let token = self.cancellation_token.clone();
            let span = info_span!("scheduler", flow = scheduler.name());
            flow_set.spawn(async move { scheduler.start(token).await }.instrument(span));
        }

        info!(flows = self.schedulers.len(), "Flow controller started");
        let mut first_error: Option<AutomationError> = None;
        while let Some(result) = flow_set.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(error = %e, "Flow scheduler exited with an error");
                    first_error.get_or_insert(e.into());
                }
                Err(e) => {
                    error!(error = %e, "Flow scheduler task panicked or was aborted");
                    first_error.get_or_insert(e.into());
                }
            }
        }
        info!("Flow controller stopped");
        first_error.map_or(Ok(()), Err)
    }

    /// shutdown - Trigger a graceful shutdown
    /// Signals every scheduler to stop ticking. In-flight passes are bounded by
    /// their own time limit and are not awaited.
    pub fn shutdown(&self) -> Result<(), SchedulerError> {
        info!(flows = self.schedulers.len(), "Initiating flow controller shutdown");
        self.cancellation_token.cancel();
        let mut first_error = None;
        for scheduler in &self.schedulers {
            if let Err(e) = scheduler.close() {
                warn!(flow = scheduler.name(), error = %e, "Failed to close flow scheduler");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
