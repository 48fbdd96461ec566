use std::sync::Arc;

use super::recovery::{new_recovery_final_flow, new_recovery_proposal_flow};
use super::retry::new_retry_flow;
use super::source::EmptySource;
use super::{schedule, FlowDependencies};
use crate::types::params::FlowParams;
use crate::types::Status;
use crate::worker::postprocessors::{EligiblePostProcessor, IneligiblePostProcessor, RetryablePostProcessor};
use crate::worker::preprocessors::{LogProviderPreProcessor, LookupEnabler, PreProcessor, TelemetryPreProcessor};
use crate::worker::scheduler::PipelineScheduler;

pub const LOG_TRIGGER_FLOW: &str = "log_trigger";

/// Checks upkeeps for freshly observed logs. The batch comes from the log
/// provider filter, so the flow itself starts every pass empty.
pub fn new_log_trigger_flow(deps: &FlowDependencies, params: &FlowParams) -> PipelineScheduler {
    schedule(
        LOG_TRIGGER_FLOW,
        Arc::new(EmptySource),
        vec![
            Arc::new(LogProviderPreProcessor::new(deps.log_provider.clone())),
            Arc::new(LookupEnabler::new(params.lookup_enabled)),
            Arc::new(TelemetryPreProcessor::new(deps.telemetry.clone(), Status::CheckPipelineRun)),
        ],
        vec![
            Arc::new(EligiblePostProcessor::new(deps.result_store.clone(), deps.telemetry.clone())),
            Arc::new(RetryablePostProcessor::new(deps.retry_queue.clone())),
            Arc::new(IneligiblePostProcessor::new(deps.state_updater.clone(), deps.telemetry.clone())),
        ],
        deps,
        params,
        params.log_trigger_interval,
    )
}

/// Every flow handling log triggered upkeeps, the retry flow included.
pub struct LogTriggerEligibility {
    pub log_trigger_flow: PipelineScheduler,
    pub retry_flow: PipelineScheduler,
    pub recovery_proposal_flow: PipelineScheduler,
    pub recovery_final_flow: PipelineScheduler,
}

impl LogTriggerEligibility {
    pub fn new(
        deps: &FlowDependencies,
        params: &FlowParams,
        coordinator_filters: Vec<Arc<dyn PreProcessor>>,
    ) -> Self {
        Self {
            log_trigger_flow: new_log_trigger_flow(deps, params),
            retry_flow: new_retry_flow(deps, params, coordinator_filters),
            recovery_proposal_flow: new_recovery_proposal_flow(deps, params),
            recovery_final_flow: new_recovery_final_flow(deps, params),
        }
    }

    pub fn into_schedulers(self) -> Vec<PipelineScheduler> {
        vec![self.log_trigger_flow, self.retry_flow, self.recovery_proposal_flow, self.recovery_final_flow]
    }
}
