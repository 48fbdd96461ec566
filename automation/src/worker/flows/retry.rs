use std::sync::Arc;

use super::source::RetryQueueSource;
use super::{schedule, FlowDependencies};
use crate::types::params::FlowParams;
use crate::worker::postprocessors::{
    EligiblePostProcessor, IneligiblePostProcessor, PostProcessor, RetryablePostProcessor,
};
use crate::worker::preprocessors::{LookupEnabler, PreProcessor};
use crate::worker::scheduler::PipelineScheduler;

pub const RETRY_FLOW: &str = "retry";

/// Re-checks payloads whose previous result was retryable.
///
/// `coordinator_filters` run first, ahead of the lookup switch, so the caller
/// can drop work the coordinator already considers settled.
pub fn new_retry_flow(
    deps: &FlowDependencies,
    params: &FlowParams,
    coordinator_filters: Vec<Arc<dyn PreProcessor>>,
) -> PipelineScheduler {
    let mut preprocessors = coordinator_filters;
    preprocessors.push(Arc::new(LookupEnabler::new(params.lookup_enabled)));

    let postprocessors: Vec<Arc<dyn PostProcessor>> = vec![
        Arc::new(EligiblePostProcessor::new(deps.result_store.clone(), deps.telemetry.clone())),
        Arc::new(RetryablePostProcessor::new(deps.retry_queue.clone())),
        Arc::new(IneligiblePostProcessor::new(deps.state_updater.clone(), deps.telemetry.clone())),
    ];

    schedule(
        RETRY_FLOW,
        Arc::new(RetryQueueSource::new(deps.retry_queue.clone(), params.retry_batch_size)),
        preprocessors,
        postprocessors,
        deps,
        params,
        params.retry_interval,
    )
}
