//! Fixed wirings of source, filters and classifiers, one per workflow variant.
//!
//! None of the flows hold state between passes: everything they need to
//! remember lives in the shared stores and queues of [`FlowDependencies`].

pub mod conditional;
pub mod log_trigger;
pub mod recovery;
pub mod retry;
pub mod source;

use std::sync::Arc;

use crate::core::client::{
    ConditionalUpkeepProvider, LogEventProvider, MetadataStore, PayloadBuilder, ProposalQueue, RecoverableProvider,
    ResultStore, RetryQueue, Runner, TelemetryCollector, UpkeepStateUpdater,
};
use crate::types::params::FlowParams;
use crate::utils::random::{RandomSource, Shuffler};
use crate::worker::observer::{Observer, PayloadSource};
use crate::worker::postprocessors::{CombinedPostProcessor, PostProcessor};
use crate::worker::preprocessors::PreProcessor;
use crate::worker::scheduler::PipelineScheduler;

pub use conditional::{new_conditional_final_flow, new_conditional_proposal_flow, ConditionalEligibility};
pub use log_trigger::{new_log_trigger_flow, LogTriggerEligibility};
pub use recovery::{new_recovery_final_flow, new_recovery_proposal_flow};
pub use retry::new_retry_flow;
pub use source::{EmptySource, ProposalQueueSource, RecoverableSource, RetryQueueSource, SampledUpkeepSource};

/// Collaborators shared by every flow on a node.
///
/// All of them must be safe for concurrent use: passes of different flows,
/// and overlapping passes of the same flow, call them without coordination.
#[derive(Clone)]
pub struct FlowDependencies {
    pub runner: Arc<dyn Runner>,
    pub conditional_provider: Arc<dyn ConditionalUpkeepProvider>,
    pub log_provider: Arc<dyn LogEventProvider>,
    pub recoverable_provider: Arc<dyn RecoverableProvider>,
    pub payload_builder: Arc<dyn PayloadBuilder>,
    pub result_store: Arc<dyn ResultStore>,
    pub metadata_store: Arc<dyn MetadataStore>,
    pub state_updater: Arc<dyn UpkeepStateUpdater>,
    pub retry_queue: Arc<dyn RetryQueue>,
    pub proposal_queue: Arc<dyn ProposalQueue>,
    pub telemetry: Arc<dyn TelemetryCollector>,
}

/// Every flow of a node: both conditional flows followed by the log
/// triggered ones.
pub fn build_all<S: RandomSource + 'static>(
    deps: &FlowDependencies,
    params: &FlowParams,
    shuffler: Shuffler<S>,
    coordinator_filters: Vec<Arc<dyn PreProcessor>>,
) -> Vec<PipelineScheduler> {
    let mut schedulers = ConditionalEligibility::new(deps, params, shuffler).into_schedulers();
    schedulers.extend(LogTriggerEligibility::new(deps, params, coordinator_filters).into_schedulers());
    schedulers
}

pub(crate) fn schedule(
    name: &'static str,
    source: Arc<dyn PayloadSource>,
    preprocessors: Vec<Arc<dyn PreProcessor>>,
    postprocessors: Vec<Arc<dyn PostProcessor>>,
    deps: &FlowDependencies,
    params: &FlowParams,
    interval: std::time::Duration,
) -> PipelineScheduler {
    let observer = Observer::new(
        name,
        source,
        preprocessors,
        deps.runner.clone(),
        Arc::new(CombinedPostProcessor::new(postprocessors)),
        params.pass_time_limit,
    );
    PipelineScheduler::new(Arc::new(observer), interval)
}
