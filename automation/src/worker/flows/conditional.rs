use std::sync::Arc;

use super::source::{ProposalQueueSource, SampledUpkeepSource};
use super::{schedule, FlowDependencies};
use crate::types::params::FlowParams;
use crate::types::{Status, UpkeepType};
use crate::utils::random::{RandomSource, Shuffler};
use crate::worker::postprocessors::{AddProposalToMetadataStore, EligiblePostProcessor, RetryablePostProcessor};
use crate::worker::preprocessors::{LookupEnabler, ProposalFilterer, TelemetryPreProcessor};
use crate::worker::scheduler::PipelineScheduler;

pub const CONDITIONAL_PROPOSAL_FLOW: &str = "conditional_proposal";
pub const CONDITIONAL_FINAL_FLOW: &str = "conditional_final";

/// Samples active conditional upkeeps and records what was checked as
/// proposals for the coordination round.
pub fn new_conditional_proposal_flow<S: RandomSource + 'static>(
    deps: &FlowDependencies,
    params: &FlowParams,
    shuffler: Shuffler<S>,
) -> PipelineScheduler {
    let source =
        SampledUpkeepSource::new(deps.conditional_provider.clone(), shuffler, params.sampling_ratio, params.max_sampled);

    schedule(
        CONDITIONAL_PROPOSAL_FLOW,
        Arc::new(source),
        vec![Arc::new(ProposalFilterer::new(deps.metadata_store.clone(), UpkeepType::LogTrigger))],
        vec![Arc::new(AddProposalToMetadataStore::new(deps.metadata_store.clone()))],
        deps,
        params,
        params.conditional_proposal_interval,
    )
}

/// Checks agreed conditional proposals and queues the eligible results.
pub fn new_conditional_final_flow(deps: &FlowDependencies, params: &FlowParams) -> PipelineScheduler {
    let source = ProposalQueueSource::new(
        deps.proposal_queue.clone(),
        deps.payload_builder.clone(),
        UpkeepType::Conditional,
        params.conditional_final_batch_size,
    );

    schedule(
        CONDITIONAL_FINAL_FLOW,
        Arc::new(source),
        vec![
            Arc::new(LookupEnabler::new(params.lookup_enabled)),
            Arc::new(TelemetryPreProcessor::new(deps.telemetry.clone(), Status::CheckPipelineRun)),
        ],
        vec![
            Arc::new(EligiblePostProcessor::new(deps.result_store.clone(), deps.telemetry.clone())),
            Arc::new(RetryablePostProcessor::new(deps.retry_queue.clone())),
        ],
        deps,
        params,
        params.conditional_final_interval,
    )
}

/// Both conditional flows of a node.
pub struct ConditionalEligibility {
    pub proposal_flow: PipelineScheduler,
    pub final_flow: PipelineScheduler,
}

impl ConditionalEligibility {
    pub fn new<S: RandomSource + 'static>(deps: &FlowDependencies, params: &FlowParams, shuffler: Shuffler<S>) -> Self {
        Self {
            proposal_flow: new_conditional_proposal_flow(deps, params, shuffler),
            final_flow: new_conditional_final_flow(deps, params),
        }
    }

    pub fn into_schedulers(self) -> Vec<PipelineScheduler> {
        vec![self.proposal_flow, self.final_flow]
    }
}
