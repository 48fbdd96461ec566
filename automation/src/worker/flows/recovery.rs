use std::sync::Arc;

use super::source::{ProposalQueueSource, RecoverableSource};
use super::{schedule, FlowDependencies};
use crate::types::params::FlowParams;
use crate::types::{Status, UpkeepType};
use crate::worker::postprocessors::{
    AddProposalToMetadataStore, EligiblePostProcessor, IneligiblePostProcessor, RetryablePostProcessor,
};
use crate::worker::preprocessors::{LookupEnabler, ProposalFilterer, TelemetryPreProcessor};
use crate::worker::scheduler::PipelineScheduler;

pub const RECOVERY_PROPOSAL_FLOW: &str = "recovery_proposal";
pub const RECOVERY_FINAL_FLOW: &str = "recovery_final";

/// Picks up log triggered work the regular log flow missed and proposes it.
pub fn new_recovery_proposal_flow(deps: &FlowDependencies, params: &FlowParams) -> PipelineScheduler {
    schedule(
        RECOVERY_PROPOSAL_FLOW,
        Arc::new(RecoverableSource::new(deps.recoverable_provider.clone())),
        vec![Arc::new(ProposalFilterer::new(deps.metadata_store.clone(), UpkeepType::LogTrigger))],
        vec![
            Arc::new(IneligiblePostProcessor::new(deps.state_updater.clone(), deps.telemetry.clone())),
            Arc::new(AddProposalToMetadataStore::new(deps.metadata_store.clone())),
        ],
        deps,
        params,
        params.recovery_proposal_interval,
    )
}

/// Checks agreed log trigger proposals coming out of recovery.
pub fn new_recovery_final_flow(deps: &FlowDependencies, params: &FlowParams) -> PipelineScheduler {
    let source = ProposalQueueSource::new(
        deps.proposal_queue.clone(),
        deps.payload_builder.clone(),
        UpkeepType::LogTrigger,
        params.recovery_final_batch_size,
    );

    schedule(
        RECOVERY_FINAL_FLOW,
        Arc::new(source),
        vec![
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
        params.recovery_final_interval,
    )
}
