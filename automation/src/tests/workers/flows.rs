use std::sync::Arc;
use std::time::Duration;

use rstest::*;

use crate::core::client::provider::{
    MockConditionalUpkeepProvider, MockLogEventProvider, MockPayloadBuilder, MockRecoverableProvider,
};
use crate::core::client::runner::MockRunner;
use crate::core::client::store::MockUpkeepStateUpdater;
use crate::core::client::{MetadataStore, ProposalQueue, ResultStore, RetryQueue, RetryRecord};
use crate::tests::common::{conditional_payload, log_payload, node, result_for, InMemoryNode};
use crate::types::params::FlowParams;
use crate::types::{CheckResult, CoordinatedBlockProposal, Ratio, UpkeepPayload, UpkeepState, UpkeepType};
use crate::utils::random::Shuffler;
use crate::worker::flows::conditional::{CONDITIONAL_FINAL_FLOW, CONDITIONAL_PROPOSAL_FLOW};
use crate::worker::flows::log_trigger::LOG_TRIGGER_FLOW;
use crate::worker::flows::recovery::{RECOVERY_FINAL_FLOW, RECOVERY_PROPOSAL_FLOW};
use crate::worker::flows::retry::RETRY_FLOW;
use crate::worker::flows::{
    build_all, new_conditional_final_flow, new_conditional_proposal_flow, new_log_trigger_flow,
    new_recovery_final_flow, new_recovery_proposal_flow, new_retry_flow,
};
use crate::worker::preprocessors::{MockPreProcessor, PreProcessor};

/// Runner that reports every payload with the same verdict.
fn runner_with(eligible: bool, retryable: bool) -> MockRunner {
    let mut runner = MockRunner::new();
    runner
        .expect_check_upkeeps()
        .returning(move |batch| Ok(batch.iter().map(|p| result_for(p, eligible, retryable)).collect()));
    runner
}

fn no_state_updates() -> MockUpkeepStateUpdater {
    let mut state_updater = MockUpkeepStateUpdater::new();
    state_updater.expect_set_upkeep_state().never();
    state_updater
}

/// Rebuilds proposals into payloads, leaving the ones for `unresolved` empty.
fn builder_skipping(unresolved: Option<String>) -> MockPayloadBuilder {
    let mut builder = MockPayloadBuilder::new();
    builder.expect_build_payloads().returning(move |proposals| {
        Ok(proposals
            .into_iter()
            .map(|proposal| match &unresolved {
                Some(work_id) if *work_id == proposal.work_id => UpkeepPayload::default(),
                _ => UpkeepPayload::new(proposal.upkeep_id, proposal.trigger, vec![]),
            })
            .collect())
    });
    builder
}

#[rstest]
#[tokio::test]
async fn test_conditional_proposal_samples_and_records(node: InMemoryNode) {
    let active: Vec<UpkeepPayload> = (1..=10).map(|id| conditional_payload(id, 5)).collect();
    let expected: Vec<UpkeepPayload> = Shuffler::seeded(11).shuffle(active.clone()).into_iter().take(3).collect();

    let mut provider = MockConditionalUpkeepProvider::new();
    let provided = active.clone();
    provider.expect_get_active_upkeeps().times(1).returning(move || Ok(provided.clone()));

    let mut runner = MockRunner::new();
    let sampled = expected.clone();
    runner
        .expect_check_upkeeps()
        .withf(move |batch| *batch == sampled)
        .times(1)
        .returning(|batch| Ok(batch.iter().map(|p| result_for(p, true, false)).collect()));

    let mut deps = node.dependencies(runner, no_state_updates());
    deps.conditional_provider = Arc::new(provider);
    let params = FlowParams { sampling_ratio: Ratio::new(0.3).unwrap(), ..Default::default() };

    let flow = new_conditional_proposal_flow(&deps, &params, Shuffler::seeded(11));
    assert_eq!(flow.name(), CONDITIONAL_PROPOSAL_FLOW);
    flow.observer().process().await.unwrap();

    let mut recorded: Vec<String> = node
        .metadata_store
        .view_proposals(UpkeepType::Conditional)
        .await
        .unwrap()
        .into_iter()
        .map(|proposal| proposal.work_id)
        .collect();
    recorded.sort();
    let mut expected_ids: Vec<String> = expected.iter().map(|p| p.work_id.clone()).collect();
    expected_ids.sort();
    assert_eq!(recorded, expected_ids);
    assert!(node.result_store.is_empty().await);
}

#[rstest]
#[tokio::test]
async fn test_conditional_proposal_with_zero_sample_checks_empty_batch(node: InMemoryNode) {
    let mut provider = MockConditionalUpkeepProvider::new();
    provider.expect_get_active_upkeeps().returning(|| Ok(vec![conditional_payload(1, 1)]));

    let mut runner = MockRunner::new();
    runner.expect_check_upkeeps().withf(|batch| batch.is_empty()).times(1).returning(|_| Ok(vec![]));

    let mut deps = node.dependencies(runner, no_state_updates());
    deps.conditional_provider = Arc::new(provider);
    let params = FlowParams { sampling_ratio: Ratio::new(0.1).unwrap(), ..Default::default() };

    new_conditional_proposal_flow(&deps, &params, Shuffler::seeded(1)).observer().process().await.unwrap();
    assert!(node.metadata_store.view_proposals(UpkeepType::Conditional).await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_conditional_final_checks_built_proposals(node: InMemoryNode) {
    let payloads: Vec<UpkeepPayload> = (1..=3).map(|id| conditional_payload(id, 8)).collect();
    node.proposal_queue.enqueue(payloads.iter().map(CoordinatedBlockProposal::from).collect()).await.unwrap();

    let mut deps = node.dependencies(runner_with(true, false), no_state_updates());
    deps.payload_builder = Arc::new(builder_skipping(Some(payloads[1].work_id.clone())));

    let flow = new_conditional_final_flow(&deps, &FlowParams::default());
    assert_eq!(flow.name(), CONDITIONAL_FINAL_FLOW);
    flow.observer().process().await.unwrap();

    let stored: Vec<String> = node.result_store.view().await.into_iter().map(|r| r.work_id).collect();
    assert_eq!(stored.len(), 2);
    assert!(!stored.contains(&payloads[1].work_id));
    assert!(node.proposal_queue.is_empty().await);
}

#[rstest]
#[tokio::test]
async fn test_conditional_final_with_empty_queue_skips_builder(node: InMemoryNode) {
    let mut builder = MockPayloadBuilder::new();
    builder.expect_build_payloads().never();
    let mut runner = MockRunner::new();
    runner.expect_check_upkeeps().withf(|batch| batch.is_empty()).returning(|_| Ok(vec![]));

    let mut deps = node.dependencies(runner, no_state_updates());
    deps.payload_builder = Arc::new(builder);

    new_conditional_final_flow(&deps, &FlowParams::default()).observer().process().await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_log_trigger_enables_lookup_and_marks_ineligible(node: InMemoryNode) {
    let logs: Vec<UpkeepPayload> = (0..3).map(|index| log_payload(9, 40, index)).collect();
    let mut provider = MockLogEventProvider::new();
    let provided = logs.clone();
    provider.expect_get_latest_payloads().times(1).returning(move || Ok(provided.clone()));

    let mut runner = MockRunner::new();
    runner
        .expect_check_upkeeps()
        .withf(|batch| batch.len() == 3 && batch.iter().all(|p| p.lookup_enabled))
        .times(1)
        .returning(|batch| Ok(batch.iter().map(|p| result_for(p, false, false)).collect()));

    let mut state_updater = MockUpkeepStateUpdater::new();
    state_updater
        .expect_set_upkeep_state()
        .withf(|_, state| *state == UpkeepState::Ineligible)
        .times(3)
        .returning(|_, _| Ok(()));

    let mut deps = node.dependencies(runner, state_updater);
    deps.log_provider = Arc::new(provider);
    let params = FlowParams { lookup_enabled: true, ..Default::default() };

    let flow = new_log_trigger_flow(&deps, &params);
    assert_eq!(flow.name(), LOG_TRIGGER_FLOW);
    flow.observer().process().await.unwrap();
    assert!(node.result_store.is_empty().await);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_retry_flow_applies_coordinator_filters_and_requeues(node: InMemoryNode) {
    let payloads: Vec<UpkeepPayload> = (0..2).map(|index| log_payload(3, 60, index)).collect();
    node.retry_queue
        .enqueue(
            payloads
                .iter()
                .map(|payload| RetryRecord { payload: payload.clone(), interval: Some(Duration::ZERO) })
                .collect(),
        )
        .await
        .unwrap();

    let settled = payloads[0].work_id.clone();
    let mut coordinator = MockPreProcessor::new();
    coordinator.expect_name().return_const("coordinator");
    coordinator
        .expect_pre_process()
        .times(1)
        .returning(move |batch| Ok(batch.into_iter().filter(|p| p.work_id != settled).collect()));

    let remaining = payloads[1].work_id.clone();
    let mut runner = MockRunner::new();
    runner
        .expect_check_upkeeps()
        .withf(move |batch| batch.len() == 1 && batch[0].work_id == remaining)
        .times(1)
        .returning(|batch| {
            Ok(batch
                .iter()
                .map(|p| CheckResult {
                    retryable: true,
                    pipeline_execution_state: 1,
                    retry_interval: Some(Duration::from_secs(30)),
                    ..result_for(p, false, false)
                })
                .collect())
        });

    let deps = node.dependencies(runner, no_state_updates());
    let coordinator_filters: Vec<Arc<dyn PreProcessor>> = vec![Arc::new(coordinator)];
    let flow = new_retry_flow(&deps, &FlowParams::default(), coordinator_filters);
    assert_eq!(flow.name(), RETRY_FLOW);
    flow.observer().process().await.unwrap();

    assert_eq!(node.retry_queue.len().await, 1);
    assert!(node.retry_queue.dequeue(5).await.unwrap().is_empty());
    tokio::time::advance(Duration::from_secs(30)).await;
    let requeued = node.retry_queue.dequeue(5).await.unwrap();
    assert_eq!(requeued, vec![payloads[1].clone()]);
}

#[rstest]
#[tokio::test]
async fn test_recovery_proposal_skips_recorded_work(node: InMemoryNode) {
    let recoverable: Vec<UpkeepPayload> = (0..3).map(|index| log_payload(4, 70, index)).collect();
    node.metadata_store.add_proposals(vec![CoordinatedBlockProposal::from(&recoverable[0])]).await;

    let mut provider = MockRecoverableProvider::new();
    let provided = recoverable.clone();
    provider.expect_get_recovery_proposals().times(1).returning(move || Ok(provided.clone()));

    let mut runner = MockRunner::new();
    runner.expect_check_upkeeps().withf(|batch| batch.len() == 2).times(1).returning(|batch| {
        Ok(vec![result_for(&batch[0], true, false), result_for(&batch[1], false, false)])
    });

    let ineligible = recoverable[2].work_id.clone();
    let mut state_updater = MockUpkeepStateUpdater::new();
    state_updater
        .expect_set_upkeep_state()
        .withf(move |result, _| result.work_id == ineligible)
        .times(1)
        .returning(|_, _| Ok(()));

    let mut deps = node.dependencies(runner, state_updater);
    deps.recoverable_provider = Arc::new(provider);

    let flow = new_recovery_proposal_flow(&deps, &FlowParams::default());
    assert_eq!(flow.name(), RECOVERY_PROPOSAL_FLOW);
    flow.observer().process().await.unwrap();

    assert_eq!(node.metadata_store.view_proposals(UpkeepType::LogTrigger).await.unwrap().len(), 3);
    assert!(node.result_store.is_empty().await);
}

#[rstest]
#[tokio::test]
async fn test_recovery_final_reads_log_trigger_proposals_only(node: InMemoryNode) {
    let logs: Vec<UpkeepPayload> = (0..7).map(|index| log_payload(6, 80, index)).collect();
    let mut proposals: Vec<CoordinatedBlockProposal> = logs.iter().map(CoordinatedBlockProposal::from).collect();
    proposals.push(CoordinatedBlockProposal::from(&conditional_payload(6, 80)));
    node.proposal_queue.enqueue(proposals).await.unwrap();

    let mut deps = node.dependencies(runner_with(true, false), no_state_updates());
    deps.payload_builder = Arc::new(builder_skipping(None));

    let flow = new_recovery_final_flow(&deps, &FlowParams::default());
    assert_eq!(flow.name(), RECOVERY_FINAL_FLOW);
    flow.observer().process().await.unwrap();

    // Default batch of five log proposals; the conditional one stays queued.
    assert_eq!(node.result_store.len().await, 5);
    assert_eq!(node.proposal_queue.len().await, 3);
    assert_eq!(node.proposal_queue.dequeue(UpkeepType::Conditional, 10).await.unwrap().len(), 1);
}

#[rstest]
fn test_build_all_wires_every_flow(node: InMemoryNode) {
    let deps = node.dependencies(MockRunner::new(), MockUpkeepStateUpdater::new());
    let params = FlowParams::default();

    let flows = build_all(&deps, &params, Shuffler::seeded(1), vec![]);
    let wiring: Vec<(&str, Duration)> = flows.iter().map(|flow| (flow.name(), flow.interval())).collect();

    assert_eq!(
        wiring,
        vec![
            (CONDITIONAL_PROPOSAL_FLOW, Duration::from_secs(3)),
            (CONDITIONAL_FINAL_FLOW, Duration::from_secs(1)),
            (LOG_TRIGGER_FLOW, Duration::from_secs(1)),
            (RETRY_FLOW, Duration::from_secs(5)),
            (RECOVERY_PROPOSAL_FLOW, Duration::from_secs(1)),
            (RECOVERY_FINAL_FLOW, Duration::from_secs(1)),
        ]
    );
    assert!(flows.iter().all(|flow| flow.observer().time_limit() == Duration::from_secs(20)));
}
