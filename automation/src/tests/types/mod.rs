use assert_matches::assert_matches;
use rstest::rstest;
use strum::IntoEnumIterator as _;

use crate::error::AutomationError;
use crate::tests::common::{conditional_payload, failed_result_for, log_payload, result_for};
use crate::types::upkeep::work_id;
use crate::types::{
    CoordinatedBlockProposal, Ratio, Status, Trigger, UpkeepIdentifier, UpkeepPayload, UpkeepType,
};

#[test]
fn test_work_id_is_keccak_of_upkeep_id_for_conditionals() {
    let id = UpkeepIdentifier::default();
    assert_eq!(
        work_id(&id, &Trigger::new(1, [0; 32])),
        "290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563"
    );
}

#[test]
fn test_work_id_is_stable_for_same_upkeep_and_trigger() {
    let first = log_payload(7, 42, 3);
    let second = log_payload(7, 42, 3);
    assert_eq!(first.work_id, second.work_id);
    assert_eq!(first.work_id.len(), 64);
}

#[test]
fn test_conditional_work_id_ignores_block() {
    assert_eq!(conditional_payload(7, 1).work_id, conditional_payload(7, 2).work_id);
    assert_ne!(conditional_payload(7, 1).work_id, conditional_payload(8, 1).work_id);
}

#[rstest]
#[case(log_payload(7, 42, 4))]
#[case(log_payload(7, 43, 3))]
#[case(log_payload(8, 42, 3))]
#[case(conditional_payload(7, 42))]
fn test_log_work_id_depends_on_log_identity(#[case] other: UpkeepPayload) {
    assert_ne!(log_payload(7, 42, 3).work_id, other.work_id);
}

#[test]
fn test_upkeep_type_follows_trigger() {
    assert_eq!(conditional_payload(1, 1).upkeep_type(), UpkeepType::Conditional);
    assert_eq!(log_payload(1, 1, 0).upkeep_type(), UpkeepType::LogTrigger);
}

#[test]
fn test_upkeep_identifier_display() {
    let id = UpkeepIdentifier::from(0xffu64);
    assert_eq!(id.to_string(), format!("0x{}ff", "0".repeat(62)));
    assert!(!id.is_zero());
    assert!(UpkeepIdentifier::default().is_zero());
}

#[test]
fn test_empty_payload() {
    assert!(UpkeepPayload::default().is_empty());
    assert!(!conditional_payload(1, 1).is_empty());
}

#[rstest]
#[case(0.0)]
#[case(-0.1)]
#[case(1.01)]
#[case(f64::NAN)]
fn test_ratio_rejects_out_of_range(#[case] value: f64) {
    assert_matches!(Ratio::new(value), Err(AutomationError::ConfigError(_)));
}

#[rstest]
#[case(1.0, 10, 10)]
#[case(0.3, 10, 3)]
#[case(0.25, 10, 3)]
#[case(0.3, 1, 0)]
#[case(0.5, 0, 0)]
fn test_ratio_of_rounds(#[case] value: f64, #[case] n: usize, #[case] expected: usize) {
    assert_eq!(Ratio::new(value).unwrap().of(n), expected);
}

#[test]
fn test_default_ratio() {
    assert_eq!(Ratio::default().value(), 0.3);
}

#[test]
fn test_check_result_classification_predicates() {
    let payload = conditional_payload(1, 1);

    let eligible = result_for(&payload, true, false);
    assert!(eligible.is_eligible());
    assert!(!eligible.is_ineligible());

    let ineligible = result_for(&payload, false, false);
    assert!(ineligible.is_ineligible());
    assert!(!ineligible.is_eligible());

    let failed = failed_result_for(&payload, 2);
    assert!(!failed.is_definitive());
    assert!(!failed.is_eligible());
    assert!(!failed.is_ineligible());
}

#[test]
fn test_proposal_projection_keeps_identity() {
    let payload = log_payload(3, 9, 1);
    let result = result_for(&payload, true, false);

    let from_result = CoordinatedBlockProposal::from(&result);
    let from_payload = CoordinatedBlockProposal::from(&payload);

    assert_eq!(from_result, from_payload);
    assert_eq!(from_result.upkeep_type(), UpkeepType::LogTrigger);
}

#[test]
fn test_status_set() {
    let statuses: Vec<String> = Status::iter().map(|status| status.to_string()).collect();
    assert_eq!(
        statuses,
        vec![
            "Surfaced",
            "CheckPipelineRun",
            "Queued",
            "Proposed",
            "AgreedInQuorum",
            "ResultProposed",
            "ResultAgreedInQuorum",
            "Reported",
            "Completed"
        ]
    );
}
