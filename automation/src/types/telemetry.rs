use serde::{Deserialize, Serialize};

/// Lifecycle checkpoints reported to the telemetry collector, keyed by work id.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
pub enum Status {
    Surfaced,
    CheckPipelineRun,
    Queued,
    Proposed,
    AgreedInQuorum,
    ResultProposed,
    ResultAgreedInQuorum,
    Reported,
    Completed,
}
