use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::upkeep::{Trigger, UpkeepIdentifier, UpkeepPayload, UpkeepType};

/// Outcome of evaluating one payload, produced by the runner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckResult {
    pub upkeep_id: UpkeepIdentifier,
    pub work_id: String,
    pub trigger: Trigger,
    pub eligible: bool,
    pub retryable: bool,
    /// Zero on success. Anything else is a processing-stage failure and is
    /// neither an eligible nor an ineligible verdict.
    pub pipeline_execution_state: u8,
    pub ineligibility_reason: u8,
    pub perform_data: Vec<u8>,
    pub gas_allocated: u64,
    /// Earliest time after which a retryable result should be checked again
    pub retry_interval: Option<Duration>,
}

impl CheckResult {
    pub fn is_definitive(&self) -> bool {
        self.pipeline_execution_state == 0
    }

    pub fn is_eligible(&self) -> bool {
        self.is_definitive() && self.eligible
    }

    pub fn is_ineligible(&self) -> bool {
        self.is_definitive() && !self.eligible
    }
}

/// Reduced view of a check result recorded in the metadata store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CoordinatedBlockProposal {
    pub upkeep_id: UpkeepIdentifier,
    pub trigger: Trigger,
    pub work_id: String,
}

impl CoordinatedBlockProposal {
    pub fn upkeep_type(&self) -> UpkeepType {
        self.trigger.upkeep_type()
    }
}

impl From<&CheckResult> for CoordinatedBlockProposal {
    fn from(result: &CheckResult) -> Self {
        Self { upkeep_id: result.upkeep_id, trigger: result.trigger.clone(), work_id: result.work_id.clone() }
    }
}

impl From<&UpkeepPayload> for CoordinatedBlockProposal {
    fn from(payload: &UpkeepPayload) -> Self {
        Self { upkeep_id: payload.upkeep_id, trigger: payload.trigger.clone(), work_id: payload.work_id.clone() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum UpkeepState {
    /// The upkeep was performed on-chain for this trigger
    Performed,
    /// The upkeep was definitively found not eligible for this trigger
    Ineligible,
}
