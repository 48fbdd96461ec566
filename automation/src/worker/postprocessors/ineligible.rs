use async_trait::async_trait;
use std::sync::Arc;

use super::{record_classified, PostProcessor};
use crate::core::client::{TelemetryCollector, UpkeepStateUpdater};
use crate::error::{FlowError, FlowResult, JoinedError};
use crate::types::{CheckResult, Status, UpkeepPayload, UpkeepState};

/// Marks definitive, ineligible results as such in the upkeep state store.
///
/// Every matching result is attempted; all update failures are joined.
pub struct IneligiblePostProcessor {
    state_updater: Arc<dyn UpkeepStateUpdater>,
    telemetry: Arc<dyn TelemetryCollector>,
}

impl IneligiblePostProcessor {
    pub fn new(state_updater: Arc<dyn UpkeepStateUpdater>, telemetry: Arc<dyn TelemetryCollector>) -> Self {
        Self { state_updater, telemetry }
    }
}

#[async_trait]
impl PostProcessor for IneligiblePostProcessor {
    fn name(&self) -> &'static str {
        "ineligible"
    }

    async fn post_process(&self, results: &[CheckResult], _payloads: &[UpkeepPayload]) -> FlowResult<()> {
        let mut errors: Vec<FlowError> = Vec::new();
        let mut updated = 0;

        for result in results.iter().filter(|result| result.is_ineligible()) {
            if let Err(e) = self.state_updater.set_upkeep_state(result, UpkeepState::Ineligible).await {
                tracing::warn!(work_id = %result.work_id, error = %e, "Failed to mark upkeep ineligible");
                errors.push(e.into());
                continue;
            }
            updated += 1;

            if let Err(e) = self.telemetry.collect(&result.work_id, result.trigger.block_number, Status::Completed).await {
                tracing::warn!(work_id = %result.work_id, error = %e, "Failed to collect completed telemetry");
            }
        }

        record_classified(self.name(), updated);
        JoinedError::join(errors)
    }
}
