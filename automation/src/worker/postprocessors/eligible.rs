use async_trait::async_trait;
use std::sync::Arc;

use super::{record_classified, PostProcessor};
use crate::core::client::{ResultStore, TelemetryCollector};
use crate::error::FlowResult;
use crate::types::{CheckResult, Status, UpkeepPayload};

/// Moves definitive, eligible results into the result store.
pub struct EligiblePostProcessor {
    results: Arc<dyn ResultStore>,
    telemetry: Arc<dyn TelemetryCollector>,
}

impl EligiblePostProcessor {
    pub fn new(results: Arc<dyn ResultStore>, telemetry: Arc<dyn TelemetryCollector>) -> Self {
        Self { results, telemetry }
    }
}

#[async_trait]
impl PostProcessor for EligiblePostProcessor {
    fn name(&self) -> &'static str {
        "eligible"
    }

    async fn post_process(&self, results: &[CheckResult], _payloads: &[UpkeepPayload]) -> FlowResult<()> {
        // A retryable result goes to the retry queue, never to the result store.
        let eligible: Vec<CheckResult> =
            results.iter().filter(|result| result.is_eligible() && !result.retryable).cloned().collect();
        if eligible.is_empty() {
            return Ok(());
        }

        for result in &eligible {
            if let Err(e) = self.telemetry.collect(&result.work_id, result.trigger.block_number, Status::Queued).await {
                tracing::warn!(work_id = %result.work_id, error = %e, "Failed to collect queued telemetry");
            }
        }

        tracing::debug!(count = eligible.len(), "Adding eligible results to the result store");
        record_classified(self.name(), eligible.len());
        self.results.add(eligible).await;
        Ok(())
    }
}
