use async_trait::async_trait;
use std::sync::Arc;

use super::PostProcessor;
use crate::core::client::TelemetryCollector;
use crate::error::FlowResult;
use crate::types::{CheckResult, Status, UpkeepPayload};

/// Stamps a fixed status for every result of a flow stage.
pub struct TelemetryPostProcessor {
    collector: Arc<dyn TelemetryCollector>,
    status: Status,
}

impl TelemetryPostProcessor {
    pub fn new(collector: Arc<dyn TelemetryCollector>, status: Status) -> Self {
        Self { collector, status }
    }
}

#[async_trait]
impl PostProcessor for TelemetryPostProcessor {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    async fn post_process(&self, results: &[CheckResult], _payloads: &[UpkeepPayload]) -> FlowResult<()> {
        for result in results {
            if let Err(e) = self.collector.collect(&result.work_id, result.trigger.block_number, self.status).await {
                tracing::warn!(work_id = %result.work_id, status = %self.status, error = %e, "Failed to collect telemetry");
            }
        }
        Ok(())
    }
}
