use async_trait::async_trait;
use std::sync::Arc;

use super::PreProcessor;
use crate::core::client::TelemetryCollector;
use crate::error::FlowResult;
use crate::types::{Status, UpkeepPayload};

/// Stamps `status` for every payload and passes the batch through untouched.
pub struct TelemetryPreProcessor {
    collector: Arc<dyn TelemetryCollector>,
    status: Status,
}

impl TelemetryPreProcessor {
    pub fn new(collector: Arc<dyn TelemetryCollector>, status: Status) -> Self {
        Self { collector, status }
    }
}

#[async_trait]
impl PreProcessor for TelemetryPreProcessor {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    async fn pre_process(&self, payloads: Vec<UpkeepPayload>) -> FlowResult<Vec<UpkeepPayload>> {
        for payload in &payloads {
            if let Err(e) = self.collector.collect(&payload.work_id, payload.trigger.block_number, self.status).await {
                tracing::warn!(work_id = %payload.work_id, status = %self.status, error = %e, "Failed to collect telemetry");
            }
        }
        Ok(payloads)
    }
}
