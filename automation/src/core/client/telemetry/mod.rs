use async_trait::async_trait;
use thiserror::Error;

use crate::types::Status;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to record {status} for work {work_id}: {reason}")]
    CollectFailed { work_id: String, status: Status, reason: String },
}

/// Records lifecycle checkpoints per unit of work. Must be safe for
/// concurrent use. Failures are never fatal to a pass.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryCollector: Send + Sync {
    async fn collect(&self, work_id: &str, block_number: u64, status: Status) -> Result<(), TelemetryError>;
}

/// Collector that emits every checkpoint as a debug event.
#[derive(Debug, Default, Clone)]
pub struct TracingTelemetryCollector;

#[async_trait]
impl TelemetryCollector for TracingTelemetryCollector {
    async fn collect(&self, work_id: &str, block_number: u64, status: Status) -> Result<(), TelemetryError> {
        tracing::debug!(work_id = %work_id, block_number, status = %status, "Telemetry status collected");
        Ok(())
    }
}
