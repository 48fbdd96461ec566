use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::{record_classified, PostProcessor};
use crate::core::client::{RetryQueue, RetryRecord};
use crate::error::FlowResult;
use crate::types::{CheckResult, UpkeepPayload};

/// Re-queues retryable results with their originating payload.
///
/// Results are submitted one at a time; the first failed submission stops
/// the remaining ones for this pass and earlier submissions stay queued.
pub struct RetryablePostProcessor {
    queue: Arc<dyn RetryQueue>,
}

impl RetryablePostProcessor {
    pub fn new(queue: Arc<dyn RetryQueue>) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl PostProcessor for RetryablePostProcessor {
    fn name(&self) -> &'static str {
        "retryable"
    }

    async fn post_process(&self, results: &[CheckResult], payloads: &[UpkeepPayload]) -> FlowResult<()> {
        let by_work_id: HashMap<&str, &UpkeepPayload> =
            payloads.iter().map(|payload| (payload.work_id.as_str(), payload)).collect();

        let mut submitted = 0;
        for result in results.iter().filter(|result| result.retryable) {
            // The runner may reorder results, so match on work id rather than position.
            let payload = match by_work_id.get(result.work_id.as_str()) {
                Some(payload) => (*payload).clone(),
                None => UpkeepPayload {
                    upkeep_id: result.upkeep_id,
                    trigger: result.trigger.clone(),
                    work_id: result.work_id.clone(),
                    ..Default::default()
                },
            };
            let record = RetryRecord { payload, interval: result.retry_interval };

            if let Err(e) = self.queue.enqueue(vec![record]).await {
                tracing::error!(
                    work_id = %result.work_id,
                    submitted,
                    error = %e,
                    "Failed to enqueue retryable result, skipping the rest of the batch"
                );
                record_classified(self.name(), submitted);
                return Err(e.into());
            }
            submitted += 1;
        }

        record_classified(self.name(), submitted);
        Ok(())
    }
}
