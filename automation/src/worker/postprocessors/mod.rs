//! Classifiers applied to check results after evaluation.
//!
//! Each classifier inspects every result and acts only on those matching its
//! own predicate. [`CombinedPostProcessor`] runs a fixed list of classifiers
//! and never stops early: every member runs, and all failures are joined
//! into one error in member order.

pub mod eligible;
pub mod ineligible;
pub mod metadata;
pub mod retryable;
pub mod telemetry;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{FlowResult, JoinedError};
use crate::types::{CheckResult, UpkeepPayload};
use crate::utils::metrics::AUTOMATION_METRICS;

pub use eligible::EligiblePostProcessor;
pub use ineligible::IneligiblePostProcessor;
pub use metadata::AddProposalToMetadataStore;
pub use retryable::RetryablePostProcessor;
pub use telemetry::TelemetryPostProcessor;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn post_process(&self, results: &[CheckResult], payloads: &[UpkeepPayload]) -> FlowResult<()>;
}

pub struct CombinedPostProcessor {
    processors: Vec<Arc<dyn PostProcessor>>,
}

impl CombinedPostProcessor {
    pub fn new(processors: Vec<Arc<dyn PostProcessor>>) -> Self {
        Self { processors }
    }
}

#[async_trait]
impl PostProcessor for CombinedPostProcessor {
    fn name(&self) -> &'static str {
        "combined"
    }

    async fn post_process(&self, results: &[CheckResult], payloads: &[UpkeepPayload]) -> FlowResult<()> {
        let mut errors = Vec::new();
        for processor in &self.processors {
            if let Err(e) = processor.post_process(results, payloads).await {
                tracing::warn!(postprocessor = processor.name(), error = %e, "Post-processor failed");
                errors.push(e);
            }
        }
        JoinedError::join(errors)
    }
}

pub(crate) fn record_classified(postprocessor: &'static str, count: usize) {
    if count > 0 {
        AUTOMATION_METRICS
            .classified_results
            .add(count as u64, &[opentelemetry::KeyValue::new("postprocessor", postprocessor)]);
    }
}
