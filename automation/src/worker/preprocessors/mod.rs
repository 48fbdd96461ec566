//! Filters applied to a candidate batch before it is evaluated.
//!
//! Filters run strictly in chain order, each receiving the output of the
//! previous one. The first error aborts the pass before anything is evaluated
//! or classified.

pub mod log_provider;
pub mod lookup;
pub mod proposal_filter;
pub mod telemetry;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::FlowResult;
use crate::types::UpkeepPayload;

pub use log_provider::LogProviderPreProcessor;
pub use lookup::LookupEnabler;
pub use proposal_filter::ProposalFilterer;
pub use telemetry::TelemetryPreProcessor;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn pre_process(&self, payloads: Vec<UpkeepPayload>) -> FlowResult<Vec<UpkeepPayload>>;
}

/// Threads `payloads` through every filter in order. An empty chain is the
/// identity.
pub async fn apply_chain(
    preprocessors: &[Arc<dyn PreProcessor>],
    mut payloads: Vec<UpkeepPayload>,
) -> FlowResult<Vec<UpkeepPayload>> {
    for preprocessor in preprocessors {
        let before = payloads.len();
        payloads = preprocessor.pre_process(payloads).await.inspect_err(|e| {
            tracing::error!(preprocessor = preprocessor.name(), error = %e, "Pre-processing failed");
        })?;
        tracing::trace!(preprocessor = preprocessor.name(), before, after = payloads.len(), "Pre-processor applied");
    }
    Ok(payloads)
}
