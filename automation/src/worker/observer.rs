use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info_span, Instrument};

use crate::core::client::{Runner, RunnerError};
use crate::error::{FlowError, FlowResult};
use crate::types::UpkeepPayload;
use crate::utils::metrics::AUTOMATION_METRICS;
use crate::worker::postprocessors::PostProcessor;
use crate::worker::preprocessors::{apply_chain, PreProcessor};

/// Where a flow gets the batch for one pass.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayloadSource: Send + Sync {
    async fn fetch(&self) -> FlowResult<Vec<UpkeepPayload>>;
}

/// One fixed wiring of source, filters, runner and classifiers.
///
/// A pass fetches a batch, threads it through the filters in order, evaluates
/// it once with the runner and hands the results to the post-processor.
/// Any fetch, filter or runner error aborts the pass before classification.
pub struct Observer {
    name: &'static str,
    source: Arc<dyn PayloadSource>,
    preprocessors: Vec<Arc<dyn PreProcessor>>,
    runner: Arc<dyn Runner>,
    postprocessor: Arc<dyn PostProcessor>,
    time_limit: Duration,
}

impl Observer {
    pub fn new(
        name: &'static str,
        source: Arc<dyn PayloadSource>,
        preprocessors: Vec<Arc<dyn PreProcessor>>,
        runner: Arc<dyn Runner>,
        postprocessor: Arc<dyn PostProcessor>,
        time_limit: Duration,
    ) -> Self {
        Self { name, source, preprocessors, runner, postprocessor, time_limit }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Runs a full pass bounded by the time limit. Work still in flight when
    /// the limit expires is dropped.
    pub async fn process(&self) -> FlowResult<()> {
        let span = info_span!("flow", flow = self.name);
        let attributes = [KeyValue::new("flow", self.name)];
        AUTOMATION_METRICS.flow_passes.add(1, &attributes);
        let started = Instant::now();

        let outcome = async {
            match tokio::time::timeout(self.time_limit, self.fetch_and_process()).await {
                Ok(result) => result,
                Err(_) => Err(FlowError::Timeout(self.time_limit)),
            }
        }
        .instrument(span)
        .await;

        AUTOMATION_METRICS.flow_pass_duration.record(started.elapsed().as_secs_f64(), &attributes);
        if outcome.is_err() {
            AUTOMATION_METRICS.flow_pass_failures.add(1, &attributes);
        }
        outcome
    }

    async fn fetch_and_process(&self) -> FlowResult<()> {
        let payloads = self.source.fetch().await?;
        tracing::trace!(count = payloads.len(), "Fetched payloads");
        self.process_payloads(payloads).await
    }

    /// Filters, evaluates and classifies an already fetched batch.
    pub async fn process_payloads(&self, payloads: Vec<UpkeepPayload>) -> FlowResult<()> {
        let payloads = apply_chain(&self.preprocessors, payloads).await?;

        let results = self.runner.check_upkeeps(payloads.clone()).await.inspect_err(|e| {
            tracing::error!(count = payloads.len(), error = %e, "Runner failed to check upkeeps");
        })?;
        if results.len() != payloads.len() {
            let error = RunnerError::ResultCountMismatch { expected: payloads.len(), got: results.len() };
            tracing::error!(error = %error, "Runner returned an incomplete batch");
            return Err(error.into());
        }
        tracing::debug!(count = results.len(), "Checked upkeeps");

        self.postprocessor.post_process(&results, &payloads).await
    }
}
