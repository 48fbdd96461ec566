use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::client::{
    ConditionalUpkeepProvider, PayloadBuilder, ProposalQueue, RecoverableProvider, RetryQueue,
};
use crate::error::FlowResult;
use crate::types::{Ratio, UpkeepPayload, UpkeepType};
use crate::utils::random::{sample_size, RandomSource, Shuffler};
use crate::worker::observer::PayloadSource;

/// Random share of the active conditional upkeeps.
pub struct SampledUpkeepSource<S: RandomSource> {
    provider: Arc<dyn ConditionalUpkeepProvider>,
    shuffler: Mutex<Shuffler<S>>,
    ratio: Ratio,
    max_sampled: usize,
}

impl<S: RandomSource> SampledUpkeepSource<S> {
    pub fn new(
        provider: Arc<dyn ConditionalUpkeepProvider>,
        shuffler: Shuffler<S>,
        ratio: Ratio,
        max_sampled: usize,
    ) -> Self {
        Self { provider, shuffler: Mutex::new(shuffler), ratio, max_sampled }
    }
}

#[async_trait]
impl<S: RandomSource + 'static> PayloadSource for SampledUpkeepSource<S> {
    async fn fetch(&self) -> FlowResult<Vec<UpkeepPayload>> {
        let upkeeps = self.provider.get_active_upkeeps().await?;
        let size = sample_size(self.ratio, upkeeps.len(), self.max_sampled);
        if size == 0 {
            return Ok(Vec::new());
        }

        let available = upkeeps.len();
        let mut sampled = self.shuffler.lock().await.shuffle(upkeeps);
        sampled.truncate(size);
        tracing::debug!(available, sampled = sampled.len(), "Sampled active upkeeps");
        Ok(sampled)
    }
}

/// Agreed proposals of one upkeep type, rebuilt into full payloads.
pub struct ProposalQueueSource {
    queue: Arc<dyn ProposalQueue>,
    builder: Arc<dyn PayloadBuilder>,
    upkeep_type: UpkeepType,
    batch_size: usize,
}

impl ProposalQueueSource {
    pub fn new(
        queue: Arc<dyn ProposalQueue>,
        builder: Arc<dyn PayloadBuilder>,
        upkeep_type: UpkeepType,
        batch_size: usize,
    ) -> Self {
        Self { queue, builder, upkeep_type, batch_size }
    }
}

#[async_trait]
impl PayloadSource for ProposalQueueSource {
    async fn fetch(&self) -> FlowResult<Vec<UpkeepPayload>> {
        let proposals = self.queue.dequeue(self.upkeep_type, self.batch_size).await?;
        if proposals.is_empty() {
            return Ok(Vec::new());
        }

        let requested = proposals.len();
        let payloads: Vec<UpkeepPayload> =
            self.builder.build_payloads(proposals).await?.into_iter().filter(|payload| !payload.is_empty()).collect();
        if payloads.len() < requested {
            tracing::debug!(
                upkeep_type = %self.upkeep_type,
                requested,
                built = payloads.len(),
                "Dropped proposals that could not be built"
            );
        }
        Ok(payloads)
    }
}

/// Starts every pass with an empty batch; a source filter supplies the work.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySource;

#[async_trait]
impl PayloadSource for EmptySource {
    async fn fetch(&self) -> FlowResult<Vec<UpkeepPayload>> {
        Ok(Vec::new())
    }
}

pub struct RetryQueueSource {
    queue: Arc<dyn RetryQueue>,
    batch_size: usize,
}

impl RetryQueueSource {
    pub fn new(queue: Arc<dyn RetryQueue>, batch_size: usize) -> Self {
        Self { queue, batch_size }
    }
}

#[async_trait]
impl PayloadSource for RetryQueueSource {
    async fn fetch(&self) -> FlowResult<Vec<UpkeepPayload>> {
        Ok(self.queue.dequeue(self.batch_size).await?)
    }
}

pub struct RecoverableSource {
    provider: Arc<dyn RecoverableProvider>,
}

impl RecoverableSource {
    pub fn new(provider: Arc<dyn RecoverableProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PayloadSource for RecoverableSource {
    async fn fetch(&self) -> FlowResult<Vec<UpkeepPayload>> {
        Ok(self.provider.get_recovery_proposals().await?)
    }
}
