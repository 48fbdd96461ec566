use async_trait::async_trait;
use thiserror::Error;

use crate::types::{CoordinatedBlockProposal, UpkeepPayload};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to build payloads: {0}")]
    BuildFailed(String),

    #[error("Provider error: {0}")]
    Other(String),
}

/// Source of the active conditional upkeeps. Safe for concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConditionalUpkeepProvider: Send + Sync {
    async fn get_active_upkeeps(&self) -> Result<Vec<UpkeepPayload>, ProviderError>;
}

/// Source of payloads for freshly observed logs. Safe for concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogEventProvider: Send + Sync {
    async fn get_latest_payloads(&self) -> Result<Vec<UpkeepPayload>, ProviderError>;
}

/// Out-of-band source of log triggered work missed by the regular log flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecoverableProvider: Send + Sync {
    async fn get_recovery_proposals(&self) -> Result<Vec<UpkeepPayload>, ProviderError>;
}

/// Turns agreed proposals back into full payloads.
///
/// A proposal that cannot be built comes back as an empty payload (see
/// [`UpkeepPayload::is_empty`]) instead of failing the batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayloadBuilder: Send + Sync {
    async fn build_payloads(&self, proposals: Vec<CoordinatedBlockProposal>) -> Result<Vec<UpkeepPayload>, ProviderError>;
}
