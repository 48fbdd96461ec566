pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{CheckResult, CoordinatedBlockProposal, UpkeepState, UpkeepType};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to update state of work {work_id} to {state}: {reason}")]
    StateUpdateFailed { work_id: String, state: UpkeepState, reason: String },

    #[error("Store error: {0}")]
    Other(String),
}

/// Holds eligible results until they are reported.
///
/// Shared by every flow on the node; implementations must be safe for
/// concurrent use and idempotent on work id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn add(&self, results: Vec<CheckResult>);
    async fn view(&self) -> Vec<CheckResult>;
    async fn remove(&self, work_ids: &[String]);
}

/// Records proposals so later rounds do not propose the same work again.
///
/// Writes are additive; expiry is the store's own concern. Must be safe for
/// concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn view_proposals(&self, upkeep_type: UpkeepType) -> Result<Vec<CoordinatedBlockProposal>, StoreError>;
    async fn add_proposals(&self, proposals: Vec<CoordinatedBlockProposal>);
}

/// Persists per-work upkeep state. Must be safe for concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpkeepStateUpdater: Send + Sync {
    async fn set_upkeep_state(&self, result: &CheckResult, state: UpkeepState) -> Result<(), StoreError>;
}
