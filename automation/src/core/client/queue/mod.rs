pub mod memory;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::types::{CoordinatedBlockProposal, UpkeepPayload, UpkeepType};

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Queue is full (capacity {capacity})")]
    Full { capacity: usize },

    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    #[error("Queue error: {0}")]
    Other(String),
}

/// A payload waiting to be checked again, with an optional delay hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryRecord {
    pub payload: UpkeepPayload,
    pub interval: Option<Duration>,
}

/// Bounded queue of payloads to re-check. Must be safe for concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RetryQueue: Send + Sync {
    async fn enqueue(&self, records: Vec<RetryRecord>) -> Result<(), QueueError>;
    async fn dequeue(&self, max: usize) -> Result<Vec<UpkeepPayload>, QueueError>;
}

/// Bounded queue of agreed proposals awaiting a final check. Must be safe for
/// concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProposalQueue: Send + Sync {
    async fn enqueue(&self, proposals: Vec<CoordinatedBlockProposal>) -> Result<(), QueueError>;
    async fn dequeue(&self, upkeep_type: UpkeepType, max: usize) -> Result<Vec<CoordinatedBlockProposal>, QueueError>;
}
