use async_trait::async_trait;
use thiserror::Error;

use crate::types::{CheckResult, UpkeepPayload};

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Check pipeline unavailable: {0}")]
    Unavailable(String),

    #[error("Runner returned {got} results for {expected} payloads")]
    ResultCountMismatch { expected: usize, got: usize },

    #[error("Runner error: {0}")]
    Other(String),
}

/// Evaluates whether upkeeps are eligible to perform.
///
/// Implementations must return exactly one result per input payload (in any
/// order) or fail the whole batch. Must be safe for concurrent use: passes of
/// different flows, and overlapping passes of the same flow, call it at the
/// same time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runner: Send + Sync {
    async fn check_upkeeps(&self, payloads: Vec<UpkeepPayload>) -> Result<Vec<CheckResult>, RunnerError>;
}
