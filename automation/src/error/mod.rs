pub mod flow;

use thiserror::Error;

pub use flow::{FlowError, FlowResult, JoinedError};

/// Result type for automation operations
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Error types for the automation engine
#[derive(Error, Debug)]
pub enum AutomationError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scheduler error: {0}")]
    SchedulerError(#[from] SchedulerError),

    #[error("Flow error: {0}")]
    FlowError(#[from] FlowError),

    /// A scheduler task panicked or was aborted
    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// `start` was called on a scheduler whose previous run has not stopped
    #[error("Flow {0} is already running")]
    AlreadyRunning(String),

    #[error("Mutex poison error: {0}")]
    MutexPoisonError(String),
}
