use itertools::Itertools;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::core::client::{ProviderError, QueueError, RunnerError, StoreError, TelemetryError};

pub type FlowResult<T> = Result<T, FlowError>;

/// Error types for a single pipeline pass. Client errors keep their own message.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// The pass did not finish within its time limit
    #[error("Pass exceeded its time limit of {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Joined(JoinedError),
}

impl FlowError {
    /// Leaf errors, with nested joins expanded in order.
    pub fn flatten(&self) -> Vec<&FlowError> {
        match self {
            FlowError::Joined(joined) => joined.errors().iter().flat_map(|error| error.flatten()).collect(),
            other => vec![other],
        }
    }

    /// Whether this error, or any error joined into it, matches `predicate`.
    pub fn contains(&self, predicate: impl Fn(&FlowError) -> bool) -> bool {
        self.flatten().into_iter().any(predicate)
    }
}

/// Ordered aggregate of errors from steps that all ran.
#[derive(Debug)]
pub struct JoinedError(Vec<FlowError>);

impl JoinedError {
    /// Collapses `errors` into one value: `Ok` when empty, the error itself
    /// when there is exactly one, a join otherwise.
    pub fn join(errors: impl IntoIterator<Item = FlowError>) -> FlowResult<()> {
        let mut errors: Vec<FlowError> = errors.into_iter().collect();
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(FlowError::Joined(JoinedError(errors))),
        }
    }

    pub fn errors(&self) -> &[FlowError] {
        &self.0
    }
}

impl fmt::Display for JoinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("; "))
    }
}

impl std::error::Error for JoinedError {}
