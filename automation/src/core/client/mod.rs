// Client abstractions module - contains all collaborator interface traits

pub mod provider;
pub mod queue;
pub mod runner;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use provider::{ConditionalUpkeepProvider, LogEventProvider, PayloadBuilder, ProviderError, RecoverableProvider};
pub use queue::{
    memory::{InMemoryProposalQueue, InMemoryRetryQueue},
    ProposalQueue, QueueError, RetryQueue, RetryRecord,
};
pub use runner::{Runner, RunnerError};
pub use store::{
    memory::{InMemoryMetadataStore, InMemoryResultStore},
    MetadataStore, ResultStore, StoreError, UpkeepStateUpdater,
};
pub use telemetry::{TelemetryCollector, TelemetryError, TracingTelemetryCollector};
