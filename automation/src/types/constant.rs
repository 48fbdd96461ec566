use std::time::Duration;

/// Hard ceiling for a single pipeline pass, independent of the tick interval.
pub const PASS_TIME_LIMIT: Duration = Duration::from_secs(20);

pub const CONDITIONAL_PROPOSAL_INTERVAL: Duration = Duration::from_secs(3);
pub const CONDITIONAL_FINAL_INTERVAL: Duration = Duration::from_secs(1);
pub const LOG_TRIGGER_INTERVAL: Duration = Duration::from_secs(1);
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5);
pub const RECOVERY_PROPOSAL_INTERVAL: Duration = Duration::from_secs(1);
pub const RECOVERY_FINAL_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on the number of active conditional upkeeps sampled per round.
pub const MAX_SAMPLED_CONDITIONALS: usize = 300;

pub const CONDITIONAL_FINAL_BATCH_SIZE: usize = 10;
pub const RECOVERY_FINAL_BATCH_SIZE: usize = 5;
pub const RETRY_BATCH_SIZE: usize = 5;

/// Delay applied to retry records that carry no interval hint of their own.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

pub const DEFAULT_RESULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_METADATA_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_QUEUE_CAPACITY: usize = 1_000;
