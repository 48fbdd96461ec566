use std::time::Duration;

use crate::cli::flow::FlowCliArgs;
use crate::error::AutomationError;
use crate::types::constant::{
    CONDITIONAL_FINAL_BATCH_SIZE, CONDITIONAL_FINAL_INTERVAL, CONDITIONAL_PROPOSAL_INTERVAL, LOG_TRIGGER_INTERVAL,
    MAX_SAMPLED_CONDITIONALS, PASS_TIME_LIMIT, RECOVERY_FINAL_BATCH_SIZE, RECOVERY_FINAL_INTERVAL,
    RECOVERY_PROPOSAL_INTERVAL, RETRY_BATCH_SIZE, RETRY_INTERVAL,
};
use crate::types::ratio::Ratio;

/// Tuning for every workflow variant running on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParams {
    pub conditional_proposal_interval: Duration,
    pub conditional_final_interval: Duration,
    pub log_trigger_interval: Duration,
    pub retry_interval: Duration,
    pub recovery_proposal_interval: Duration,
    pub recovery_final_interval: Duration,
    /// Ceiling for a single pass of any flow
    pub pass_time_limit: Duration,
    pub sampling_ratio: Ratio,
    pub max_sampled: usize,
    pub conditional_final_batch_size: usize,
    pub recovery_final_batch_size: usize,
    pub retry_batch_size: usize,
    /// Turns on the off-chain data lookup for every evaluated payload
    pub lookup_enabled: bool,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            conditional_proposal_interval: CONDITIONAL_PROPOSAL_INTERVAL,
            conditional_final_interval: CONDITIONAL_FINAL_INTERVAL,
            log_trigger_interval: LOG_TRIGGER_INTERVAL,
            retry_interval: RETRY_INTERVAL,
            recovery_proposal_interval: RECOVERY_PROPOSAL_INTERVAL,
            recovery_final_interval: RECOVERY_FINAL_INTERVAL,
            pass_time_limit: PASS_TIME_LIMIT,
            sampling_ratio: Ratio::default(),
            max_sampled: MAX_SAMPLED_CONDITIONALS,
            conditional_final_batch_size: CONDITIONAL_FINAL_BATCH_SIZE,
            recovery_final_batch_size: RECOVERY_FINAL_BATCH_SIZE,
            retry_batch_size: RETRY_BATCH_SIZE,
            lookup_enabled: false,
        }
    }
}

impl TryFrom<FlowCliArgs> for FlowParams {
    type Error = AutomationError;

    fn try_from(args: FlowCliArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            conditional_proposal_interval: Duration::from_millis(args.conditional_proposal_interval_ms),
            conditional_final_interval: Duration::from_millis(args.conditional_final_interval_ms),
            log_trigger_interval: Duration::from_millis(args.log_trigger_interval_ms),
            retry_interval: Duration::from_millis(args.retry_interval_ms),
            recovery_proposal_interval: Duration::from_millis(args.recovery_proposal_interval_ms),
            recovery_final_interval: Duration::from_millis(args.recovery_final_interval_ms),
            pass_time_limit: Duration::from_secs(args.pass_time_limit_seconds),
            sampling_ratio: Ratio::new(args.sampling_ratio)?,
            max_sampled: args.max_sampled,
            conditional_final_batch_size: args.conditional_final_batch_size,
            recovery_final_batch_size: args.recovery_final_batch_size,
            retry_batch_size: args.retry_batch_size,
            lookup_enabled: args.lookup_enabled,
        })
    }
}
