use clap::Args;

fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if value == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(value)
}

fn parse_positive_u64(s: &str) -> Result<u64, String> {
    let value: u64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if value == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(value)
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a valid ratio", s))?;
    if value.is_nan() || value <= 0.0 || value > 1.0 {
        return Err("ratio must be in (0, 1]".to_string());
    }
    Ok(value)
}

#[derive(Debug, Clone, Args)]
pub struct FlowCliArgs {
    /// Tick interval of the conditional proposal flow.
    #[arg(env = "KEEPER_AUTOMATION_CONDITIONAL_PROPOSAL_INTERVAL_MS", long, default_value = "3000", value_parser = parse_positive_u64)]
    pub conditional_proposal_interval_ms: u64,

    /// Tick interval of the conditional final flow.
    #[arg(env = "KEEPER_AUTOMATION_CONDITIONAL_FINAL_INTERVAL_MS", long, default_value = "1000", value_parser = parse_positive_u64)]
    pub conditional_final_interval_ms: u64,

    /// Tick interval of the log trigger flow.
    #[arg(env = "KEEPER_AUTOMATION_LOG_TRIGGER_INTERVAL_MS", long, default_value = "1000", value_parser = parse_positive_u64)]
    pub log_trigger_interval_ms: u64,

    /// Tick interval of the retry flow.
    #[arg(env = "KEEPER_AUTOMATION_RETRY_INTERVAL_MS", long, default_value = "5000", value_parser = parse_positive_u64)]
    pub retry_interval_ms: u64,

    /// Tick interval of the recovery proposal flow.
    #[arg(env = "KEEPER_AUTOMATION_RECOVERY_PROPOSAL_INTERVAL_MS", long, default_value = "1000", value_parser = parse_positive_u64)]
    pub recovery_proposal_interval_ms: u64,

    /// Tick interval of the recovery final flow.
    #[arg(env = "KEEPER_AUTOMATION_RECOVERY_FINAL_INTERVAL_MS", long, default_value = "1000", value_parser = parse_positive_u64)]
    pub recovery_final_interval_ms: u64,

    /// Hard time limit for one pipeline pass, in seconds.
    #[arg(env = "KEEPER_AUTOMATION_PASS_TIME_LIMIT_SECONDS", long, default_value = "20", value_parser = parse_positive_u64)]
    pub pass_time_limit_seconds: u64,

    /// Share of active conditional upkeeps sampled per round. Must be in (0, 1].
    #[arg(env = "KEEPER_AUTOMATION_SAMPLING_RATIO", long, default_value = "0.3", value_parser = parse_ratio)]
    pub sampling_ratio: f64,

    /// Maximum number of conditional upkeeps sampled per round.
    #[arg(env = "KEEPER_AUTOMATION_MAX_SAMPLED", long, default_value = "300")]
    pub max_sampled: usize,

    /// Proposals dequeued per conditional final pass. Must be greater than 0.
    #[arg(env = "KEEPER_AUTOMATION_CONDITIONAL_FINAL_BATCH_SIZE", long, default_value = "10", value_parser = parse_positive_usize)]
    pub conditional_final_batch_size: usize,

    /// Proposals dequeued per recovery final pass. Must be greater than 0.
    #[arg(env = "KEEPER_AUTOMATION_RECOVERY_FINAL_BATCH_SIZE", long, default_value = "5", value_parser = parse_positive_usize)]
    pub recovery_final_batch_size: usize,

    /// Records dequeued per retry pass. Must be greater than 0.
    #[arg(env = "KEEPER_AUTOMATION_RETRY_BATCH_SIZE", long, default_value = "5", value_parser = parse_positive_usize)]
    pub retry_batch_size: usize,

    /// Enable the off-chain data lookup for evaluated payloads.
    #[arg(env = "KEEPER_AUTOMATION_LOOKUP_ENABLED", long, default_value_t = false)]
    pub lookup_enabled: bool,
}
