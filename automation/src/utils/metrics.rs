use once_cell::sync::Lazy;
use opentelemetry::global;
use opentelemetry::metrics::{Counter, Histogram, Meter};

pub static AUTOMATION_METRICS: Lazy<AutomationMetrics> = Lazy::new(AutomationMetrics::register);

pub struct AutomationMetrics {
    pub flow_passes: Counter<u64>,
    pub flow_pass_failures: Counter<u64>,
    pub flow_pass_duration: Histogram<f64>,
    pub classified_results: Counter<u64>,
}

impl AutomationMetrics {
    pub fn register() -> Self {
        let meter: Meter = global::meter("crates.keeper-automation.opentelemetry");

        let flow_passes = meter
            .u64_counter("flow_passes")
            .with_description("Count of pipeline passes started per flow")
            .with_unit("passes")
            .init();

        let flow_pass_failures = meter
            .u64_counter("flow_pass_failures")
            .with_description("Count of pipeline passes that ended in an error per flow")
            .with_unit("passes")
            .init();

        let flow_pass_duration = meter
            .f64_histogram("flow_pass_duration")
            .with_description("Time taken by a pipeline pass")
            .with_unit("s")
            .init();

        let classified_results = meter
            .u64_counter("classified_results")
            .with_description("Count of check results routed by each post-processor")
            .with_unit("results")
            .init();

        Self { flow_passes, flow_pass_failures, flow_pass_duration, classified_results }
    }
}
