// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    Histogram, IntCounter, IntCounterVec,
};

// --- Metric Statics ---
// Each collector is set exactly once by `install`.

static CONSENSUS_HEADERS_VERIFIED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static CONSENSUS_HEADERS_REJECTED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static CONSENSUS_VERIFY_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static REWARDS_DISTRIBUTED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static REWARDS_SATURATED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Fetches a collector, or returns from the calling method if `install()` has not run.
macro_rules! get_metric {
    ($metric:ident) => {
        match $metric.get() {
            Some(metric) => metric,
            None => return,
        }
    };
}

impl ConsensusMetricsSink for PrometheusSink {
    fn inc_headers_verified(&self) {
        get_metric!(CONSENSUS_HEADERS_VERIFIED_TOTAL).inc();
    }
    fn inc_header_rejected(&self, mechanism: &'static str) {
        get_metric!(CONSENSUS_HEADERS_REJECTED_TOTAL)
            .with_label_values(&[mechanism])
            .inc();
    }
    fn observe_verify_duration(&self, duration_secs: f64) {
        get_metric!(CONSENSUS_VERIFY_DURATION_SECONDS).observe(duration_secs);
    }
}

impl RewardMetricsSink for PrometheusSink {
    fn inc_rewards_distributed(&self) {
        get_metric!(REWARDS_DISTRIBUTED_TOTAL).inc();
    }
    fn inc_reward_saturated(&self) {
        get_metric!(REWARDS_SATURATED_TOTAL).inc();
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        get_metric!(ERRORS_TOTAL)
            .with_label_values(&[kind, variant])
            .inc();
    }
}

/// Registers every collector with the default registry and returns the sink.
/// Must be called at most once per process.
#[allow(clippy::expect_used)]
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    CONSENSUS_HEADERS_VERIFIED_TOTAL
        .set(register_int_counter!(
            "tandem_consensus_headers_verified_total",
            "Total headers that passed hybrid validation."
        )?)
        .expect("static already initialized");
    CONSENSUS_HEADERS_REJECTED_TOTAL
        .set(register_int_counter_vec!(
            "tandem_consensus_headers_rejected_total",
            "Total headers rejected, by the mechanism that rejected them.",
            &["mechanism"]
        )?)
        .expect("static already initialized");
    CONSENSUS_VERIFY_DURATION_SECONDS
        .set(register_histogram!(
            "tandem_consensus_verify_duration_seconds",
            "Latency of a single header verification.",
            exponential_buckets(0.00005, 2.0, 15)?
        )?)
        .expect("static already initialized");
    REWARDS_DISTRIBUTED_TOTAL
        .set(register_int_counter!(
            "tandem_rewards_distributed_total",
            "Total block rewards credited to proposers."
        )?)
        .expect("static already initialized");
    REWARDS_SATURATED_TOTAL
        .set(register_int_counter!(
            "tandem_rewards_saturated_total",
            "Total block rewards clamped to the 256-bit maximum."
        )?)
        .expect("static already initialized");
    ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "tandem_errors_total",
            "Total number of errors, categorized by kind and code.",
            &["kind", "variant"]
        )?)
        .expect("static already initialized");

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}
