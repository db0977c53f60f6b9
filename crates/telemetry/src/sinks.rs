// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the configured consensus metrics sink, or a no-op sink if none is set.
pub fn consensus_metrics() -> &'static dyn ConsensusMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured reward metrics sink, or a no-op sink if none is set.
pub fn reward_metrics() -> &'static dyn RewardMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured error metrics sink, or a no-op sink if none is set.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics related to header validation.
pub trait ConsensusMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter for headers that passed validation.
    fn inc_headers_verified(&self);
    /// Increments the counter for rejected headers, labeled by the mechanism that
    /// rejected them.
    fn inc_header_rejected(&self, mechanism: &'static str);
    /// Observes the duration of a single header verification.
    fn observe_verify_duration(&self, duration_secs: f64);
}
impl ConsensusMetricsSink for NopSink {
    fn inc_headers_verified(&self) {}
    fn inc_header_rejected(&self, _mechanism: &'static str) {}
    fn observe_verify_duration(&self, _duration_secs: f64) {}
}

/// A sink for metrics related to block reward distribution.
pub trait RewardMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter for rewards credited to a proposer.
    fn inc_rewards_distributed(&self);
    /// Increments the counter for rewards clamped to the 256-bit maximum.
    fn inc_reward_saturated(&self);
}
impl RewardMetricsSink for NopSink {
    fn inc_rewards_distributed(&self) {}
    fn inc_reward_saturated(&self) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and code.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: ConsensusMetricsSink + RewardMetricsSink + ErrorMetricsSink {}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T where T: ConsensusMetricsSink + RewardMetricsSink + ErrorMetricsSink {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_fall_back_to_nop() {
        // Nothing in this crate's unit tests installs a global sink.
        consensus_metrics().inc_headers_verified();
        consensus_metrics().inc_header_rejected("authority");
        reward_metrics().inc_reward_saturated();
        error_metrics().inc_error("header", "HEADER_UNKNOWN_ANCESTOR");
        assert!(SINK.get().is_none());
    }
}
