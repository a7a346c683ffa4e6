//! Engine metrics
//!
//! Prometheus counters and histograms for placement and settlement. Each
//! collector owns its registry; nothing registers against the process-wide
//! default, so tests can build engines freely.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector for the settlement engine
#[derive(Clone)]
pub struct Metrics {
    /// Bets placed successfully
    pub bets_placed: IntCounter,

    /// Placements rejected for funds or failed against the store
    pub place_failures: IntCounter,

    /// Bets settled to a terminal status
    pub bets_settled: IntCounter,

    /// Settlement attempts that failed and left the bet pending
    pub settlement_failures: IntCounter,

    /// Placement latency
    pub place_duration: Histogram,

    /// Settlement pass latency
    pub settle_duration: Histogram,

    /// Registry holding all of the above
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create a collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let bets_placed = register_int_counter_with_registry!(
            Opts::new("betrail_bets_placed_total", "Bets placed successfully"),
            registry
        )?;

        let place_failures = register_int_counter_with_registry!(
            Opts::new(
                "betrail_place_failures_total",
                "Placements rejected for funds or failed against the store"
            ),
            registry
        )?;

        let bets_settled = register_int_counter_with_registry!(
            Opts::new(
                "betrail_bets_settled_total",
                "Bets settled to a terminal status"
            ),
            registry
        )?;

        let settlement_failures = register_int_counter_with_registry!(
            Opts::new(
                "betrail_settlement_failures_total",
                "Settlement attempts that failed and left the bet pending"
            ),
            registry
        )?;

        let place_duration = register_histogram_with_registry!(
            HistogramOpts::new(
                "betrail_place_duration_seconds",
                "Placement latency in seconds"
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            registry
        )?;

        let settle_duration = register_histogram_with_registry!(
            HistogramOpts::new(
                "betrail_settle_duration_seconds",
                "Settlement pass latency in seconds"
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            registry
        )?;

        Ok(Self {
            bets_placed,
            place_failures,
            bets_settled,
            settlement_failures,
            place_duration,
            settle_duration,
            registry,
        })
    }

    /// Record a successful placement
    pub fn record_placement(&self, duration_secs: f64) {
        self.bets_placed.inc();
        self.place_duration.observe(duration_secs);
    }

    /// Record a failed placement
    pub fn record_place_failure(&self) {
        self.place_failures.inc();
    }

    /// Record a settlement pass that settled `count` bets
    pub fn record_settlement(&self, count: usize, duration_secs: f64) {
        self.bets_settled.inc_by(count as u64);
        self.settle_duration.observe(duration_secs);
    }

    /// Record a per-bet settlement failure
    pub fn record_settlement_failure(&self) {
        self.settlement_failures.inc();
    }

    /// Export all metrics in Prometheus text format
    pub fn export(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_placement() {
        let metrics = Metrics::new().unwrap();
        metrics.record_placement(0.002);
        metrics.record_placement(0.004);
        metrics.record_place_failure();

        assert_eq!(metrics.bets_placed.get(), 2);
        assert_eq!(metrics.place_failures.get(), 1);
        assert_eq!(metrics.place_duration.get_sample_count(), 2);
    }

    #[test]
    fn test_record_settlement() {
        let metrics = Metrics::new().unwrap();
        metrics.record_settlement(3, 0.01);
        metrics.record_settlement_failure();

        assert_eq!(metrics.bets_settled.get(), 3);
        assert_eq!(metrics.settlement_failures.get(), 1);
    }

    #[test]
    fn test_export_contains_metric_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_placement(0.001);

        let output = metrics.export().unwrap();
        assert!(output.contains("betrail_bets_placed_total"));
        assert!(output.contains("betrail_place_duration_seconds"));
    }

    #[test]
    fn test_collectors_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.record_placement(0.001);

        assert_eq!(a.bets_placed.get(), 1);
        assert_eq!(b.bets_placed.get(), 0);
    }
}
