//! Prometheus metrics for transaction classification.

use prometheus::{IntCounter, IntCounterVec, Encoder, Opts, Registry, TextEncoder};

/// Metrics collector for the classifier.
///
/// Each instance owns its registry, so several classifiers can run in one
/// process without colliding on metric names.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    classifications: IntCounterVec,
    order_decode_failures: IntCounterVec,
    token_lookup_failures: IntCounter,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let classifications = IntCounterVec::new(
            Opts::new(
                "safe_txinfo_classifications_total",
                "Total number of classified transactions by category",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(classifications.clone()))?;

        let order_decode_failures = IntCounterVec::new(
            Opts::new(
                "safe_txinfo_order_decode_failures_total",
                "Total number of orders found by a probe but not decoded",
            ),
            &["detector"],
        )?;
        registry.register(Box::new(order_decode_failures.clone()))?;

        let token_lookup_failures = IntCounter::new(
            "safe_txinfo_token_lookup_failures_total",
            "Total number of failed token type lookups",
        )?;
        registry.register(Box::new(token_lookup_failures.clone()))?;

        Ok(Self {
            registry,
            classifications,
            order_decode_failures,
            token_lookup_failures,
        })
    }

    /// Count one classification result.
    pub fn inc_classification(&self, kind: &str) {
        self.classifications.with_label_values(&[kind]).inc();
    }

    /// Count a decode failure after a successful probe.
    pub fn inc_order_decode_failures(&self, detector: &str) {
        self.order_decode_failures.with_label_values(&[detector]).inc();
    }

    pub fn inc_token_lookup_failures(&self) {
        self.token_lookup_failures.inc();
    }

    pub fn classifications(&self, kind: &str) -> u64 {
        self.classifications.with_label_values(&[kind]).get()
    }

    pub fn order_decode_failures(&self, detector: &str) -> u64 {
        self.order_decode_failures.with_label_values(&[detector]).get()
    }

    pub fn token_lookup_failures(&self) -> u64 {
        self.token_lookup_failures.get()
    }

    /// Get Prometheus metrics as a string.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
