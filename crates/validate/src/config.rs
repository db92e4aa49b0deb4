//! Validation run configuration.

use chrono::Duration;
use hydroval_metrics::MetricConfig;

/// Configuration for one validation run (one comparison label).
#[derive(Debug, Clone)]
pub struct RunConfig {
    comparison: String,
    tolerance: Duration,
    metrics: MetricConfig,
}

impl RunConfig {
    /// Creates a run config for the given comparison label
    /// (e.g. "model_vs_usgs").
    pub fn new(comparison: impl Into<String>) -> Self {
        Self {
            comparison: comparison.into(),
            tolerance: Duration::zero(),
            metrics: MetricConfig::default(),
        }
    }

    /// Set the alignment tolerance. Zero requires exact timestamp matches.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the metric engine configuration.
    pub fn with_metrics(mut self, metrics: MetricConfig) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the comparison label.
    pub fn comparison(&self) -> &str {
        &self.comparison
    }

    /// Returns the alignment tolerance.
    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Returns the metric configuration.
    pub fn metrics(&self) -> &MetricConfig {
        &self.metrics
    }
}
