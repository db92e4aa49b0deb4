//! Metric engine configuration.

/// Configuration for the metric engine.
#[derive(Debug, Clone)]
pub struct MetricConfig {
    log_epsilon: f64,
    drought_percentile: f64,
    pluvial_percentile: f64,
    min_samples: usize,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            log_epsilon: 1e-3,
            drought_percentile: 0.25,
            pluvial_percentile: 0.75,
            min_samples: 2,
        }
    }
}

impl MetricConfig {
    /// Set the offset added before log-transforming flow values.
    pub fn with_log_epsilon(mut self, epsilon: f64) -> Self {
        self.log_epsilon = epsilon;
        self
    }

    /// Set the observed-distribution percentile below which flow counts
    /// as drought. Clamped to [0, 1].
    pub fn with_drought_percentile(mut self, p: f64) -> Self {
        self.drought_percentile = p.clamp(0.0, 1.0);
        self
    }

    /// Set the observed-distribution percentile above which flow counts
    /// as pluvial. Clamped to [0, 1].
    pub fn with_pluvial_percentile(mut self, p: f64) -> Self {
        self.pluvial_percentile = p.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum aligned-pair count required before computing metrics.
    ///
    /// Values below 2 are clamped to 2; variance-based metrics are
    /// undefined for fewer points.
    pub fn with_min_samples(mut self, n: usize) -> Self {
        self.min_samples = n.max(2);
        self
    }

    /// Returns the log-transform offset.
    pub fn log_epsilon(&self) -> f64 {
        self.log_epsilon
    }

    /// Returns the drought percentile.
    pub fn drought_percentile(&self) -> f64 {
        self.drought_percentile
    }

    /// Returns the pluvial percentile.
    pub fn pluvial_percentile(&self) -> f64 {
        self.pluvial_percentile
    }

    /// Returns the minimum sample count.
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }
}
