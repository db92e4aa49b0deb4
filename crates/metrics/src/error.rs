//! Metric engine error types.

/// Errors that can occur while computing goodness-of-fit metrics.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    /// Too few aligned pairs to compute variance-based metrics.
    #[error("insufficient data: {n} aligned pair(s), need at least {min}")]
    InsufficientData { n: usize, min: usize },

    /// A metric's denominator is zero or otherwise undefined.
    #[error("{metric} undefined: {reason}")]
    Undefined {
        metric: &'static str,
        reason: String,
    },
}
