//! Per-(site, model-pair) metric record.

use serde::{Deserialize, Serialize};

/// Goodness-of-fit metrics for one aligned (observed, predicted) pair
/// sequence.
///
/// Metrics whose formula can be undefined (zero-denominator cases) are
/// `Option<f64>`: `None` means "undefined for this data", which is never
/// conflated with a computed zero. RMSE and MAE are always defined at the
/// engine's sample floor. Records are write-once; nothing recomputes or
/// mutates them after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Number of aligned pairs the metrics were computed from.
    pub n: usize,
    /// Nash-Sutcliffe Efficiency.
    pub nse: Option<f64>,
    /// NSE over log-transformed flows.
    pub log_nse: Option<f64>,
    /// Kling-Gupta Efficiency.
    pub kge: Option<f64>,
    /// Percent bias.
    pub pbias: Option<f64>,
    /// Root mean square error (CFS).
    pub rmse: f64,
    /// Mean absolute error (CFS).
    pub mae: f64,
    /// RMSE over log-transformed flows.
    pub log_rmse: Option<f64>,
    /// Pearson correlation coefficient.
    pub r: Option<f64>,
    /// Squared Pearson correlation.
    pub r2: Option<f64>,
    /// Fraction of pairs whose drought/normal/pluvial buckets agree.
    pub categorical_accuracy: f64,
}
