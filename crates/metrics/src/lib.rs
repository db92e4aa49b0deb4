//! # hydroval-metrics
//!
//! The metric engine: turns a sequence of aligned (observed, predicted)
//! flow pairs into a [`MetricRecord`] of hydrological goodness-of-fit
//! metrics plus a drought/normal/pluvial classification score.

mod category;
mod config;
mod error;
mod formulas;
mod record;

pub use category::{CategoryThresholds, FlowCategory, categorical_accuracy};
pub use config::MetricConfig;
pub use error::MetricError;
pub use formulas::{kge, log_nse, log_rmse, mae, nse, pbias, rmse};
pub use record::MetricRecord;

use hydroval_series::AlignedPair;

/// Computes the full metric record for one site's aligned pairs.
///
/// Formulas that hit a zero denominator are recorded as `None` rather
/// than propagated: the per-metric functions signal
/// [`MetricError::Undefined`], and this entry point is the caller that
/// decides to record those as missing.
///
/// # Errors
///
/// Returns [`MetricError::InsufficientData`] when there are fewer pairs
/// than the configured floor (at minimum 2; variance-based metrics are
/// undefined below that).
pub fn compute(pairs: &[AlignedPair], config: &MetricConfig) -> Result<MetricRecord, MetricError> {
    if pairs.len() < config.min_samples() {
        return Err(MetricError::InsufficientData {
            n: pairs.len(),
            min: config.min_samples(),
        });
    }

    let obs: Vec<f64> = pairs.iter().map(|p| p.observed).collect();
    let pred: Vec<f64> = pairs.iter().map(|p| p.predicted).collect();

    let r = hydroval_stats::pearson_correlation(&obs, &pred);
    let thresholds = CategoryThresholds::from_observed(
        &obs,
        config.drought_percentile(),
        config.pluvial_percentile(),
    );

    Ok(MetricRecord {
        n: pairs.len(),
        nse: optional(formulas::nse(&obs, &pred))?,
        log_nse: optional(formulas::log_nse(&obs, &pred, config.log_epsilon()))?,
        kge: optional(formulas::kge(&obs, &pred))?,
        pbias: optional(formulas::pbias(&obs, &pred))?,
        rmse: formulas::rmse(&obs, &pred),
        mae: formulas::mae(&obs, &pred),
        log_rmse: formulas::log_rmse(&obs, &pred, config.log_epsilon()),
        r,
        r2: r.map(|v| v * v),
        categorical_accuracy: categorical_accuracy(&obs, &pred, &thresholds),
    })
}

/// Maps an undefined metric to a missing value; other errors propagate.
fn optional(result: Result<f64, MetricError>) -> Result<Option<f64>, MetricError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(MetricError::Undefined { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
