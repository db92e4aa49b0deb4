//! Goodness-of-fit formulas over paired observed/predicted values.
//!
//! Each fallible formula signals [`MetricError::Undefined`] when a
//! denominator vanishes instead of returning NaN; callers decide whether
//! an undefined metric is recorded as missing or surfaced as a failure.

use crate::error::MetricError;

fn check_pairs(obs: &[f64], pred: &[f64]) -> Result<(), MetricError> {
    debug_assert_eq!(obs.len(), pred.len());
    if obs.len() < 2 {
        return Err(MetricError::InsufficientData {
            n: obs.len(),
            min: 2,
        });
    }
    Ok(())
}

/// Nash-Sutcliffe Efficiency: 1 - sum((obs-pred)^2) / sum((obs-mean(obs))^2).
///
/// # Errors
///
/// [`MetricError::Undefined`] when the observed series is constant (zero
/// denominator); [`MetricError::InsufficientData`] for fewer than 2 pairs.
pub fn nse(obs: &[f64], pred: &[f64]) -> Result<f64, MetricError> {
    check_pairs(obs, pred)?;

    let mean_obs = hydroval_stats::mean(obs);
    let ss_res: f64 = obs
        .iter()
        .zip(pred.iter())
        .map(|(o, p)| (o - p) * (o - p))
        .sum();
    let ss_tot: f64 = obs.iter().map(|o| (o - mean_obs) * (o - mean_obs)).sum();

    if ss_tot == 0.0 {
        return Err(MetricError::Undefined {
            metric: "nse",
            reason: "constant observed series".to_string(),
        });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// NSE over log-transformed flows: `ln(value + epsilon)` on both series,
/// restricted to pairs where both values are non-negative.
///
/// # Errors
///
/// [`MetricError::Undefined`] when fewer than 2 non-negative pairs remain
/// or the transformed observations are constant.
pub fn log_nse(obs: &[f64], pred: &[f64], epsilon: f64) -> Result<f64, MetricError> {
    check_pairs(obs, pred)?;

    let (log_obs, log_pred) = log_transform(obs, pred, epsilon);
    if log_obs.len() < 2 {
        return Err(MetricError::Undefined {
            metric: "log_nse",
            reason: format!("{} non-negative pair(s), need at least 2", log_obs.len()),
        });
    }

    nse(&log_obs, &log_pred).map_err(|e| match e {
        MetricError::Undefined { reason, .. } => MetricError::Undefined {
            metric: "log_nse",
            reason,
        },
        other => other,
    })
}

/// Kling-Gupta Efficiency: 1 - sqrt((r-1)^2 + (alpha-1)^2 + (beta-1)^2)
/// with r = Pearson(obs, pred), alpha = sd(pred)/sd(obs),
/// beta = mean(pred)/mean(obs).
///
/// # Errors
///
/// [`MetricError::Undefined`] when sd(obs) = 0, mean(obs) = 0, or the
/// correlation itself is undefined (constant predictions).
pub fn kge(obs: &[f64], pred: &[f64]) -> Result<f64, MetricError> {
    check_pairs(obs, pred)?;

    let sd_obs = hydroval_stats::sd(obs);
    if sd_obs == 0.0 {
        return Err(MetricError::Undefined {
            metric: "kge",
            reason: "zero observed standard deviation".to_string(),
        });
    }
    let mean_obs = hydroval_stats::mean(obs);
    if mean_obs == 0.0 {
        return Err(MetricError::Undefined {
            metric: "kge",
            reason: "zero observed mean".to_string(),
        });
    }
    let r = hydroval_stats::pearson_correlation(obs, pred).ok_or_else(|| {
        MetricError::Undefined {
            metric: "kge",
            reason: "correlation undefined".to_string(),
        }
    })?;

    let alpha = hydroval_stats::sd(pred) / sd_obs;
    let beta = hydroval_stats::mean(pred) / mean_obs;
    let ed = ((r - 1.0).powi(2) + (alpha - 1.0).powi(2) + (beta - 1.0).powi(2)).sqrt();
    Ok(1.0 - ed)
}

/// Percent bias: 100 * sum(pred - obs) / sum(obs).
///
/// # Errors
///
/// [`MetricError::Undefined`] when sum(obs) = 0.
pub fn pbias(obs: &[f64], pred: &[f64]) -> Result<f64, MetricError> {
    check_pairs(obs, pred)?;

    let sum_obs: f64 = obs.iter().sum();
    if sum_obs == 0.0 {
        return Err(MetricError::Undefined {
            metric: "pbias",
            reason: "zero observed sum".to_string(),
        });
    }
    let sum_err: f64 = obs.iter().zip(pred.iter()).map(|(o, p)| p - o).sum();
    Ok(100.0 * sum_err / sum_obs)
}

/// Root mean square error. Always defined for non-empty input.
pub fn rmse(obs: &[f64], pred: &[f64]) -> f64 {
    assert_eq!(obs.len(), pred.len());
    assert!(!obs.is_empty(), "rmse: input must not be empty");
    let ms: f64 = obs
        .iter()
        .zip(pred.iter())
        .map(|(o, p)| (p - o) * (p - o))
        .sum::<f64>()
        / obs.len() as f64;
    ms.sqrt()
}

/// Mean absolute error. Always defined for non-empty input.
pub fn mae(obs: &[f64], pred: &[f64]) -> f64 {
    assert_eq!(obs.len(), pred.len());
    assert!(!obs.is_empty(), "mae: input must not be empty");
    obs.iter()
        .zip(pred.iter())
        .map(|(o, p)| (p - o).abs())
        .sum::<f64>()
        / obs.len() as f64
}

/// RMSE over log-transformed flows, restricted to non-negative pairs.
/// Returns `None` when fewer than 2 such pairs remain.
pub fn log_rmse(obs: &[f64], pred: &[f64], epsilon: f64) -> Option<f64> {
    let (log_obs, log_pred) = log_transform(obs, pred, epsilon);
    if log_obs.len() < 2 {
        return None;
    }
    Some(rmse(&log_obs, &log_pred))
}

/// Keeps pairs where both flows are non-negative and maps both through
/// `ln(value + epsilon)`.
fn log_transform(obs: &[f64], pred: &[f64], epsilon: f64) -> (Vec<f64>, Vec<f64>) {
    obs.iter()
        .zip(pred.iter())
        .filter(|pair| *pair.0 >= 0.0 && *pair.1 >= 0.0)
        .map(|(o, p)| ((o + epsilon).ln(), (p + epsilon).ln()))
        .unzip()
}
