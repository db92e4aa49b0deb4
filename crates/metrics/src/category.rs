//! Flow-regime classification against observed percentile thresholds.

use serde::Serialize;

/// Flow regime bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowCategory {
    Drought,
    Normal,
    Pluvial,
}

/// Percentile thresholds derived from an observed flow distribution.
///
/// Both observed and predicted values classify against the same
/// observed-derived thresholds, so a model is scored on whether it places
/// a site in the regime the gauge actually recorded.
#[derive(Debug, Clone, Copy)]
pub struct CategoryThresholds {
    drought: f64,
    pluvial: f64,
}

impl CategoryThresholds {
    /// Computes thresholds from observed values at the given percentiles
    /// (type-7 quantiles, e.g. 0.25 and 0.75).
    ///
    /// # Panics
    ///
    /// Panics if `observed` is empty; the metric engine checks its sample
    /// floor before classifying.
    pub fn from_observed(observed: &[f64], drought_p: f64, pluvial_p: f64) -> Self {
        let mut sorted = observed.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Self {
            drought: hydroval_stats::quantile_type7(&sorted, drought_p),
            pluvial: hydroval_stats::quantile_type7(&sorted, pluvial_p),
        }
    }

    /// Buckets a flow value: below the drought threshold is drought,
    /// above the pluvial threshold is pluvial, else normal.
    pub fn classify(&self, value: f64) -> FlowCategory {
        if value < self.drought {
            FlowCategory::Drought
        } else if value > self.pluvial {
            FlowCategory::Pluvial
        } else {
            FlowCategory::Normal
        }
    }

    /// Returns the drought threshold flow.
    pub fn drought(&self) -> f64 {
        self.drought
    }

    /// Returns the pluvial threshold flow.
    pub fn pluvial(&self) -> f64 {
        self.pluvial
    }
}

/// Fraction of pairs whose observed and predicted regime buckets agree.
///
/// # Panics
///
/// Panics if the slices differ in length or are empty.
pub fn categorical_accuracy(obs: &[f64], pred: &[f64], thresholds: &CategoryThresholds) -> f64 {
    assert_eq!(obs.len(), pred.len());
    assert!(!obs.is_empty(), "categorical_accuracy: input must not be empty");
    let hits = obs
        .iter()
        .zip(pred.iter())
        .filter(|pair| thresholds.classify(*pair.0) == thresholds.classify(*pair.1))
        .count();
    hits as f64 / obs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thresholds_from_quartiles() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let th = CategoryThresholds::from_observed(&obs, 0.25, 0.75);
        assert_relative_eq!(th.drought(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(th.pluvial(), 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_classify_buckets() {
        let th = CategoryThresholds::from_observed(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.25, 0.75);
        assert_eq!(th.classify(1.0), FlowCategory::Drought);
        assert_eq!(th.classify(2.0), FlowCategory::Normal);
        assert_eq!(th.classify(3.0), FlowCategory::Normal);
        assert_eq!(th.classify(4.0), FlowCategory::Normal);
        assert_eq!(th.classify(4.5), FlowCategory::Pluvial);
    }

    #[test]
    fn test_accuracy_identical_is_one() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let th = CategoryThresholds::from_observed(&obs, 0.25, 0.75);
        assert_relative_eq!(categorical_accuracy(&obs, &obs, &th), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_accuracy_partial() {
        let obs = [1.0, 3.0, 5.0, 3.0];
        let th = CategoryThresholds::from_observed(&obs, 0.25, 0.75);
        // drought threshold 2.5, pluvial 3.5
        // obs buckets: drought, normal, pluvial, normal
        let pred = [1.0, 5.0, 5.0, 3.0];
        // pred buckets: drought, pluvial, pluvial, normal -> 3/4 agree
        assert_relative_eq!(categorical_accuracy(&obs, &pred, &th), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_observed_all_normal() {
        let obs = [5.0, 5.0, 5.0];
        let th = CategoryThresholds::from_observed(&obs, 0.25, 0.75);
        assert_eq!(th.classify(5.0), FlowCategory::Normal);
        assert_eq!(th.classify(4.0), FlowCategory::Drought);
        assert_eq!(th.classify(6.0), FlowCategory::Pluvial);
    }

    #[test]
    fn test_scale_invariance_with_recomputed_thresholds() {
        let obs = [10.0, 20.0, 30.0, 40.0];
        let pred = [12.0, 18.0, 33.0, 38.0];
        let th = CategoryThresholds::from_observed(&obs, 0.25, 0.75);
        let base = categorical_accuracy(&obs, &pred, &th);

        let obs_scaled: Vec<f64> = obs.iter().map(|v| v * 3.5).collect();
        let pred_scaled: Vec<f64> = pred.iter().map(|v| v * 3.5).collect();
        let th_scaled = CategoryThresholds::from_observed(&obs_scaled, 0.25, 0.75);
        let scaled = categorical_accuracy(&obs_scaled, &pred_scaled, &th_scaled);

        assert_relative_eq!(base, scaled, epsilon = 1e-12);
    }
}
