//! Summary table structures and JSON serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hydroval_metrics::MetricRecord;

use crate::error::ValidateError;

/// Result for one site: either a computed metric record or an explicit
/// skip with the reason. A skip is data, not a failure of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SiteOutcome {
    Computed {
        group: String,
        metrics: MetricRecord,
    },
    Skipped {
        group: String,
        reason: String,
    },
}

impl SiteOutcome {
    /// The region/state grouping key.
    pub fn group(&self) -> &str {
        match self {
            SiteOutcome::Computed { group, .. } | SiteOutcome::Skipped { group, .. } => group,
        }
    }

    /// The metric record, if the site was computed.
    pub fn metrics(&self) -> Option<&MetricRecord> {
        match self {
            SiteOutcome::Computed { metrics, .. } => Some(metrics),
            SiteOutcome::Skipped { .. } => None,
        }
    }
}

/// Mean or median of each metric over a group's computed sites.
///
/// A field is `None` when no site in the group had that metric defined.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub nse: Option<f64>,
    pub log_nse: Option<f64>,
    pub kge: Option<f64>,
    pub pbias: Option<f64>,
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
    pub log_rmse: Option<f64>,
    pub r: Option<f64>,
    pub r2: Option<f64>,
    pub categorical_accuracy: Option<f64>,
}

/// Aggregate statistics for one region/state group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAggregate {
    /// Sites with a computed metric record.
    pub n_sites: usize,
    /// Sites recorded as skipped.
    pub n_skipped: usize,
    pub mean: AggregateStats,
    pub median: AggregateStats,
}

/// Full output of one validation run: per-site outcomes keyed by site
/// identifier plus per-group aggregates, both in `BTreeMap`s so that
/// iteration (and therefore serialization and aggregate summation order)
/// is stable for identical inputs.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Comparison label (e.g. "model_vs_usgs").
    pub comparison: String,
    pub sites: BTreeMap<String, SiteOutcome>,
    pub groups: BTreeMap<String, GroupAggregate>,
}

impl SummaryTable {
    /// Number of computed sites across all groups.
    pub fn n_computed(&self) -> usize {
        self.sites.values().filter(|o| o.metrics().is_some()).count()
    }

    /// Number of skipped sites across all groups.
    pub fn n_skipped(&self) -> usize {
        self.sites.len() - self.n_computed()
    }
}

/// Serialize a summary table to pretty JSON.
pub fn to_json(table: &SummaryTable) -> Result<String, ValidateError> {
    serde_json::to_string_pretty(table).map_err(|e| ValidateError::Serialization {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MetricRecord {
        MetricRecord {
            n: 4,
            nse: Some(0.5),
            log_nse: None,
            kge: Some(0.4),
            pbias: Some(-3.0),
            rmse: 12.0,
            mae: 9.0,
            log_rmse: None,
            r: Some(0.8),
            r2: Some(0.64),
            categorical_accuracy: 0.75,
        }
    }

    #[test]
    fn test_outcome_accessors() {
        let computed = SiteOutcome::Computed {
            group: "TX".to_string(),
            metrics: record(),
        };
        assert_eq!(computed.group(), "TX");
        assert!(computed.metrics().is_some());

        let skipped = SiteOutcome::Skipped {
            group: "CA".to_string(),
            reason: "no observed series".to_string(),
        };
        assert_eq!(skipped.group(), "CA");
        assert!(skipped.metrics().is_none());
    }

    #[test]
    fn test_counts() {
        let mut sites = BTreeMap::new();
        sites.insert(
            "a".to_string(),
            SiteOutcome::Computed {
                group: "TX".to_string(),
                metrics: record(),
            },
        );
        sites.insert(
            "b".to_string(),
            SiteOutcome::Skipped {
                group: "TX".to_string(),
                reason: "no overlapping timestamps".to_string(),
            },
        );
        let table = SummaryTable {
            comparison: "model_vs_usgs".to_string(),
            sites,
            groups: BTreeMap::new(),
        };
        assert_eq!(table.n_computed(), 1);
        assert_eq!(table.n_skipped(), 1);
    }

    #[test]
    fn test_to_json_tags_status() {
        let mut sites = BTreeMap::new();
        sites.insert(
            "a".to_string(),
            SiteOutcome::Skipped {
                group: "NC".to_string(),
                reason: "no predicted series".to_string(),
            },
        );
        let table = SummaryTable {
            comparison: "nwm_vs_usgs".to_string(),
            sites,
            groups: BTreeMap::new(),
        };

        let json = to_json(&table).unwrap();
        assert!(json.contains("\"comparison\": \"nwm_vs_usgs\""));
        assert!(json.contains("\"status\": \"skipped\""));
        assert!(json.contains("\"reason\": \"no predicted series\""));
    }
}
