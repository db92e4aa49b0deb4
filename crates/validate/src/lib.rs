//! # hydroval-validate
//!
//! The per-site validation runner. Takes site metadata plus observed and
//! predicted series maps, aligns and scores each site, and aggregates the
//! per-site records into a summary table grouped by region.

mod config;
mod error;
mod output;

pub use config::RunConfig;
pub use error::{SiteError, ValidateError};
pub use output::{AggregateStats, GroupAggregate, SiteOutcome, SummaryTable, to_json};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use hydroval_metrics::MetricRecord;
use hydroval_series::{TimeSeries, align};

/// Site identity and grouping key as supplied by the caller.
///
/// The group is input metadata (a US state in the stock pipeline); the
/// runner never computes it.
#[derive(Debug, Clone)]
pub struct SiteEntry {
    pub id: String,
    pub group: String,
}

impl SiteEntry {
    pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
        }
    }
}

/// Runs one comparison over all sites.
///
/// Per-site computation is independent, so sites fan out across a rayon
/// pool; results are collected into `BTreeMap`s keyed by site identifier
/// before aggregation, which keeps the output stable regardless of
/// scheduling order. Sites whose series are missing, disjoint, or too
/// short become [`SiteOutcome::Skipped`] rows and never abort the run.
pub fn run(
    sites: &[SiteEntry],
    observed: &BTreeMap<String, TimeSeries>,
    predicted: &BTreeMap<String, TimeSeries>,
    config: &RunConfig,
) -> SummaryTable {
    let outcomes: Vec<(String, SiteOutcome)> = sites
        .par_iter()
        .map(|site| {
            let outcome = match validate_site(site, observed, predicted, config) {
                Ok(metrics) => SiteOutcome::Computed {
                    group: site.group.clone(),
                    metrics,
                },
                Err(e) => {
                    debug!(site = %site.id, reason = %e, "site skipped");
                    SiteOutcome::Skipped {
                        group: site.group.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            (site.id.clone(), outcome)
        })
        .collect();

    let sites_map: BTreeMap<String, SiteOutcome> = outcomes.into_iter().collect();
    let groups = aggregate(&sites_map);

    SummaryTable {
        comparison: config.comparison().to_string(),
        sites: sites_map,
        groups,
    }
}

/// Aligns and scores a single site.
fn validate_site(
    site: &SiteEntry,
    observed: &BTreeMap<String, TimeSeries>,
    predicted: &BTreeMap<String, TimeSeries>,
    config: &RunConfig,
) -> Result<MetricRecord, SiteError> {
    let obs = observed.get(&site.id).ok_or(SiteError::MissingObserved)?;
    let pred = predicted.get(&site.id).ok_or(SiteError::MissingPredicted)?;

    let pairs = align(obs, pred, config.tolerance());
    if pairs.is_empty() {
        return Err(SiteError::AlignmentEmpty);
    }

    Ok(hydroval_metrics::compute(&pairs, config.metrics())?)
}

/// Groups computed records by region key and takes mean/median per metric.
///
/// Records are visited in site-identifier order (BTreeMap iteration), so
/// floating-point summation order is fixed for identical inputs.
fn aggregate(sites: &BTreeMap<String, SiteOutcome>) -> BTreeMap<String, GroupAggregate> {
    let mut records: BTreeMap<String, Vec<&MetricRecord>> = BTreeMap::new();
    let mut skipped: BTreeMap<String, usize> = BTreeMap::new();

    for outcome in sites.values() {
        match outcome.metrics() {
            Some(m) => records.entry(outcome.group().to_string()).or_default().push(m),
            None => *skipped.entry(outcome.group().to_string()).or_default() += 1,
        }
    }

    let mut groups: BTreeMap<String, GroupAggregate> = BTreeMap::new();
    let group_keys: Vec<String> = records.keys().chain(skipped.keys()).cloned().collect();
    for group in group_keys {
        if groups.contains_key(&group) {
            continue;
        }
        let group_records = records.get(&group).map(Vec::as_slice).unwrap_or(&[]);
        let n_skipped = skipped.get(&group).copied().unwrap_or(0);

        if group_records.is_empty() {
            warn!(group = %group, "group has no valid sites; aggregates are empty");
        }

        let (mean, median) = summarize(group_records);
        groups.insert(
            group,
            GroupAggregate {
                n_sites: group_records.len(),
                n_skipped,
                mean,
                median,
            },
        );
    }

    groups
}

/// Mean and median of each metric over the records where it is present.
fn summarize(records: &[&MetricRecord]) -> (AggregateStats, AggregateStats) {
    let (nse_mean, nse_median) = stats_over(records, |r| r.nse);
    let (log_nse_mean, log_nse_median) = stats_over(records, |r| r.log_nse);
    let (kge_mean, kge_median) = stats_over(records, |r| r.kge);
    let (pbias_mean, pbias_median) = stats_over(records, |r| r.pbias);
    let (rmse_mean, rmse_median) = stats_over(records, |r| Some(r.rmse));
    let (mae_mean, mae_median) = stats_over(records, |r| Some(r.mae));
    let (log_rmse_mean, log_rmse_median) = stats_over(records, |r| r.log_rmse);
    let (r_mean, r_median) = stats_over(records, |r| r.r);
    let (r2_mean, r2_median) = stats_over(records, |r| r.r2);
    let (acc_mean, acc_median) = stats_over(records, |r| Some(r.categorical_accuracy));

    (
        AggregateStats {
            nse: nse_mean,
            log_nse: log_nse_mean,
            kge: kge_mean,
            pbias: pbias_mean,
            rmse: rmse_mean,
            mae: mae_mean,
            log_rmse: log_rmse_mean,
            r: r_mean,
            r2: r2_mean,
            categorical_accuracy: acc_mean,
        },
        AggregateStats {
            nse: nse_median,
            log_nse: log_nse_median,
            kge: kge_median,
            pbias: pbias_median,
            rmse: rmse_median,
            mae: mae_median,
            log_rmse: log_rmse_median,
            r: r_median,
            r2: r2_median,
            categorical_accuracy: acc_median,
        },
    )
}

/// Mean and median of the present values, or `(None, None)` if none.
fn stats_over(
    records: &[&MetricRecord],
    get: impl Fn(&MetricRecord) -> Option<f64>,
) -> (Option<f64>, Option<f64>) {
    let mut values: Vec<f64> = records.iter().filter_map(|&r| get(r)).collect();
    if values.is_empty() {
        return (None, None);
    }
    let mean = hydroval_stats::mean(&values);
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let median = hydroval_stats::median(&values);
    (Some(mean), Some(median))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_nse(nse: Option<f64>) -> MetricRecord {
        MetricRecord {
            n: 4,
            nse,
            log_nse: None,
            kge: None,
            pbias: None,
            rmse: 1.0,
            mae: 1.0,
            log_rmse: None,
            r: None,
            r2: None,
            categorical_accuracy: 0.5,
        }
    }

    #[test]
    fn test_stats_over_skips_missing() {
        use approx::assert_relative_eq;

        let a = record_with_nse(Some(0.2));
        let b = record_with_nse(Some(0.4));
        let c = record_with_nse(None);
        let records = vec![&a, &b, &c];

        let (mean, median) = stats_over(&records, |r| r.nse);
        assert_relative_eq!(mean.unwrap(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(median.unwrap(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_stats_over_empty() {
        let (mean, median) = stats_over(&[], |r| r.nse);
        assert!(mean.is_none());
        assert!(median.is_none());
    }

    #[test]
    fn test_aggregate_counts_skips() {
        let mut sites = BTreeMap::new();
        sites.insert(
            "a".to_string(),
            SiteOutcome::Computed {
                group: "TX".to_string(),
                metrics: record_with_nse(Some(0.3)),
            },
        );
        sites.insert(
            "b".to_string(),
            SiteOutcome::Skipped {
                group: "TX".to_string(),
                reason: "no observed series".to_string(),
            },
        );
        sites.insert(
            "c".to_string(),
            SiteOutcome::Skipped {
                group: "CA".to_string(),
                reason: "no overlapping timestamps".to_string(),
            },
        );

        let groups = aggregate(&sites);
        assert_eq!(groups["TX"].n_sites, 1);
        assert_eq!(groups["TX"].n_skipped, 1);
        assert_eq!(groups["CA"].n_sites, 0);
        assert_eq!(groups["CA"].n_skipped, 1);
        assert!(groups["CA"].mean.nse.is_none());
    }
}
