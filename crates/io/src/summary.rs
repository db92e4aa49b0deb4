//! Summary table CSV writer.
//!
//! One row per site (computed or skipped, with the skip reason) followed
//! by two rows per group (mean and median aggregates). Row order follows
//! the summary table's BTreeMaps, so repeated runs over identical inputs
//! produce identical bytes.

use std::path::Path;

use serde::Serialize;

use hydroval_validate::{AggregateStats, SiteOutcome, SummaryTable};

use crate::error::IoError;

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    kind: &'a str,
    id: &'a str,
    group: &'a str,
    reason: &'a str,
    n: Option<usize>,
    nse: Option<f64>,
    log_nse: Option<f64>,
    kge: Option<f64>,
    pbias: Option<f64>,
    rmse: Option<f64>,
    mae: Option<f64>,
    log_rmse: Option<f64>,
    r: Option<f64>,
    r2: Option<f64>,
    categorical_accuracy: Option<f64>,
}

impl<'a> SummaryRow<'a> {
    fn from_aggregate(kind: &'a str, group: &'a str, n: usize, stats: &AggregateStats) -> Self {
        Self {
            kind,
            id: group,
            group,
            reason: "",
            n: Some(n),
            nse: stats.nse,
            log_nse: stats.log_nse,
            kge: stats.kge,
            pbias: stats.pbias,
            rmse: stats.rmse,
            mae: stats.mae,
            log_rmse: stats.log_rmse,
            r: stats.r,
            r2: stats.r2,
            categorical_accuracy: stats.categorical_accuracy,
        }
    }
}

/// Writes a summary table as a flat CSV file.
pub fn write_summary_csv(path: &Path, table: &SummaryTable) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path)?;

    for (id, outcome) in &table.sites {
        let row = match outcome {
            SiteOutcome::Computed { group, metrics } => SummaryRow {
                kind: "site",
                id,
                group,
                reason: "",
                n: Some(metrics.n),
                nse: metrics.nse,
                log_nse: metrics.log_nse,
                kge: metrics.kge,
                pbias: metrics.pbias,
                rmse: Some(metrics.rmse),
                mae: Some(metrics.mae),
                log_rmse: metrics.log_rmse,
                r: metrics.r,
                r2: metrics.r2,
                categorical_accuracy: Some(metrics.categorical_accuracy),
            },
            SiteOutcome::Skipped { group, reason } => SummaryRow {
                kind: "site",
                id,
                group,
                reason,
                n: None,
                nse: None,
                log_nse: None,
                kge: None,
                pbias: None,
                rmse: None,
                mae: None,
                log_rmse: None,
                r: None,
                r2: None,
                categorical_accuracy: None,
            },
        };
        writer.serialize(row)?;
    }

    for (group, aggregate) in &table.groups {
        writer.serialize(SummaryRow::from_aggregate(
            "group_mean",
            group,
            aggregate.n_sites,
            &aggregate.mean,
        ))?;
        writer.serialize(SummaryRow::from_aggregate(
            "group_median",
            group,
            aggregate.n_sites,
            &aggregate.median,
        ))?;
    }

    writer.flush().map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })
}
