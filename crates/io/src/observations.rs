//! Flat-file cache for fetched gauge observations.
//!
//! Daily values land in a CSV (`site_id,date,discharge_cfs`) so a
//! validation run can repeat offline without hitting the USGS API again.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hydroval_series::TimeSeries;

use crate::error::IoError;

#[derive(Debug, Serialize, Deserialize)]
struct ObservationRow {
    site_id: String,
    date: NaiveDate,
    discharge_cfs: f64,
}

/// Writes per-site observed series to the CSV cache, one row per
/// (site, day), sites in map order.
pub fn write_observations(
    path: &Path,
    series: &BTreeMap<String, TimeSeries>,
) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path)?;
    for (site_id, ts) in series {
        for &(t, v) in ts.points() {
            writer.serialize(ObservationRow {
                site_id: site_id.clone(),
                date: t.date_naive(),
                discharge_cfs: v,
            })?;
        }
    }
    writer.flush().map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })
}

/// Reads the CSV cache back into per-site series with the given source
/// label. Each date maps to midnight UTC; rows may arrive unordered.
pub fn read_observations(
    path: &Path,
    source: &str,
) -> Result<BTreeMap<String, TimeSeries>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut points: BTreeMap<String, Vec<(chrono::DateTime<chrono::Utc>, f64)>> = BTreeMap::new();
    for row in reader.deserialize() {
        let row: ObservationRow = row?;
        let t = row
            .date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| IoError::InvalidTime {
                reason: format!("cannot place {} at midnight", row.date),
            })?
            .and_utc();
        points
            .entry(row.site_id)
            .or_default()
            .push((t, row.discharge_cfs));
    }

    let mut result = BTreeMap::new();
    for (site_id, mut site_points) in points {
        site_points.sort_by_key(|&(t, _)| t);
        let ts = TimeSeries::new(&site_id, source, site_points).map_err(|e| {
            IoError::InvalidSeries {
                site: site_id.clone(),
                reason: e.to_string(),
            }
        })?;
        result.insert(site_id, ts);
    }

    Ok(result)
}
