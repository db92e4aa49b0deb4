//! National Water Model reader.
//!
//! NWM analysis-and-assimilation output is cached locally as one Parquet
//! file per date (`nwm_YYYYMMDD_12z.parquet`, columns `comid` and
//! `streamflow_cms`). Flows convert to CFS on read and join to sites
//! through the COMID crosswalk. Values are stamped at midnight UTC of
//! their date so daily series align exactly with gauge daily values.

use std::collections::BTreeMap;
use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use chrono::{DateTime, NaiveDate, Utc};

use hydroval_series::{DateRange, TimeSeries};

use crate::error::IoError;
use crate::predictions::{column, read_batches};
use crate::sites::SiteMeta;

/// Cubic meters per second to cubic feet per second.
pub const CMS_TO_CFS: f64 = 35.3147;

const COMID_COL: &str = "comid";
const FLOW_COL: &str = "streamflow_cms";

/// File name of the cached NWM extract for one date.
pub fn nwm_file_name(date: NaiveDate) -> String {
    format!("nwm_{}_12z.parquet", date.format("%Y%m%d"))
}

/// Reads one cached NWM file into a COMID -> flow (CFS) map.
///
/// Rows with a null COMID or flow are dropped, matching the upstream
/// extract which filters null streamflow.
pub fn read_nwm_file(path: &Path) -> Result<BTreeMap<i64, f64>, IoError> {
    let batches = read_batches(path)?;
    let mut flows = BTreeMap::new();

    for batch in &batches {
        let comid_col = column(batch, COMID_COL, path)?;
        let comid_col = match comid_col.data_type() {
            DataType::Int64 => comid_col.as_primitive::<Int64Type>().clone(),
            other => {
                return Err(IoError::UnsupportedColumnType {
                    name: COMID_COL.to_string(),
                    got: other.to_string(),
                });
            }
        };
        let flow_col = column(batch, FLOW_COL, path)?;
        let flow_col = match flow_col.data_type() {
            DataType::Float64 => flow_col.as_primitive::<Float64Type>().clone(),
            other => {
                return Err(IoError::UnsupportedColumnType {
                    name: FLOW_COL.to_string(),
                    got: other.to_string(),
                });
            }
        };

        for row in 0..batch.num_rows() {
            if comid_col.is_null(row) || flow_col.is_null(row) {
                continue;
            }
            flows.insert(comid_col.value(row), flow_col.value(row) * CMS_TO_CFS);
        }
    }

    Ok(flows)
}

/// Reads all cached NWM files inside the window into per-COMID series.
///
/// Dates without a cached file are skipped; the window only needs partial
/// coverage. An entirely empty window is an error, pointing at the first
/// file that was expected.
pub fn read_nwm_series(
    dir: &Path,
    range: &DateRange,
) -> Result<BTreeMap<i64, TimeSeries>, IoError> {
    let mut points: BTreeMap<i64, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();
    let mut files_found = 0;

    for date in range.days() {
        let path = dir.join(nwm_file_name(date));
        if !path.exists() {
            continue;
        }
        files_found += 1;

        let t = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| IoError::InvalidTime {
                reason: format!("cannot place {date} at midnight"),
            })?
            .and_utc();
        for (comid, cfs) in read_nwm_file(&path)? {
            points.entry(comid).or_default().push((t, cfs));
        }
    }

    if files_found == 0 {
        return Err(IoError::FileNotFound {
            path: dir.join(nwm_file_name(range.start())),
        });
    }

    let mut result = BTreeMap::new();
    for (comid, comid_points) in points {
        // Dates iterate in order, so points are already sorted.
        let ts = TimeSeries::new(comid.to_string(), "nwm", comid_points).map_err(|e| {
            IoError::InvalidSeries {
                site: comid.to_string(),
                reason: e.to_string(),
            }
        })?;
        result.insert(comid, ts);
    }

    Ok(result)
}

/// Re-keys per-COMID series by site UUID through the crosswalk.
///
/// Sites without a COMID, or whose COMID has no NWM data, are absent from
/// the result; the runner records them as skipped.
pub fn join_to_sites(
    by_comid: &BTreeMap<i64, TimeSeries>,
    sites: &[SiteMeta],
) -> BTreeMap<String, TimeSeries> {
    let mut result = BTreeMap::new();
    for site in sites {
        let Some(comid) = site.comid else { continue };
        let Some(series) = by_comid.get(&comid) else {
            continue;
        };
        // Construction cannot fail: the source series already validated.
        if let Ok(ts) = TimeSeries::new(&site.uuid, "nwm", series.points().to_vec()) {
            result.insert(site.uuid.clone(), ts);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, RecordBatch};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    fn write_nwm_fixture(path: &Path, comids: &[i64], flows_cms: &[f64]) {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COMID_COL, DataType::Int64, false),
            Field::new(FLOW_COL, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(comids.to_vec())),
                Arc::new(Float64Array::from(flows_cms.to_vec())),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_read_nwm_file_converts_units() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(nwm_file_name(d(15)));
        write_nwm_fixture(&path, &[101, 202], &[1.0, 2.0]);

        let flows = read_nwm_file(&path).unwrap();
        assert_eq!(flows.len(), 2);
        assert!((flows[&101] - CMS_TO_CFS).abs() < 1e-9);
        assert!((flows[&202] - 2.0 * CMS_TO_CFS).abs() < 1e-9);
    }

    #[test]
    fn test_read_nwm_series_skips_missing_days() {
        let dir = tempfile::tempdir().unwrap();
        write_nwm_fixture(&dir.path().join(nwm_file_name(d(15))), &[101], &[1.0]);
        // July 16 has no file.
        write_nwm_fixture(&dir.path().join(nwm_file_name(d(17))), &[101], &[3.0]);

        let range = DateRange::new(d(15), d(17)).unwrap();
        let series = read_nwm_series(dir.path(), &range).unwrap();

        assert_eq!(series[&101].len(), 2);
        let values = series[&101].values();
        assert!((values[0] - CMS_TO_CFS).abs() < 1e-9);
        assert!((values[1] - 3.0 * CMS_TO_CFS).abs() < 1e-9);
    }

    #[test]
    fn test_read_nwm_series_no_files_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let range = DateRange::new(d(1), d(3)).unwrap();
        let result = read_nwm_series(dir.path(), &range);
        assert!(matches!(result.unwrap_err(), IoError::FileNotFound { .. }));
    }

    #[test]
    fn test_join_to_sites_rekeys_by_uuid() {
        let dir = tempfile::tempdir().unwrap();
        write_nwm_fixture(&dir.path().join(nwm_file_name(d(15))), &[101, 202], &[1.0, 2.0]);
        let range = DateRange::new(d(15), d(15)).unwrap();
        let by_comid = read_nwm_series(dir.path(), &range).unwrap();

        let sites = vec![
            SiteMeta {
                uuid: "site-a".to_string(),
                gauge_id: Some("02146409".to_string()),
                comid: Some(101),
                lon: -80.0,
                lat: 35.0,
                state: "NC".to_string(),
            },
            SiteMeta {
                uuid: "site-b".to_string(),
                gauge_id: None,
                comid: None,
                lon: -80.0,
                lat: 35.0,
                state: "NC".to_string(),
            },
            SiteMeta {
                uuid: "site-c".to_string(),
                gauge_id: None,
                comid: Some(999),
                lon: -80.0,
                lat: 35.0,
                state: "NC".to_string(),
            },
        ];

        let by_site = join_to_sites(&by_comid, &sites);
        assert_eq!(by_site.len(), 1);
        assert_eq!(by_site["site-a"].site(), "site-a");
        assert_eq!(by_site["site-a"].source(), "nwm");
    }

    #[test]
    fn test_nwm_file_name() {
        assert_eq!(nwm_file_name(d(15)), "nwm_20240715_12z.parquet");
    }
}
