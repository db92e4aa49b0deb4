//! Model prediction reader.
//!
//! The forecast model ships a Parquet table with one row per (site, day):
//! `UUID` (string), `time` (date or timestamp), and the median and
//! quartile-bound flows `ft3_s_q50`, `ft3_s_q25`, `ft3_s_q75` in CFS.

use std::collections::BTreeMap;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::datatypes::{
    DataType, Date32Type, Float64Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use hydroval_series::{DateRange, TimeSeries};

use crate::error::IoError;

const UUID_COL: &str = "UUID";
const TIME_COL: &str = "time";
const QUANTILE_COLS: [&str; 3] = ["ft3_s_q50", "ft3_s_q25", "ft3_s_q75"];

/// Median and quartile-bound forecast series for one site.
#[derive(Debug, Clone)]
pub struct PredictionSeries {
    pub q50: TimeSeries,
    pub q25: TimeSeries,
    pub q75: TimeSeries,
}

/// Reads model predictions, filtered to the validation window, grouped
/// per site.
///
/// Rows with a null in any required column are dropped. Rows may arrive
/// in any order; points are sorted per site before series construction.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file,
/// [`IoError::MissingColumn`] / [`IoError::UnsupportedColumnType`] for a
/// schema mismatch, and [`IoError::InvalidSeries`] if a site ends up with
/// duplicate timestamps.
pub fn read_predictions(
    path: &Path,
    range: &DateRange,
) -> Result<BTreeMap<String, PredictionSeries>, IoError> {
    let batches = read_batches(path)?;

    // site -> (timestamp, q50, q25, q75)
    let mut rows: BTreeMap<String, Vec<(DateTime<Utc>, f64, f64, f64)>> = BTreeMap::new();

    for batch in &batches {
        let uuid_col = column(batch, UUID_COL, path)?;
        let uuid_col = uuid_col.as_string::<i32>();
        let time_col = decode_time_column(&column(batch, TIME_COL, path)?)?;
        let q50_col = float_column(batch, QUANTILE_COLS[0], path)?;
        let q25_col = float_column(batch, QUANTILE_COLS[1], path)?;
        let q75_col = float_column(batch, QUANTILE_COLS[2], path)?;

        for row in 0..batch.num_rows() {
            if uuid_col.is_null(row)
                || q50_col.is_null(row)
                || q25_col.is_null(row)
                || q75_col.is_null(row)
            {
                continue;
            }
            let Some(t) = time_col[row] else { continue };
            if !range.contains(t.date_naive()) {
                continue;
            }
            rows.entry(uuid_col.value(row).to_string()).or_default().push((
                t,
                q50_col.value(row),
                q25_col.value(row),
                q75_col.value(row),
            ));
        }
    }

    let mut result = BTreeMap::new();
    for (site, mut points) in rows {
        points.sort_by_key(|&(t, ..)| t);
        let q50 = build_series(&site, "model-q50", points.iter().map(|&(t, v, ..)| (t, v)))?;
        let q25 = build_series(&site, "model-q25", points.iter().map(|&(t, _, v, _)| (t, v)))?;
        let q75 = build_series(&site, "model-q75", points.iter().map(|&(t, .., v)| (t, v)))?;
        result.insert(site, PredictionSeries { q50, q25, q75 });
    }

    Ok(result)
}

/// Reads all record batches from a Parquet file.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| IoError::Parquet {
            reason: e.to_string(),
        })
}

pub(crate) fn column(batch: &RecordBatch, name: &str, path: &Path) -> Result<ArrayRef, IoError> {
    batch
        .column_by_name(name)
        .cloned()
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn float_column(
    batch: &RecordBatch,
    name: &str,
    path: &Path,
) -> Result<arrow::array::Float64Array, IoError> {
    let col = column(batch, name, path)?;
    match col.data_type() {
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().clone()),
        other => Err(IoError::UnsupportedColumnType {
            name: name.to_string(),
            got: other.to_string(),
        }),
    }
}

/// Decodes a date or timestamp column into UTC instants, `None` per null
/// slot.
fn decode_time_column(col: &ArrayRef) -> Result<Vec<Option<DateTime<Utc>>>, IoError> {
    match col.data_type() {
        DataType::Date32 => {
            let arr = col.as_primitive::<Date32Type>();
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        return Ok(None);
                    }
                    DateTime::from_timestamp(i64::from(arr.value(i)) * 86_400, 0)
                        .map(Some)
                        .ok_or_else(|| IoError::InvalidTime {
                            reason: format!("date32 value {} out of range", arr.value(i)),
                        })
                })
                .collect()
        }
        DataType::Timestamp(unit, _) => {
            let to_instant = |v: i64| -> Result<DateTime<Utc>, IoError> {
                let instant = match unit {
                    TimeUnit::Second => DateTime::from_timestamp(v, 0),
                    TimeUnit::Millisecond => DateTime::from_timestamp_millis(v),
                    TimeUnit::Microsecond => DateTime::from_timestamp_micros(v),
                    TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(v)),
                };
                instant.ok_or_else(|| IoError::InvalidTime {
                    reason: format!("timestamp value {v} out of range"),
                })
            };

            macro_rules! decode {
                ($ty:ty) => {{
                    let arr = col.as_primitive::<$ty>();
                    (0..arr.len())
                        .map(|i| {
                            if arr.is_null(i) {
                                Ok(None)
                            } else {
                                to_instant(arr.value(i)).map(Some)
                            }
                        })
                        .collect()
                }};
            }

            match unit {
                TimeUnit::Second => decode!(TimestampSecondType),
                TimeUnit::Millisecond => decode!(TimestampMillisecondType),
                TimeUnit::Microsecond => decode!(TimestampMicrosecondType),
                TimeUnit::Nanosecond => decode!(TimestampNanosecondType),
            }
        }
        other => Err(IoError::UnsupportedColumnType {
            name: TIME_COL.to_string(),
            got: other.to_string(),
        }),
    }
}

fn build_series(
    site: &str,
    source: &str,
    points: impl Iterator<Item = (DateTime<Utc>, f64)>,
) -> Result<TimeSeries, IoError> {
    TimeSeries::new(site, source, points.collect()).map_err(|e| IoError::InvalidSeries {
        site: site.to_string(),
        reason: e.to_string(),
    })
}
