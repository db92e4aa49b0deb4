//! USGS Water Services JSON response structures.
//!
//! The daily-values endpoint wraps everything in `value.timeSeries`; each
//! series carries its site code under `sourceInfo` and its readings as
//! string-encoded values with an ISO timestamp.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::UsgsError;

#[derive(Debug, Deserialize)]
pub struct DvResponse {
    pub value: DvValue,
}

#[derive(Debug, Deserialize, Default)]
pub struct DvValue {
    #[serde(rename = "timeSeries", default)]
    pub time_series: Vec<DvTimeSeries>,
}

#[derive(Debug, Deserialize)]
pub struct DvTimeSeries {
    #[serde(rename = "sourceInfo")]
    pub source_info: SourceInfo,
    #[serde(default)]
    pub values: Vec<DvValueSet>,
}

#[derive(Debug, Deserialize)]
pub struct SourceInfo {
    #[serde(rename = "siteCode")]
    pub site_code: Vec<SiteCode>,
}

#[derive(Debug, Deserialize)]
pub struct SiteCode {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct DvValueSet {
    #[serde(rename = "value", default)]
    pub values: Vec<DvReading>,
}

#[derive(Debug, Deserialize)]
pub struct DvReading {
    /// Flow value, string-encoded by the API.
    pub value: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

/// One parsed daily reading.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReading {
    pub gauge: String,
    pub date: NaiveDate,
    pub flow_cfs: f64,
}

/// Parses a daily-values response body into readings.
///
/// Readings that fail to parse, and negative flows (the API's
/// missing-data sentinel), are dropped rather than treated as errors;
/// a gauge with no usable readings simply yields nothing.
pub fn parse_daily_values(body: &str) -> Result<Vec<DailyReading>, UsgsError> {
    let response: DvResponse = serde_json::from_str(body).map_err(|e| UsgsError::Parse {
        reason: e.to_string(),
    })?;

    let mut readings = Vec::new();
    for series in response.value.time_series {
        let Some(site_code) = series.source_info.site_code.first() else {
            continue;
        };
        for value_set in &series.values {
            for reading in &value_set.values {
                let Ok(flow) = reading.value.parse::<f64>() else {
                    continue;
                };
                if flow < 0.0 {
                    continue;
                }
                // dateTime is ISO with a time suffix; the date prefix is
                // all the daily-values service actually varies.
                let Some(date_str) = reading.date_time.get(..10) else {
                    continue;
                };
                let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
                    continue;
                };
                readings.push(DailyReading {
                    gauge: site_code.value.clone(),
                    date,
                    flow_cfs: flow,
                });
            }
        }
    }

    Ok(readings)
}
