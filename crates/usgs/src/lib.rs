//! # hydroval-usgs
//!
//! Blocking client for the USGS Water Services daily-values API
//! (<https://waterservices.usgs.gov/>). Fetches discharge (parameter
//! 00060, CFS) for batches of gauges and hands back per-gauge
//! `TimeSeries` values; the validation core never sees the transport.

mod config;
mod error;
mod response;

pub use config::UsgsConfig;
pub use error::UsgsError;
pub use response::{DailyReading, parse_daily_values};

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use hydroval_series::{DateRange, TimeSeries};

/// USGS parameter code for discharge in cubic feet per second.
const DISCHARGE_PARAMETER: &str = "00060";

/// Blocking USGS daily-values client.
pub struct UsgsClient {
    http: reqwest::blocking::Client,
    config: UsgsConfig,
}

impl UsgsClient {
    /// Builds a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UsgsError::Client`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: UsgsConfig) -> Result<Self, UsgsError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()
            .map_err(|e| UsgsError::Client {
                reason: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    /// Fetches daily discharge for the given gauges over the window.
    ///
    /// Gauges are requested in chunks to stay under URL length limits,
    /// with a configurable delay between requests. A chunk that still
    /// fails after the retry budget is logged and skipped; its gauges
    /// simply come back without data, which the runner records as skipped
    /// sites. Duplicate readings for a (gauge, day) keep the first.
    pub fn fetch_daily(
        &self,
        gauges: &[String],
        range: &DateRange,
    ) -> Result<BTreeMap<String, TimeSeries>, UsgsError> {
        let mut points: BTreeMap<String, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();

        let chunks: Vec<&[String]> = gauges.chunks(self.config.chunk_size()).collect();
        for (i, chunk) in chunks.iter().enumerate() {
            match self.fetch_chunk(chunk, range) {
                Ok(readings) => {
                    debug!(chunk = i, n_readings = readings.len(), "chunk fetched");
                    for reading in readings {
                        let Some(naive) = reading.date.and_hms_opt(0, 0, 0) else {
                            continue;
                        };
                        points
                            .entry(reading.gauge)
                            .or_default()
                            .push((naive.and_utc(), reading.flow_cfs));
                    }
                }
                Err(e) => {
                    warn!(chunk = i, error = %e, "chunk failed, skipping");
                }
            }

            if i + 1 < chunks.len() && self.config.delay_ms() > 0 {
                thread::sleep(Duration::from_millis(self.config.delay_ms()));
            }
        }

        let mut result = BTreeMap::new();
        for (gauge, mut gauge_points) in points {
            gauge_points.sort_by_key(|&(t, _)| t);
            gauge_points.dedup_by_key(|&mut (t, _)| t);
            let ts = TimeSeries::new(&gauge, "usgs", gauge_points).map_err(|e| {
                UsgsError::InvalidSeries {
                    gauge: gauge.clone(),
                    reason: e.to_string(),
                }
            })?;
            result.insert(gauge, ts);
        }

        Ok(result)
    }

    /// Requests one chunk of gauges with a bounded retry loop.
    fn fetch_chunk(
        &self,
        gauges: &[String],
        range: &DateRange,
    ) -> Result<Vec<DailyReading>, UsgsError> {
        let sites = gauges.join(",");
        let start = range.start().format("%Y-%m-%d").to_string();
        let end = range.end().format("%Y-%m-%d").to_string();

        let mut last_error = String::new();
        let attempts = self.config.max_retries() + 1;

        for attempt in 0..attempts {
            if attempt > 0 {
                // Linear backoff between retries.
                thread::sleep(Duration::from_millis(
                    self.config.delay_ms() * u64::from(attempt),
                ));
            }

            let result = self
                .http
                .get(self.config.base_url())
                .query(&[
                    ("format", "json"),
                    ("sites", sites.as_str()),
                    ("startDT", start.as_str()),
                    ("endDT", end.as_str()),
                    ("parameterCd", DISCHARGE_PARAMETER),
                    ("siteStatus", "all"),
                ])
                .send();

            match result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        last_error = format!("status {status}");
                        continue;
                    }
                    let body = match response.text() {
                        Ok(body) => body,
                        Err(e) => {
                            last_error = e.to_string();
                            continue;
                        }
                    };
                    return parse_daily_values(&body);
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }
        }

        Err(UsgsError::Request {
            attempts,
            reason: last_error,
        })
    }
}
