//! Flow time series for a single site and source.

use chrono::{DateTime, Utc};

use crate::error::SeriesError;

/// Ordered (timestamp, flow) sequence for one site and one data source.
///
/// Values are flow rates in cubic feet per second. Timestamps are UTC
/// instants and strictly increasing; both invariants are enforced at
/// construction, so downstream code (the aligner in particular) can rely
/// on sorted, finite input without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    site: String,
    source: String,
    points: Vec<(DateTime<Utc>, f64)>,
}

impl TimeSeries {
    /// Builds a series from pre-sorted points.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::NonMonotonicTimestamps`] if any timestamp
    /// repeats or goes backwards, or [`SeriesError::NonFiniteValue`] if any
    /// flow value is NaN or infinite.
    pub fn new(
        site: impl Into<String>,
        source: impl Into<String>,
        points: Vec<(DateTime<Utc>, f64)>,
    ) -> Result<Self, SeriesError> {
        for (i, &(t, v)) in points.iter().enumerate() {
            if !v.is_finite() {
                return Err(SeriesError::NonFiniteValue { index: i });
            }
            if i > 0 && t <= points[i - 1].0 {
                return Err(SeriesError::NonMonotonicTimestamps { index: i, at: t });
            }
        }
        Ok(Self {
            site: site.into(),
            source: source.into(),
            points,
        })
    }

    /// Site identifier this series belongs to.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Data source label (e.g. "usgs", "model-q50", "nwm").
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The (timestamp, value) points, oldest first.
    pub fn points(&self) -> &[(DateTime<Utc>, f64)] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flow values without their timestamps.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_valid() {
        let ts = TimeSeries::new(
            "08167000",
            "usgs",
            vec![(t(0), 10.0), (t(1), 12.5), (t(2), 11.0)],
        )
        .unwrap();
        assert_eq!(ts.site(), "08167000");
        assert_eq!(ts.source(), "usgs");
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.values(), vec![10.0, 12.5, 11.0]);
    }

    #[test]
    fn test_new_empty() {
        let ts = TimeSeries::new("s", "usgs", vec![]).unwrap();
        assert!(ts.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_timestamp() {
        let result = TimeSeries::new("s", "usgs", vec![(t(0), 1.0), (t(0), 2.0)]);
        assert!(matches!(
            result.unwrap_err(),
            SeriesError::NonMonotonicTimestamps { index: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_backwards_timestamp() {
        let result = TimeSeries::new("s", "usgs", vec![(t(2), 1.0), (t(1), 2.0)]);
        assert!(matches!(
            result.unwrap_err(),
            SeriesError::NonMonotonicTimestamps { index: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let result = TimeSeries::new("s", "usgs", vec![(t(0), f64::NAN)]);
        assert!(matches!(
            result.unwrap_err(),
            SeriesError::NonFiniteValue { index: 0 }
        ));
    }
}
