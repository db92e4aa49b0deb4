//! Error types for hydroval-series.

use chrono::{DateTime, NaiveDate, Utc};

/// Errors raised when constructing a time series or date range.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Timestamps must be strictly increasing.
    #[error("timestamps not strictly increasing at index {index}: {at}")]
    NonMonotonicTimestamps {
        /// Index of the offending point.
        index: usize,
        /// Timestamp that repeats or goes backwards.
        at: DateTime<Utc>,
    },

    /// Flow values must be finite.
    #[error("non-finite value at index {index}")]
    NonFiniteValue {
        /// Index of the offending point.
        index: usize,
    },

    /// A date range whose end precedes its start.
    #[error("invalid date range: {end} precedes {start}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },
}
