//! Error types for hydroval-usgs.

/// Errors raised by the USGS daily-values client.
#[derive(Debug, thiserror::Error)]
pub enum UsgsError {
    /// The HTTP client could not be constructed.
    #[error("http client error: {reason}")]
    Client {
        /// Description of the builder failure.
        reason: String,
    },

    /// A request failed after exhausting retries.
    #[error("request failed after {attempts} attempt(s): {reason}")]
    Request {
        /// Number of attempts made.
        attempts: u32,
        /// Description of the last failure.
        reason: String,
    },

    /// The response body did not parse as the expected JSON shape.
    #[error("response parse error: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// Fetched values did not form a valid series.
    #[error("invalid series for gauge '{gauge}': {reason}")]
    InvalidSeries {
        /// Gauge the series belongs to.
        gauge: String,
        /// Description of the constructor failure.
        reason: String,
    },
}
