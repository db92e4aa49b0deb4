//! Validation runner error types.

use hydroval_metrics::MetricError;

/// Per-site failures. Caught at the runner boundary and recorded as a
/// skipped row with a reason string; they never abort the run.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No observed series was supplied for the site.
    #[error("no observed series")]
    MissingObserved,

    /// No predicted series was supplied for the site.
    #[error("no predicted series")]
    MissingPredicted,

    /// The two series share no timestamps within tolerance.
    #[error("no overlapping timestamps")]
    AlignmentEmpty,

    /// The metric engine rejected the aligned pairs.
    #[error(transparent)]
    Metric(#[from] MetricError),
}

/// Failures of the summary table itself (not of individual sites).
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_error_display() {
        assert_eq!(
            SiteError::MissingObserved.to_string(),
            "no observed series"
        );
        assert_eq!(
            SiteError::AlignmentEmpty.to_string(),
            "no overlapping timestamps"
        );
    }

    #[test]
    fn test_metric_error_passes_through() {
        let err: SiteError = MetricError::InsufficientData { n: 1, min: 2 }.into();
        assert!(err.to_string().contains("insufficient data"));
    }

    #[test]
    fn test_validate_error_display() {
        let err = ValidateError::Serialization {
            reason: "bad utf-8".to_string(),
        };
        assert_eq!(err.to_string(), "serialization error: bad utf-8");
    }
}
