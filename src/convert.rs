//! Pure conversion functions: TOML config structs -> crate API config types.

use chrono::Duration;

use hydroval_metrics::MetricConfig;
use hydroval_usgs::UsgsConfig;
use hydroval_validate::RunConfig;

use crate::config::{AlignToml, MetricsToml, UsgsToml};

/// Builds a [`UsgsConfig`] from the TOML USGS section.
pub fn build_usgs_config(usgs: &UsgsToml) -> UsgsConfig {
    UsgsConfig::default()
        .with_base_url(&usgs.base_url)
        .with_chunk_size(usgs.chunk_size)
        .with_delay_ms(usgs.delay_ms)
        .with_timeout_secs(usgs.timeout_secs)
        .with_max_retries(usgs.max_retries)
}

/// Builds a [`MetricConfig`] from the TOML metrics section.
pub fn build_metric_config(metrics: &MetricsToml) -> MetricConfig {
    MetricConfig::default()
        .with_log_epsilon(metrics.log_epsilon)
        .with_drought_percentile(metrics.drought_percentile)
        .with_pluvial_percentile(metrics.pluvial_percentile)
        .with_min_samples(metrics.min_samples)
}

/// Builds a [`RunConfig`] for one comparison label.
pub fn build_run_config(comparison: &str, align: &AlignToml, metrics: &MetricsToml) -> RunConfig {
    RunConfig::new(comparison)
        .with_tolerance(Duration::seconds(align.tolerance_secs as i64))
        .with_metrics(build_metric_config(metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_metric_config_defaults() {
        let config = build_metric_config(&MetricsToml::default());
        assert_eq!(config.log_epsilon(), 1e-3);
        assert_eq!(config.min_samples(), 2);
    }

    #[test]
    fn test_build_run_config() {
        let align = AlignToml { tolerance_secs: 3600 };
        let config = build_run_config("model_vs_usgs", &align, &MetricsToml::default());
        assert_eq!(config.comparison(), "model_vs_usgs");
        assert_eq!(config.tolerance(), Duration::hours(1));
    }
}
