use std::path::PathBuf;

use serde::Deserialize;

/// Top-level hydroval configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct HydrovalConfig {
    /// I/O paths.
    #[serde(default)]
    pub io: IoToml,

    /// USGS Water Services client settings.
    #[serde(default)]
    pub usgs: UsgsToml,

    /// Alignment settings.
    #[serde(default)]
    pub align: AlignToml,

    /// Metric engine settings.
    #[serde(default)]
    pub metrics: MetricsToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    /// Model predictions Parquet file.
    pub predictions: Option<PathBuf>,
    /// Pour-points GeoJSON file with site metadata.
    pub sites: Option<PathBuf>,
    /// Directory holding per-date NWM Parquet extracts.
    pub nwm_dir: Option<PathBuf>,
    #[serde(default = "default_observations_cache")]
    pub observations_cache: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            predictions: None,
            sites: None,
            nwm_dir: None,
            observations_cache: default_observations_cache(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_observations_cache() -> PathBuf {
    PathBuf::from("data/usgs_cache.csv")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsgsToml {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for UsgsToml {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chunk_size: default_chunk_size(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://waterservices.usgs.gov/nwis/dv/".to_string()
}
fn default_chunk_size() -> usize {
    100
}
fn default_delay_ms() -> u64 {
    300
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_retries() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignToml {
    /// Maximum timestamp offset for a match, in seconds. Zero requires
    /// exact matches, the expected case for daily-aligned series.
    #[serde(default)]
    pub tolerance_secs: u64,
}

impl Default for AlignToml {
    fn default() -> Self {
        Self { tolerance_secs: 0 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsToml {
    #[serde(default = "default_log_epsilon")]
    pub log_epsilon: f64,
    #[serde(default = "default_drought_percentile")]
    pub drought_percentile: f64,
    #[serde(default = "default_pluvial_percentile")]
    pub pluvial_percentile: f64,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

impl Default for MetricsToml {
    fn default() -> Self {
        Self {
            log_epsilon: default_log_epsilon(),
            drought_percentile: default_drought_percentile(),
            pluvial_percentile: default_pluvial_percentile(),
            min_samples: default_min_samples(),
        }
    }
}

fn default_log_epsilon() -> f64 {
    1e-3
}
fn default_drought_percentile() -> f64 {
    0.25
}
fn default_pluvial_percentile() -> f64 {
    0.75
}
fn default_min_samples() -> usize {
    2
}
