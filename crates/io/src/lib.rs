//! # hydroval-io
//!
//! File-format adapters feeding the validation core: Parquet model
//! predictions, GeoJSON site metadata, the CSV observation cache, cached
//! NWM extracts, and the summary CSV writer. Bridges external files into
//! hydroval's `TimeSeries` value objects; the core never sees a file
//! format.

mod error;
mod nwm;
mod observations;
mod predictions;
mod sites;
mod summary;

pub use error::IoError;
pub use nwm::{CMS_TO_CFS, join_to_sites, nwm_file_name, read_nwm_file, read_nwm_series};
pub use observations::{read_observations, write_observations};
pub use predictions::{PredictionSeries, read_predictions};
pub use sites::{SiteMeta, read_sites, state_for_location};
pub use summary::write_summary_csv;
