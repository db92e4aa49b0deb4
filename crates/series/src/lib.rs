//! # hydroval-series
//!
//! Flow time series value objects and the timestamp aligner. Adapter
//! crates construct [`TimeSeries`] from external sources; the aligner
//! joins an observed and a predicted series into the matched pairs the
//! metric engine consumes.

mod align;
mod daterange;
mod error;
mod timeseries;

pub use align::{AlignedPair, align};
pub use daterange::DateRange;
pub use error::SeriesError;
pub use timeseries::TimeSeries;
