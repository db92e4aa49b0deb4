//! Inclusive validation window.

use chrono::NaiveDate;

use crate::error::SeriesError;

/// Inclusive [start, end] date window selecting the validation period.
///
/// Adapters receive this as a plain value; the core never parses CLI
/// arguments or knows where the window came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range. A single-day window has `start == end`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidRange`] when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SeriesError> {
        if end < start {
            return Err(SeriesError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First date in the window.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date in the window.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates the dates in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        let end = self.end;
        start.iter_days().take_while(move |d| *d <= end)
    }
}
