//! Average rainfall for each calendar month.
use crate::error::{PredictionError, PredictionResult};

/// The number of months in a year
pub const MONTHS_PER_YEAR: usize = 12;

/// The number of the last month of the year
pub const DECEMBER: i32 = 12;

/// Average rainfall (mm) for January to December, used when no profile is provided
const DEFAULT_RAINFALL: [f64; MONTHS_PER_YEAR] = [
    29.0, 21.0, 37.5, 30.7, 52.6, 150.0, 299.0, 251.7, 179.2, 70.5, 39.8, 10.9,
];

/// Check that `month` is a calendar month (1 to 12), returning its zero-based index
pub fn month_index(month: i32) -> PredictionResult<usize> {
    usize::try_from(month)
        .ok()
        .filter(|month| (1..=MONTHS_PER_YEAR).contains(month))
        .map(|month| month - 1)
        .ok_or(PredictionError::InvalidMonth(month))
}

/// The average rainfall for each month, used when a caller does not give a rainfall figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainfallProfile([f64; MONTHS_PER_YEAR]);

impl Default for RainfallProfile {
    fn default() -> Self {
        Self(DEFAULT_RAINFALL)
    }
}

impl RainfallProfile {
    /// Create a profile from the rainfall for January to December
    pub fn new(rainfall: [f64; MONTHS_PER_YEAR]) -> Self {
        Self(rainfall)
    }

    /// The average rainfall for `month` (1 to 12)
    pub fn for_month(&self, month: i32) -> PredictionResult<f64> {
        Ok(self.0[month_index(month)?])
    }

    /// Iterate over the rainfall for January to December
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}
