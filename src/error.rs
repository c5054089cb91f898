//! Errors raised while fitting models and making predictions.
use std::path::Path;
use thiserror::Error;

/// Result type for fitting and prediction operations
pub type PredictionResult<T> = Result<T, PredictionError>;

/// Errors that can occur while fitting models or making predictions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// An input dataset is empty or malformed
    #[error("{0}")]
    Data(String),
    /// No base price or dataset is registered for the commodity
    #[error("Unknown commodity: {0}")]
    UnknownCommodity(String),
    /// A prediction was requested from a model which has not been fitted
    #[error("Model must be fitted before making predictions")]
    NotFitted,
    /// A month outside 1 to 12 was used where a calendar month is required
    #[error("Invalid month: {0} (must be between 1 and 12)")]
    InvalidMonth(i32),
    /// A forecast would run past the largest representable year
    #[error("Year out of range: {0}")]
    YearOutOfRange(i32),
}

impl PredictionError {
    /// Create a [`PredictionError::Data`] for a problem with the specified file
    pub fn data(file_path: &Path, message: impl std::fmt::Display) -> Self {
        Self::Data(format!("Error reading {}: {message}", file_path.display()))
    }
}
