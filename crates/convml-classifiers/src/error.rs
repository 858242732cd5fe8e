use std::error::Error;
use std::fmt;

use chrono::NaiveDate;

/// Custom error type for data-shape failures.
#[derive(Debug)]
pub enum DataError {
    /// The trailing update window contained no rows at or after the cutoff.
    EmptyWindow { cutoff: NaiveDate },
    /// A requested column is not present in the dataset.
    MissingColumn(String),
    /// Feature-count mismatch against a previously fitted width.
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataError::EmptyWindow { cutoff } => {
                write!(f, "No labeled rows found on or after {}", cutoff)
            }
            DataError::MissingColumn(name) => write!(f, "Missing column '{}'", name),
            DataError::DimensionMismatch { expected, actual } => write!(
                f,
                "Feature matrix has {} columns but the model was fit on {}",
                actual, expected
            ),
        }
    }
}

impl Error for DataError {}
