use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Column '{0}' is referenced by the feature set but does not exist")]
    UnknownColumn(String),

    #[error("Column '{column}' has a missing value at row {row}")]
    NullValue { column: String, row: usize },

    #[error("Test fraction must be in [0, 1), got {0}")]
    InvalidSplit(f64),

    #[error("Row {row} is out of bounds for a table of height {height}")]
    RowOutOfBounds { row: usize, height: usize },

    #[error("Timestamp {0} ms cannot be represented")]
    InvalidTime(i64),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
