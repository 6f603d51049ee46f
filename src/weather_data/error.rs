use crate::types::frequency::Frequency;
use crate::types::variable::Variable;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Invalid archive request: {0}")]
    InvalidRequest(String),

    #[error("Failed to build request URL from '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse archive response as JSON")]
    JsonParse(#[from] serde_json::Error),

    #[error("Archive response has no '{0}' block")]
    MissingBlock(Frequency),

    #[error("Archive response has no array for variable '{0}'")]
    MissingVariable(Variable),

    #[error("Array for '{name}' has {found} values but 'time' has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Failed to parse timestamp '{value}' as {frequency} time")]
    TimestampParse {
        value: String,
        frequency: Frequency,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
