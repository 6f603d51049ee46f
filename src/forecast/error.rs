use crate::features::error::FeatureError;
use crate::model::error::ModelError;
use chrono::NaiveDateTime;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Forecast horizon must be at least one step")]
    ZeroHorizon,

    #[error("Cannot forecast from an empty observation history")]
    EmptyHistory,

    #[error("No complete feature row could be built for {0}")]
    IncompleteHistory(NaiveDateTime),

    #[error("{observations} observations leave no complete feature rows, at least {required} are needed")]
    InsufficientHistory {
        observations: usize,
        required: usize,
    },

    #[error("Unknown forecast kind '{0}'")]
    UnknownKind(String),

    #[error("Unknown lag policy '{0}'")]
    UnknownLagPolicy(String),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
