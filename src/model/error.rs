use crate::features::error::FeatureError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Cannot fit a model on an empty training set")]
    EmptyTrainingSet,

    #[error("Training row {row} has {found} features, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Training set has {rows} rows but {targets} targets")]
    TargetLength { rows: usize, targets: usize },

    #[error("Model was trained on {expected} features but received {found}")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("Invalid model parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Feature(#[from] FeatureError),
}
