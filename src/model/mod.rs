//! One-step-ahead models: random forests, the conditional rain model and the
//! metrics used to evaluate them.

pub mod error;
pub mod forest;
pub mod metrics;
pub mod params;
pub mod rain;
pub mod tree;

use crate::model::error::ModelError;

/// Maps one feature row to a single value.
pub trait Predictor: Send + Sync {
    /// Width of the rows the model was trained on.
    fn n_features(&self) -> usize;

    /// Fails with [`ModelError::FeatureCountMismatch`] when the row has the wrong width.
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError>;

    fn predict_many(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

/// Probability of the positive class for one feature row.
pub trait ProbabilityModel {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError>;

    fn predict_proba_many(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        rows.iter().map(|row| self.predict_proba(row)).collect()
    }
}

/// Wraps a [`ProbabilityModel`] so its probability can be forecast like any other
/// target.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityOf<'a, M>(pub &'a M);

impl<M> Predictor for ProbabilityOf<'_, M>
where
    M: ProbabilityModel + Predictor,
{
    fn n_features(&self) -> usize {
        self.0.n_features()
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.0.predict_proba(row)
    }
}

pub(crate) fn check_width(expected: usize, row: &[f64]) -> Result<(), ModelError> {
    if row.len() != expected {
        return Err(ModelError::FeatureCountMismatch {
            expected,
            found: row.len(),
        });
    }
    Ok(())
}
