//! Bagged ensembles of [`RegressionTree`]s.

use crate::model::error::ModelError;
use crate::model::params::{ForestParams, MaxFeatures};
use crate::model::tree::{RegressionTree, TreeSettings};
use crate::model::{check_width, Predictor, ProbabilityModel};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Random forest regression: the mean of `n_trees` trees, each grown on a
/// bootstrap sample of the training rows.
///
/// Tree `i` draws its sample and its split candidates from a generator seeded
/// with `seed + i`, so fitting is deterministic for a given seed no matter how
/// rayon schedules the trees.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self, ModelError> {
        let max_features = params.max_features.unwrap_or(MaxFeatures::All);
        Self::fit_with(x, y, params, max_features)
    }

    fn fit_with(
        x: &[Vec<f64>],
        y: &[f64],
        params: &ForestParams,
        max_features: MaxFeatures,
    ) -> Result<Self, ModelError> {
        let n_features = validate_training(x, y.len())?;
        if params.n_trees == 0 {
            return Err(ModelError::InvalidParams("n_trees must be at least 1".to_string()));
        }
        let settings = TreeSettings {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split.max(2),
            min_samples_leaf: params.min_samples_leaf.max(1),
            max_features: max_features.resolve(n_features),
        };
        let n = x.len();
        let trees: Vec<RegressionTree> = (0..params.n_trees)
            .into_par_iter()
            .map(|index| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(index as u64));
                let samples: Vec<usize> = if params.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(x, y, samples, &settings, &mut rng)
            })
            .collect();
        debug!(
            "Fitted {} trees on {} rows x {} features",
            trees.len(),
            n,
            n_features
        );
        Ok(Self { trees, n_features })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

impl Predictor for RandomForestRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        check_width(self.n_features, row)?;
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

/// Random forest binary classification.
///
/// Trees are grown on 0/1 targets; the squared-error criterion on such targets
/// ranks splits the same way the Gini impurity does, and each leaf mean is the
/// fraction of positive samples in that leaf.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    forest: RandomForestRegressor,
}

impl RandomForestClassifier {
    pub fn fit(x: &[Vec<f64>], labels: &[bool], params: &ForestParams) -> Result<Self, ModelError> {
        let y: Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect();
        let max_features = params.max_features.unwrap_or(MaxFeatures::Sqrt);
        let forest = RandomForestRegressor::fit_with(x, &y, params, max_features)?;
        Ok(Self { forest })
    }

    /// Positive class when the probability is above one half.
    pub fn predict_class(&self, row: &[f64]) -> Result<bool, ModelError> {
        Ok(self.predict_proba(row)? > 0.5)
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }
}

impl ProbabilityModel for RandomForestClassifier {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError> {
        Ok(self.forest.predict(row)?.clamp(0.0, 1.0))
    }
}

impl Predictor for RandomForestClassifier {
    fn n_features(&self) -> usize {
        self.forest.n_features()
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.predict_proba(row)
    }
}

/// Returns the feature count shared by every row.
fn validate_training(x: &[Vec<f64>], targets: usize) -> Result<usize, ModelError> {
    let Some(first) = x.first() else {
        return Err(ModelError::EmptyTrainingSet);
    };
    if x.len() != targets {
        return Err(ModelError::TargetLength {
            rows: x.len(),
            targets,
        });
    }
    let expected = first.len();
    if let Some((row, found)) = x
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != expected)
    {
        return Err(ModelError::RaggedRows {
            row,
            expected,
            found,
        });
    }
    Ok(expected)
}
