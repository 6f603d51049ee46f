use bon::Builder;
use serde::{Deserialize, Serialize};

/// How many candidate features each split considers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    All,
    Sqrt,
    Count(usize),
    Fraction(f64),
}

impl MaxFeatures {
    /// Resolves to a count in `1..=n_features`.
    pub fn resolve(&self, n_features: usize) -> usize {
        let wanted = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Count(count) => *count,
            MaxFeatures::Fraction(fraction) => (n_features as f64 * fraction).floor() as usize,
        };
        wanted.clamp(1, n_features.max(1))
    }
}

/// Hyperparameters of a random forest.
///
/// `max_features: None` picks the usual default of the model: every feature for
/// regression, the square root of the feature count for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct ForestParams {
    #[builder(default = 200)]
    pub n_trees: usize,
    #[builder(default = 42)]
    pub seed: u64,
    pub max_depth: Option<usize>,
    #[builder(default = 2)]
    pub min_samples_split: usize,
    #[builder(default = 1)]
    pub min_samples_leaf: usize,
    pub max_features: Option<MaxFeatures>,
    #[builder(default = true)]
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self::builder().build()
    }
}
