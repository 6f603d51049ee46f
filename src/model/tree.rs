//! A CART regression tree split on variance reduction.

use crate::model::check_width;
use crate::model::error::ModelError;
use rand::rngs::StdRng;
use rand::seq::index::sample;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TreeSettings {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: usize,
}

/// A binary regression tree. Rows go left when `row[feature] <= threshold`; leaves
/// hold the mean target of the training samples that reached them.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl RegressionTree {
    /// Grows a tree on the rows listed in `samples` (duplicates allowed).
    /// `samples` must not be empty.
    pub(crate) fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        mut samples: Vec<usize>,
        settings: &TreeSettings,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = x.first().map(|row| row.len()).unwrap_or(0);
        let mut tree = Self {
            nodes: Vec::new(),
            n_features,
        };
        let mut grower = Grower {
            x,
            y,
            settings,
            n_features,
            rng,
        };
        grower.grow(&mut tree.nodes, &mut samples, 0);
        tree
    }

    /// Fails when `row` is not as wide as the training rows.
    pub fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        check_width(self.n_features, row)?;
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf(value)) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return Ok(f64::NAN),
            }
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf(_)))
            .count()
    }
}

struct Grower<'a, 'r> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    settings: &'a TreeSettings,
    n_features: usize,
    rng: &'r mut StdRng,
}

impl Grower<'_, '_> {
    fn grow(&mut self, nodes: &mut Vec<Node>, samples: &mut [usize], depth: usize) -> usize {
        let n = samples.len();
        let mean = samples.iter().map(|&i| self.y[i]).sum::<f64>() / n as f64;
        let id = nodes.len();
        nodes.push(Node::Leaf(mean));

        let first = self.y[samples[0]];
        let pure = samples.iter().all(|&i| self.y[i] == first);
        let too_deep = self.settings.max_depth.is_some_and(|max| depth >= max);
        if pure || too_deep || n < self.settings.min_samples_split {
            return id;
        }

        let features = if self.settings.max_features >= self.n_features {
            (0..self.n_features).collect()
        } else {
            sample(&mut *self.rng, self.n_features, self.settings.max_features).into_vec()
        };
        let Some((feature, threshold)) = self.best_split(samples, &features) else {
            return id;
        };

        let mut left_len = 0;
        for j in 0..n {
            if self.x[samples[j]][feature] <= threshold {
                samples.swap(left_len, j);
                left_len += 1;
            }
        }
        let (left_samples, right_samples) = samples.split_at_mut(left_len);
        let left = self.grow(nodes, left_samples, depth + 1);
        let right = self.grow(nodes, right_samples, depth + 1);
        nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// The split with the lowest summed squared error of both children, if any
    /// split leaves at least `min_samples_leaf` samples on each side.
    fn best_split(&self, samples: &[usize], features: &[usize]) -> Option<(usize, f64)> {
        let n = samples.len();
        let min_leaf = self.settings.min_samples_leaf.max(1);
        let total_sum: f64 = samples.iter().map(|&i| self.y[i]).sum();
        let total_sq: f64 = samples.iter().map(|&i| self.y[i] * self.y[i]).sum();

        let mut best: Option<(usize, f64)> = None;
        let mut best_sse = f64::INFINITY;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);
        for &feature in features {
            pairs.clear();
            pairs.extend(samples.iter().map(|&i| (self.x[i][feature], self.y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 0..n - 1 {
                let (value, target) = pairs[k];
                left_sum += target;
                left_sq += target * target;
                let next = pairs[k + 1].0;
                if value == next {
                    continue;
                }
                let n_left = k + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);
                if sse < best_sse {
                    best_sse = sse;
                    let mut threshold = (value + next) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some((feature, threshold));
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn settings() -> TreeSettings {
        TreeSettings {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: usize::MAX,
        }
    }

    #[test]
    fn test_step_function_is_learned_exactly() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..20).map(|i| if i < 10 { 1.0 } else { 5.0 }).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let tree = RegressionTree::fit(&x, &y, (0..20).collect(), &settings(), &mut rng);

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.predict(&[3.0]).unwrap(), 1.0);
        assert_eq!(tree.predict(&[9.4]).unwrap(), 1.0);
        assert_eq!(tree.predict(&[9.6]).unwrap(), 5.0);
        assert_eq!(tree.predict(&[100.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_constant_target_is_a_single_leaf() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, -(i as f64)]).collect();
        let y = vec![2.5; 10];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = RegressionTree::fit(&x, &y, (0..10).collect(), &settings(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[42.0, 0.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..64).map(|i| i as f64).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let shallow = TreeSettings {
            max_depth: Some(2),
            ..settings()
        };
        let tree = RegressionTree::fit(&x, &y, (0..64).collect(), &shallow, &mut rng);
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn test_min_samples_leaf_is_respected() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let mut y = vec![0.0; 10];
        y[9] = 10.0;
        let mut rng = StdRng::seed_from_u64(0);
        let wide_leaves = TreeSettings {
            min_samples_leaf: 3,
            ..settings()
        };
        let tree = RegressionTree::fit(&x, &y, (0..10).collect(), &wide_leaves, &mut rng);
        // The outlier cannot be isolated, so its leaf averages at least three samples.
        assert!(tree.predict(&[9.0]).unwrap() <= 10.0 / 3.0 + 1e-12);
    }

    #[test]
    fn test_identical_inputs_cannot_be_split() {
        let x = vec![vec![1.0]; 4];
        let y = vec![0.0, 1.0, 0.0, 1.0];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = RegressionTree::fit(&x, &y, (0..4).collect(), &settings(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[1.0]).unwrap(), 0.5);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, (i % 2) as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let tree = RegressionTree::fit(&x, &y, (0..10).collect(), &settings(), &mut rng);
        assert_eq!(tree.n_features(), 2);
        assert!(matches!(
            tree.predict(&[4.0]),
            Err(ModelError::FeatureCountMismatch { expected: 2, found: 1 })
        ));
        assert!(tree.predict(&[4.0, 0.0, 1.0]).is_err());
    }
}
