//! Seeded random-forest classifier: bagged CART trees with Gini impurity
//! and sqrt-feature subsampling at each split.
//!
//! Feature importances are the impurity decreases accumulated per feature
//! across all trees, normalized to sum to one.

use anyhow::{bail, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::DataError;
use crate::models::classifier_trait::Classifier;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        probability: f32,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
    root: usize,
}

impl DecisionTree {
    fn predict_row(&self, row: ArrayView1<f32>) -> f32 {
        let mut idx = self.root;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { probability } => return *probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

pub struct RandomForestClassifier {
    n_estimators: usize,
    max_depth: usize,
    min_samples_split: usize,
    random_state: u64,
    trees: Vec<DecisionTree>,
    n_features: usize,
    importances: Option<Array1<f32>>,
}

impl RandomForestClassifier {
    pub fn new(
        n_estimators: usize,
        max_depth: usize,
        min_samples_split: usize,
        random_state: u64,
    ) -> Self {
        RandomForestClassifier {
            n_estimators,
            max_depth,
            min_samples_split: min_samples_split.max(2),
            random_state,
            trees: Vec::new(),
            n_features: 0,
            importances: None,
        }
    }
}

fn gini(pos: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = pos as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

struct TreeBuilder<'a> {
    x: &'a Array2<f32>,
    y: &'a Array1<i32>,
    max_depth: usize,
    min_samples_split: usize,
    max_features: usize,
    n_total: usize,
    nodes: Vec<Node>,
    importances: &'a mut [f64],
}

impl<'a> TreeBuilder<'a> {
    /// Build a subtree over `samples` and return its node index.
    fn build(&mut self, samples: &[usize], depth: usize, rng: &mut StdRng) -> usize {
        let n = samples.len();
        let pos = samples.iter().filter(|&&s| self.y[s] == 1).count();
        let probability = pos as f32 / n as f32;

        let is_pure = pos == 0 || pos == n;
        if is_pure || depth >= self.max_depth || n < self.min_samples_split {
            self.nodes.push(Node::Leaf { probability });
            return self.nodes.len() - 1;
        }

        let split = self.best_split(samples, rng);
        let Some((feature, threshold, gain)) = split else {
            self.nodes.push(Node::Leaf { probability });
            return self.nodes.len() - 1;
        };

        self.importances[feature] += (n as f64 / self.n_total as f64) * gain;

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .copied()
            .partition(|&s| self.x[(s, feature)] <= threshold);

        let left = self.build(&left_samples, depth + 1, rng);
        let right = self.build(&right_samples, depth + 1, rng);
        self.nodes.push(Node::Split {
            feature,
            threshold,
            left,
            right,
        });
        self.nodes.len() - 1
    }

    /// Scan a random sqrt-sized feature subset for the split with the best
    /// Gini gain. Returns None when no split improves on the parent.
    fn best_split(&self, samples: &[usize], rng: &mut StdRng) -> Option<(usize, f32, f64)> {
        let n = samples.len();
        let pos = samples.iter().filter(|&&s| self.y[s] == 1).count();
        let parent_gini = gini(pos, n);

        let mut candidates: Vec<usize> = (0..self.x.ncols()).collect();
        candidates.shuffle(rng);
        candidates.truncate(self.max_features);

        let mut best: Option<(usize, f32, f64)> = None;
        for &feature in &candidates {
            let mut ordered: Vec<usize> = samples.to_vec();
            ordered.sort_by(|&a, &b| {
                self.x[(a, feature)]
                    .partial_cmp(&self.x[(b, feature)])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut pos_left = 0usize;
            for i in 1..n {
                if self.y[ordered[i - 1]] == 1 {
                    pos_left += 1;
                }
                let prev = self.x[(ordered[i - 1], feature)];
                let curr = self.x[(ordered[i], feature)];
                if curr <= prev {
                    continue;
                }

                let n_left = i;
                let n_right = n - i;
                let weighted = (n_left as f64 * gini(pos_left, n_left)
                    + n_right as f64 * gini(pos - pos_left, n_right))
                    / n as f64;
                let gain = parent_gini - weighted;
                if gain > 1e-12 && best.map_or(true, |(_, _, g)| gain > g) {
                    best = Some((feature, (prev + curr) / 2.0, gain));
                }
            }
        }
        best
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            bail!("RandomForestClassifier::fit requires a non-empty matrix");
        }
        if x.nrows() != y.len() {
            bail!(
                "RandomForestClassifier::fit: {} rows but {} labels",
                x.nrows(),
                y.len()
            );
        }

        let n = x.nrows();
        self.n_features = x.ncols();
        let max_features = ((self.n_features as f64).sqrt().round() as usize)
            .clamp(1, self.n_features);

        let mut importances = vec![0.0f64; self.n_features];
        let mut trees = Vec::with_capacity(self.n_estimators);

        for tree_idx in 0..self.n_estimators {
            let mut rng = StdRng::seed_from_u64(self.random_state.wrapping_add(tree_idx as u64));
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut builder = TreeBuilder {
                x,
                y,
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                max_features,
                n_total: n,
                nodes: Vec::new(),
                importances: &mut importances,
            };
            let root = builder.build(&bootstrap, 0, &mut rng);
            trees.push(DecisionTree {
                nodes: builder.nodes,
                root,
            });
        }

        let total: f64 = importances.iter().sum();
        let normalized = if total > 0.0 {
            importances.iter().map(|&v| (v / total) as f32).collect()
        } else {
            vec![0.0f32; self.n_features]
        };

        self.trees = trees;
        self.importances = Some(Array1::from_vec(normalized));
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Array1<i32>> {
        if self.trees.is_empty() {
            bail!("RandomForestClassifier::predict called before fit");
        }
        if x.ncols() != self.n_features {
            return Err(DataError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            }
            .into());
        }

        let mut labels = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            let mean_prob: f32 = self
                .trees
                .iter()
                .map(|t| t.predict_row(row))
                .sum::<f32>()
                / self.trees.len() as f32;
            labels.push(if mean_prob >= 0.5 { 1 } else { 0 });
        }
        Ok(Array1::from_vec(labels))
    }

    fn feature_importance(&self) -> Option<Array1<f32>> {
        self.importances.clone()
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_data() -> (Array2<f32>, Array1<i32>) {
        // Second column separates the classes; first is noise.
        let x = Array2::from_shape_vec(
            (10, 2),
            vec![
                0.3, 5.0, 0.1, 5.2, 0.7, 4.8, 0.2, 5.5, 0.9, 5.1, 0.4, 1.0, 0.6, 0.8, 0.2, 1.2,
                0.8, 0.9, 0.5, 1.1,
            ],
        )
        .unwrap();
        let y = Array1::from_vec(vec![1, 1, 1, 1, 1, 0, 0, 0, 0, 0]);
        (x, y)
    }

    #[test]
    fn fit_and_predict_separable() {
        let (x, y) = separable_data();
        let mut model = RandomForestClassifier::new(10, 4, 2, 23);
        model.fit(&x, &y).unwrap();
        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions, y);
    }

    #[test]
    fn importances_favor_informative_feature() {
        let (x, y) = separable_data();
        let mut model = RandomForestClassifier::new(20, 4, 2, 23);
        model.fit(&x, &y).unwrap();
        let imp = model.feature_importance().unwrap();
        assert!(imp[1] > imp[0]);
        assert!((imp.sum() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn same_seed_reproduces_predictions() {
        let (x, y) = separable_data();
        let mut a = RandomForestClassifier::new(5, 4, 2, 23);
        let mut b = RandomForestClassifier::new(5, 4, 2, 23);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn predict_rejects_width_mismatch() {
        let (x, y) = separable_data();
        let mut model = RandomForestClassifier::new(5, 4, 2, 23);
        model.fit(&x, &y).unwrap();
        let narrow = Array2::from_shape_vec((2, 1), vec![0.1, 0.2]).unwrap();
        assert!(model.predict(&narrow).is_err());
    }
}
