//! Online linear classifier trained by per-sample stochastic gradient
//! descent on log loss.
//!
//! This is the one model in the crate that supports `partial_fit` and serde
//! serialization: the incremental updater persists it as the deployed model
//! artifact and applies one partial-fit step per update window.

use anyhow::{bail, Result};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::models::classifier_trait::Classifier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgdClassifier {
    epochs: usize,
    learning_rate: f32,
    l2: f32,
    random_state: u64,
    weights: Option<Vec<f32>>,
    bias: f32,
    samples_seen: u64,
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl SgdClassifier {
    pub fn new(epochs: usize, learning_rate: f32, l2: f32, random_state: u64) -> Self {
        SgdClassifier {
            epochs,
            learning_rate,
            l2,
            random_state,
            weights: None,
            bias: 0.0,
            samples_seen: 0,
        }
    }

    /// Number of samples the model has been updated on so far.
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Fitted feature width, when the model has been fit.
    pub fn n_features(&self) -> Option<usize> {
        self.weights.as_ref().map(|w| w.len())
    }

    fn decision(&self, weights: &[f32], x: &Array2<f32>, row: usize) -> f32 {
        let mut logit = self.bias;
        for (c, w) in weights.iter().enumerate() {
            logit += w * x[(row, c)];
        }
        logit
    }

    fn update_row(&mut self, x: &Array2<f32>, y: &Array1<i32>, row: usize) {
        let weights = self.weights.as_ref().expect("weights initialized");
        let target = if y[row] == 1 { 1.0 } else { 0.0 };
        let error = sigmoid(self.decision(weights, x, row)) - target;

        let lr = self.learning_rate;
        let l2 = self.l2;
        let weights = self.weights.as_mut().expect("weights initialized");
        for (c, w) in weights.iter_mut().enumerate() {
            *w -= lr * (error * x[(row, c)] + l2 * *w);
        }
        self.bias -= lr * error;
        self.samples_seen += 1;
    }

    /// Apply one incremental update pass over `x`/`y` without resetting the
    /// learned parameters.
    ///
    /// Rejects a feature-count mismatch against the width the model was
    /// originally fit on. On a never-fit model the first call initializes
    /// the weights from the incoming width.
    pub fn partial_fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) -> Result<()> {
        if x.nrows() == 0 {
            bail!("SgdClassifier::partial_fit received an empty batch");
        }
        if x.nrows() != y.len() {
            bail!(
                "SgdClassifier::partial_fit: {} rows but {} labels",
                x.nrows(),
                y.len()
            );
        }
        if let Some(w) = &self.weights {
            if w.len() != x.ncols() {
                return Err(DataError::DimensionMismatch {
                    expected: w.len(),
                    actual: x.ncols(),
                }
                .into());
            }
        } else {
            self.weights = Some(vec![0.0; x.ncols()]);
        }

        // Single pass, in the order the window arrived.
        for row in 0..x.nrows() {
            self.update_row(x, y, row);
        }
        Ok(())
    }
}

impl Classifier for SgdClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            bail!("SgdClassifier::fit requires a non-empty matrix");
        }
        if x.nrows() != y.len() {
            bail!("SgdClassifier::fit: {} rows but {} labels", x.nrows(), y.len());
        }

        self.weights = Some(vec![0.0; x.ncols()]);
        self.bias = 0.0;
        self.samples_seen = 0;

        let mut order: Vec<usize> = (0..x.nrows()).collect();
        for epoch in 0..self.epochs {
            let mut rng =
                StdRng::seed_from_u64(self.random_state.wrapping_add(epoch as u64));
            order.shuffle(&mut rng);
            for &row in &order {
                self.update_row(x, y, row);
            }
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Array1<i32>> {
        let Some(weights) = &self.weights else {
            bail!("SgdClassifier::predict called before fit");
        };
        if x.ncols() != weights.len() {
            return Err(DataError::DimensionMismatch {
                expected: weights.len(),
                actual: x.ncols(),
            }
            .into());
        }

        let labels = (0..x.nrows())
            .map(|r| {
                if sigmoid(self.decision(weights, x, r)) >= 0.5 {
                    1
                } else {
                    0
                }
            })
            .collect();
        Ok(Array1::from_vec(labels))
    }

    fn feature_importance(&self) -> Option<Array1<f32>> {
        self.weights
            .as_ref()
            .map(|w| Array1::from_vec(w.iter().map(|v| v.abs()).collect()))
    }

    fn name(&self) -> &str {
        "sgd"
    }
}
