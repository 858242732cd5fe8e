//! Batch-gradient-descent logistic regression.
//!
//! Coefficient magnitudes are exposed as feature importances; the runner
//! uses them to derive its second feature subset.

use anyhow::{bail, Result};
use ndarray::{Array1, Array2};

use crate::error::DataError;
use crate::models::classifier_trait::Classifier;

pub struct LogisticRegression {
    max_iter: usize,
    learning_rate: f32,
    l2: f32,
    weights: Vec<f32>,
    bias: f32,
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl LogisticRegression {
    pub fn new(max_iter: usize, learning_rate: f32, l2: f32) -> Self {
        LogisticRegression {
            max_iter,
            learning_rate,
            l2,
            weights: Vec::new(),
            bias: 0.0,
        }
    }

    /// Fitted coefficients, one per feature column.
    pub fn coefficients(&self) -> &[f32] {
        &self.weights
    }

    fn decision(&self, x: &Array2<f32>, row: usize) -> f32 {
        let mut logit = self.bias;
        for (c, w) in self.weights.iter().enumerate() {
            logit += w * x[(row, c)];
        }
        logit
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            bail!("LogisticRegression::fit requires a non-empty matrix");
        }
        if x.nrows() != y.len() {
            bail!(
                "LogisticRegression::fit: {} rows but {} labels",
                x.nrows(),
                y.len()
            );
        }

        let n = x.nrows();
        let d = x.ncols();
        self.weights = vec![0.0; d];
        self.bias = 0.0;

        let n_f = n as f32;
        for _ in 0..self.max_iter {
            let mut grad_w = vec![0.0f32; d];
            let mut grad_b = 0.0f32;

            for r in 0..n {
                let target = if y[r] == 1 { 1.0 } else { 0.0 };
                let error = sigmoid(self.decision(x, r)) - target;
                for (c, g) in grad_w.iter_mut().enumerate() {
                    *g += error * x[(r, c)];
                }
                grad_b += error;
            }

            for (w, g) in self.weights.iter_mut().zip(grad_w.iter()) {
                *w -= self.learning_rate * (g / n_f + self.l2 * *w);
            }
            self.bias -= self.learning_rate * grad_b / n_f;
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Array1<i32>> {
        if self.weights.is_empty() {
            bail!("LogisticRegression::predict called before fit");
        }
        if x.ncols() != self.weights.len() {
            return Err(DataError::DimensionMismatch {
                expected: self.weights.len(),
                actual: x.ncols(),
            }
            .into());
        }

        let labels = (0..x.nrows())
            .map(|r| if sigmoid(self.decision(x, r)) >= 0.5 { 1 } else { 0 })
            .collect();
        Ok(Array1::from_vec(labels))
    }

    fn feature_importance(&self) -> Option<Array1<f32>> {
        if self.weights.is_empty() {
            return None;
        }
        Some(Array1::from_vec(
            self.weights.iter().map(|w| w.abs()).collect(),
        ))
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}
