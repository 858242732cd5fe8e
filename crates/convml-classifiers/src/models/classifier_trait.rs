use anyhow::Result;
use ndarray::{Array1, Array2};

/// A small trait abstraction over the classifier models evaluated by the
/// experiment runner. Labels use the crate convention (1 converted, 0 not).
pub trait Classifier {
    /// Fit the model on a feature matrix of shape (n_samples, n_features).
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) -> Result<()>;

    /// Predict hard 0/1 labels for each row of `x`.
    fn predict(&self, x: &Array2<f32>) -> Result<Array1<i32>>;

    /// Per-feature importance magnitudes, when the model surfaces them.
    fn feature_importance(&self) -> Option<Array1<f32>> {
        None
    }

    /// Human readable name for the model.
    fn name(&self) -> &str {
        "classifier"
    }
}
