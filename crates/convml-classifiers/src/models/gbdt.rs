use anyhow::{anyhow, bail, Result};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::{Array1, Array2};

use crate::error::DataError;
use crate::models::classifier_trait::Classifier;

/// Gradient Boosting Decision Tree classifier, wrapping the `gbdt` crate
/// with log-likelihood loss. The underlying library expects -1/1 training
/// labels and produces positive-class probabilities from `predict`.
pub struct GradientBoosting {
    max_depth: u32,
    num_boost_round: u32,
    learning_rate: f32,
    model: Option<GBDT>,
    n_features: usize,
}

impl GradientBoosting {
    pub fn new(max_depth: u32, num_boost_round: u32, learning_rate: f32) -> Self {
        GradientBoosting {
            max_depth,
            num_boost_round,
            learning_rate,
            model: None,
            n_features: 0,
        }
    }
}

impl Classifier for GradientBoosting {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<i32>) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            bail!("GradientBoosting::fit requires a non-empty matrix");
        }
        if x.nrows() != y.len() {
            bail!(
                "GradientBoosting::fit: {} rows but {} labels",
                x.nrows(),
                y.len()
            );
        }

        let mut config = Config::new();
        config.set_feature_size(x.ncols());
        config.set_shrinkage(self.learning_rate);
        config.set_max_depth(self.max_depth);
        config.set_iterations(self.num_boost_round as usize);
        config.set_debug(false);
        config.set_training_optimization_level(2);
        config.set_loss("LogLikelyhood");

        let mut gbdt = GBDT::new(&config);

        let mut train_x = DataVec::new();
        for row in 0..x.nrows() {
            let train_row: Vec<f32> = x.row(row).to_vec();
            let label = if y[row] == 1 { 1.0 } else { -1.0 };
            train_x.push(Data::new_training_data(train_row, 1.0, label, None));
        }

        gbdt.fit(&mut train_x);

        self.n_features = x.ncols();
        self.model = Some(gbdt);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Array1<i32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("GradientBoosting::predict called before fit"))?;
        if x.ncols() != self.n_features {
            return Err(DataError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            }
            .into());
        }

        let mut test_x = DataVec::new();
        for row in 0..x.nrows() {
            let test_row: Vec<f32> = x.row(row).to_vec();
            test_x.push(Data::new_training_data(test_row, 1.0, 0.0, None));
        }

        let probabilities = model.predict(&test_x);
        let labels = probabilities
            .iter()
            .map(|&p| if p >= 0.5 { 1 } else { 0 })
            .collect();
        Ok(Array1::from_vec(labels))
    }

    fn name(&self) -> &str {
        "gradient_boosting"
    }
}
