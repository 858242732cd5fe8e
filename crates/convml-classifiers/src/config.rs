use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default random seed carried across all seeded models so runs reproduce.
pub const DEFAULT_RANDOM_STATE: u64 = 23;

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    RandomForest {
        n_estimators: usize,
        max_depth: usize,
        min_samples_split: usize,
        random_state: u64,
    },
    LogisticRegression {
        max_iter: usize,
        learning_rate: f32,
        l2: f32,
    },
    Sgd {
        epochs: usize,
        learning_rate: f32,
        l2: f32,
        random_state: u64,
    },
    Gbdt {
        max_depth: u32,
        num_boost_round: u32,
        learning_rate: f32,
    },
}

impl ModelType {
    pub fn random_forest(random_state: u64) -> Self {
        ModelType::RandomForest {
            n_estimators: 100,
            max_depth: 16,
            min_samples_split: 2,
            random_state,
        }
    }

    pub fn logistic_regression() -> Self {
        ModelType::LogisticRegression {
            max_iter: 2500,
            learning_rate: 0.01,
            l2: 1e-4,
        }
    }

    pub fn sgd(random_state: u64) -> Self {
        ModelType::Sgd {
            epochs: 5,
            learning_rate: 0.01,
            l2: 1e-4,
            random_state,
        }
    }

    pub fn gbdt() -> Self {
        ModelType::Gbdt {
            max_depth: 6,
            num_boost_round: 100,
            learning_rate: 0.1,
        }
    }

    /// Short label used as the model-name prefix in leaderboard rows.
    pub fn short_name(&self) -> &'static str {
        match self {
            ModelType::RandomForest { .. } => "RF",
            ModelType::LogisticRegression { .. } => "LR",
            ModelType::Sgd { .. } => "SGD",
            ModelType::Gbdt { .. } => "GB",
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::sgd(DEFAULT_RANDOM_STATE)
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rf" | "random_forest" => Ok(ModelType::random_forest(DEFAULT_RANDOM_STATE)),
            "lr" | "logistic_regression" => Ok(ModelType::logistic_regression()),
            "sgd" => Ok(ModelType::sgd(DEFAULT_RANDOM_STATE)),
            "gb" | "gbdt" => Ok(ModelType::gbdt()),
            _ => Err(format!(
                "Unknown model type: {}. Expected one of rf, lr, sgd, gbdt",
                s
            )),
        }
    }
}
