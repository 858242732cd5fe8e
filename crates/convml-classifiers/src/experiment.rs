//! Experiment runner: evaluates several classifier types across multiple
//! feature subsets and scaling strategies via cross-validation, feeding one
//! leaderboard row per trial.
//!
//! Subset derivation and subset evaluation are distinct, sequential phases:
//! the importance-based subsets are computed once, from a single fit on the
//! full feature set, and then reused as fixed subsets across all later
//! trials. Nothing is re-derived per fold or per scaling choice.

use anyhow::{anyhow, Result};
use ndarray::{Array1, Array2};

use crate::config::ModelType;
use crate::data_handling::ConversionData;
use crate::feature_selection::{log_importance_ranking, top_k_features};
use crate::leaderboard::Leaderboard;
use crate::model_selection::cross_validate;
use crate::models::build_model;
use crate::preprocessing::Scaling;

/// Importance-ranked subsets keep this many features.
const TOP_K: usize = 7;

/// Hand-specified subsets from the offline correlation analysis.
pub const FEATURE_SET_3: [&str; 8] = [
    "sum_beacon_value",
    "count_pay_attempt",
    "count_buy_click",
    "nunique_dob",
    "nunique_language",
    "nunique_report_type",
    "nunique_device",
    "transactions_amount",
];

pub const FEATURE_SET_4: [&str; 6] = [
    "sum_beacon_value",
    "count_pay_attempt",
    "count_buy_click",
    "nunique_report_type",
    "nunique_device",
    "transactions_amount",
];

pub const FEATURE_SET_5: [&str; 4] = [
    "count_pay_attempt",
    "count_buy_click",
    "nunique_report_type",
    "profile_submit_count",
];

/// Drives the full evaluation protocol and owns the accumulating
/// leaderboard. The leaderboard is returned to the caller when the run
/// completes; there is no process-wide state.
pub struct ExperimentRunner {
    folds: usize,
    random_state: u64,
    leaderboard: Leaderboard,
}

impl ExperimentRunner {
    pub fn new(folds: usize, random_state: u64) -> Self {
        ExperimentRunner {
            folds,
            random_state,
            leaderboard: Leaderboard::new(),
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Cross-validate one (model, subset, scaling) combination and append
    /// its row to the leaderboard.
    pub fn evaluate(
        &mut self,
        model: &ModelType,
        subset_label: &str,
        scaling: Scaling,
        x: &Array2<f32>,
        y: &Array1<i32>,
    ) -> Result<()> {
        let label = format!("{} {}{}", model.short_name(), subset_label, scaling.suffix());
        log::debug!("Evaluating {}", label);
        let x_scaled = scaling.apply(x);
        let scores = cross_validate(model, &x_scaled, y, self.folds)?;
        self.leaderboard
            .record_scores(&label, x_scaled.ncols(), &scores);
        Ok(())
    }

    /// Run the full experiment protocol and return the final leaderboard.
    pub fn run(mut self, data: &ConversionData) -> Result<Leaderboard> {
        data.log_input_data_summary();

        let rf = ModelType::random_forest(self.random_state);
        let lr = ModelType::logistic_regression();
        let sgd = ModelType::sgd(self.random_state);
        let gb = ModelType::gbdt();

        println!("Fitting algorithms taking all features ...");
        for model in [&rf, &lr, &sgd] {
            self.evaluate(model, "all features", Scaling::None, &data.x, &data.y)?;
        }

        println!("\nChoosing the top {} features to create feature_set_1 ...", TOP_K);
        let feature_set_1 = derive_importance_subset(&rf, data, "random forest")?;
        println!("Feature set 1: {:?}", feature_set_1);

        println!("\nFitting algorithms with feature_set_1 ...");
        let subset_1 = data.select_features(&feature_set_1)?;
        for model in [&rf, &lr, &sgd, &gb] {
            self.evaluate(model, "feature_set_1", Scaling::None, &subset_1.x, &subset_1.y)?;
        }

        println!(
            "\nChoosing the top {} features from the logistic regression fit to create feature_set_2 ...",
            TOP_K
        );
        let feature_set_2 = derive_importance_subset(&lr, data, "logistic regression")?;
        println!("Feature set 2: {:?}", feature_set_2);

        println!("\nFitting algorithms with feature_set_2 ...");
        let subset_2 = data.select_features(&feature_set_2)?;
        for model in [&rf, &lr, &sgd, &gb] {
            self.evaluate(model, "feature_set_2", Scaling::None, &subset_2.x, &subset_2.y)?;
        }

        // Scaled re-runs of the derived subsets. Each evaluate call fits
        // its own scaler; parameters never leak across subsets.
        for (scaling, scaling_word) in [
            (Scaling::MaxAbs, "MaxAbsScaled"),
            (Scaling::Standard, "Standard Scaled"),
        ] {
            for (subset, subset_label) in
                [(&subset_1, "feature_set_1"), (&subset_2, "feature_set_2")]
            {
                println!(
                    "\nFitting algorithms with {} on {} X data ...",
                    subset_label, scaling_word
                );
                for model in [&lr, &sgd, &gb] {
                    self.evaluate(model, subset_label, scaling, &subset.x, &subset.y)?;
                }
            }
        }

        println!("\nFeature set 3: {:?}", FEATURE_SET_3);
        println!("Feature set 4: {:?}", FEATURE_SET_4);
        println!("Feature set 5: {:?}", FEATURE_SET_5);

        let subset_3 = data.select_features(&FEATURE_SET_3)?;
        let subset_4 = data.select_features(&FEATURE_SET_4)?;
        let subset_5 = data.select_features(&FEATURE_SET_5)?;

        for (scaling, scaling_word) in [
            (Scaling::MaxAbs, "MaxAbsScaled"),
            (Scaling::Standard, "Standard Scaled"),
        ] {
            for (subset, subset_label) in [
                (&subset_3, "feature_set_3"),
                (&subset_4, "feature_set_4"),
                (&subset_5, "feature_set_5"),
            ] {
                println!(
                    "\nFitting algorithms with {} on {} X data ...",
                    subset_label, scaling_word
                );
                for model in [&rf, &lr, &sgd, &gb] {
                    self.evaluate(model, subset_label, scaling, &subset.x, &subset.y)?;
                }
            }
        }

        Ok(self.leaderboard)
    }
}

/// Fit `model_type` once on the full feature set and keep the top-k columns
/// by importance magnitude.
fn derive_importance_subset(
    model_type: &ModelType,
    data: &ConversionData,
    source_label: &str,
) -> Result<Vec<String>> {
    let mut model = build_model(model_type);
    model.fit(&data.x, &data.y)?;
    let importances = model
        .feature_importance()
        .ok_or_else(|| anyhow!("Model '{}' exposes no feature importances", model.name()))?;
    log_importance_ranking(source_label, &data.metadata.feature_names, &importances);
    Ok(top_k_features(
        &data.metadata.feature_names,
        &importances,
        TOP_K,
    ))
}
