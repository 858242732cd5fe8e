//! `experiments run` subcommand: load the dataset, drive the full
//! evaluation protocol, persist and print the ranked leaderboard.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use convml_classifiers::config::DEFAULT_RANDOM_STATE;
use convml_classifiers::experiment::ExperimentRunner;
use convml_classifiers::io::read_dataset;

/// Parameters for one experiment run. All paths are resolved here, at the
/// boundary; the core logic never hardcodes a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub dataset_path: PathBuf,
    pub output_path: PathBuf,
    pub folds: usize,
    pub random_state: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("base_data_resampled_tomek.csv"),
            output_path: PathBuf::from("model_scores.csv"),
            folds: 10,
            random_state: DEFAULT_RANDOM_STATE,
        }
    }
}

/// Load an experiment configuration from a JSON file.
pub fn load_experiment_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ExperimentConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Run the experiments and write the leaderboard CSV.
pub fn run_experiments(config: &ExperimentConfig) -> Result<()> {
    println!(
        "\n{}\tReading dataset: {} ...",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        config.dataset_path.display()
    );
    let data = read_dataset(&config.dataset_path)?;

    println!("\nSplitting into features and labels ...");
    let runner = ExperimentRunner::new(config.folds, config.random_state);
    let leaderboard = runner.run(&data)?;

    println!("Saving csv ...");
    leaderboard.write_csv(&config.output_path)?;

    println!("Models after training: -\n{}", leaderboard);
    println!(
        "\n{}\tTraining completed !!",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}
