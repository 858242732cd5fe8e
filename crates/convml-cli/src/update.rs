//! `model update` subcommand: one incremental partial-fit step over the
//! trailing window of new labeled rows.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use convml_classifiers::incremental::{CsvDataSource, IncrementalUpdater};

/// Parameters for one incremental update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// CSV file the trailing window is pulled from, in the training layout.
    pub data_path: PathBuf,
    /// Serialized SGD model artifact, read and rewritten in place.
    pub artifact_path: PathBuf,
    /// Optional override of the fixed feature subset the artifact was
    /// trained on.
    pub feature_set: Option<Vec<String>>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("conversion_stream.csv"),
            artifact_path: PathBuf::from("sgd_feature_set_1.model"),
            feature_set: None,
        }
    }
}

/// Load an update configuration from a JSON file.
pub fn load_update_config<P: AsRef<Path>>(path: P) -> Result<UpdateConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: UpdateConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Apply one incremental update as of `as_of_date`.
pub fn run_update(config: &UpdateConfig, as_of_date: NaiveDate) -> Result<()> {
    let source = CsvDataSource::new(&config.data_path);
    let mut updater = IncrementalUpdater::new(&config.artifact_path);
    if let Some(feature_set) = &config.feature_set {
        updater = updater.with_feature_set(feature_set.clone());
    }
    updater.update_model(&source, as_of_date)?;
    eprintln!(
        "[convml::model] Updated {} from rows since {} days before {}.",
        config.artifact_path.display(),
        convml_classifiers::incremental::TRAILING_WINDOW_DAYS,
        as_of_date
    );
    Ok(())
}
