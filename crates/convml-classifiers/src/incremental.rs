//! Incremental model updater.
//!
//! Keeps a deployed SGD model current without full retraining: pulls a
//! fixed trailing window of new labeled rows from a data source, rescales
//! them with a freshly fit standard scaler over a fixed feature subset,
//! applies one partial-fit step, and rewrites the artifact in place.
//!
//! The read-modify-write on the artifact has no concurrent-writer
//! protection; callers are expected to run one update at a time.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Duration, NaiveDate};

use crate::data_handling::ConversionData;
use crate::error::DataError;
use crate::io::{read_dataset_with_config, DatasetReaderConfig};
use crate::persistence::{load_model, save_model};
use crate::preprocessing::Scaling;

/// Days of trailing data used for one incremental update.
pub const TRAILING_WINDOW_DAYS: i64 = 3;

/// The fixed feature subset the deployed model was trained on
/// (top-7 random-forest importances from the experiment runs).
pub const ONLINE_FEATURE_SET: [&str; 7] = [
    "transactions_amount",
    "count_pay_attempt",
    "nunique_beacon_type",
    "count_user_stay",
    "count_buy_click",
    "profile_submit_count",
    "sum_beacon_value",
];

/// A collaborator able to retrieve all labeled rows dated on or after a
/// cutoff, in the same column layout as the training dataset.
pub trait DataSource {
    fn fetch_since(&self, cutoff: NaiveDate) -> Result<ConversionData>;
}

/// `DataSource` over a CSV file in the training-dataset layout.
pub struct CsvDataSource {
    path: PathBuf,
    reader_config: DatasetReaderConfig,
}

impl CsvDataSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvDataSource {
            path: path.as_ref().to_path_buf(),
            reader_config: DatasetReaderConfig::default(),
        }
    }

    pub fn with_reader_config(mut self, config: DatasetReaderConfig) -> Self {
        self.reader_config = config;
        self
    }
}

impl DataSource for CsvDataSource {
    fn fetch_since(&self, cutoff: NaiveDate) -> Result<ConversionData> {
        let data = read_dataset_with_config(&self.path, &self.reader_config)?;
        Ok(data.filter_since(cutoff))
    }
}

/// Single-shot, synchronous updater for the persisted model artifact.
pub struct IncrementalUpdater {
    artifact_path: PathBuf,
    feature_set: Vec<String>,
}

impl IncrementalUpdater {
    pub fn new<P: AsRef<Path>>(artifact_path: P) -> Self {
        IncrementalUpdater {
            artifact_path: artifact_path.as_ref().to_path_buf(),
            feature_set: ONLINE_FEATURE_SET.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override the fixed feature subset the artifact was trained on.
    pub fn with_feature_set(mut self, feature_set: Vec<String>) -> Self {
        self.feature_set = feature_set;
        self
    }

    /// Apply one incremental update as of `as_of_date`.
    ///
    /// Retrieves rows dated within the trailing window, restricts them to
    /// the fixed feature subset, standard-scales them with parameters fit
    /// freshly on just this window, partial-fits the persisted model and
    /// overwrites the artifact. All-or-nothing: an empty window, a missing
    /// or corrupt artifact, and a feature-count mismatch each propagate as
    /// errors with nothing rewritten.
    pub fn update_model(&self, source: &dyn DataSource, as_of_date: NaiveDate) -> Result<()> {
        let cutoff = as_of_date - Duration::days(TRAILING_WINDOW_DAYS);
        log::info!(
            "Incremental update as of {}: requesting rows since {}",
            as_of_date,
            cutoff
        );

        let window = source.fetch_since(cutoff)?;
        if window.n_samples() == 0 {
            return Err(DataError::EmptyWindow { cutoff }.into());
        }
        log::info!("Retrieved {} rows for partial fit", window.n_samples());

        let subset = window.select_features(&self.feature_set)?;
        let x_scaled = Scaling::Standard.apply(&subset.x);

        let mut model = load_model(&self.artifact_path)?;
        model.partial_fit(&x_scaled, &subset.y)?;
        save_model(&model, &self.artifact_path)?;

        log::info!(
            "Updated model artifact at {} ({} samples seen)",
            self.artifact_path.display(),
            model.samples_seen()
        );
        Ok(())
    }
}
