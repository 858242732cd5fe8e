//! Tests for CLI configuration loading and defaults.

use std::path::PathBuf;

use convml_cli::experiments::{load_experiment_config, ExperimentConfig};
use convml_cli::update::{load_update_config, UpdateConfig};

#[test]
fn experiment_config_defaults() {
    let config = ExperimentConfig::default();
    assert_eq!(
        config.dataset_path,
        PathBuf::from("base_data_resampled_tomek.csv")
    );
    assert_eq!(config.output_path, PathBuf::from("model_scores.csv"));
    assert_eq!(config.folds, 10);
    assert_eq!(config.random_state, 23);
}

#[test]
fn experiment_config_partial_json_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"folds": 5, "dataset_path": "custom.csv"}"#).unwrap();

    let config = load_experiment_config(&path).unwrap();
    assert_eq!(config.folds, 5);
    assert_eq!(config.dataset_path, PathBuf::from("custom.csv"));
    assert_eq!(config.output_path, PathBuf::from("model_scores.csv"));
    assert_eq!(config.random_state, 23);
}

#[test]
fn experiment_config_missing_file_errors() {
    assert!(load_experiment_config("no/such/config.json").is_err());
}

#[test]
fn experiment_config_invalid_json_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(load_experiment_config(&path).is_err());
}

#[test]
fn update_config_defaults() {
    let config = UpdateConfig::default();
    assert_eq!(config.data_path, PathBuf::from("conversion_stream.csv"));
    assert_eq!(
        config.artifact_path,
        PathBuf::from("sgd_feature_set_1.model")
    );
    assert!(config.feature_set.is_none());
}

#[test]
fn update_config_round_trips_through_json() {
    let config = UpdateConfig {
        data_path: PathBuf::from("window.csv"),
        artifact_path: PathBuf::from("model.bin"),
        feature_set: Some(vec!["count_pay_attempt".to_string()]),
    };
    let json = serde_json::to_string(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.json");
    std::fs::write(&path, json).unwrap();

    let loaded = load_update_config(&path).unwrap();
    assert_eq!(loaded.data_path, config.data_path);
    assert_eq!(loaded.artifact_path, config.artifact_path);
    assert_eq!(loaded.feature_set, config.feature_set);
}
