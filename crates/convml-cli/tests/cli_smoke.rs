//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `convml` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use assert_cmd::Command;
use ndarray::{Array1, Array2};
use predicates::prelude::*;

use convml_classifiers::models::sgd::SgdClassifier;
use convml_classifiers::models::Classifier;
use convml_classifiers::persistence::{load_model, save_model};

fn cmd() -> Command {
    Command::cargo_bin("convml").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("experiments"))
        .stdout(predicate::str::contains("model"));
}

#[test]
fn version_flag() {
    cmd().arg("--version").assert().success();
}

// ---------------------------------------------------------------------------
// experiments subcommand
// ---------------------------------------------------------------------------

#[test]
fn experiments_run_nonexistent_dataset_errors() {
    cmd()
        .args(["experiments", "run", "--dataset", "/nonexistent/data.csv"])
        .assert()
        .failure();
}

#[test]
fn experiments_run_nonexistent_config_errors() {
    cmd()
        .args(["experiments", "run", "/nonexistent/config.json"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// model update subcommand
// ---------------------------------------------------------------------------

#[test]
fn model_update_missing_data_errors() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["model", "update"])
        .assert()
        .failure();
}

#[test]
fn model_update_invalid_as_of_errors() {
    cmd()
        .args(["model", "update", "--as-of", "30-09-2021"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --as-of date"));
}

#[test]
fn model_update_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("stream.csv");
    let artifact_path = dir.path().join("model.bin");

    std::fs::write(
        &data_path,
        "email,date,transactions_amount,count_pay_attempt,nunique_beacon_type,\
         count_user_stay,count_buy_click,profile_submit_count,sum_beacon_value,\
         conversion_status\n\
         a@x.com,2021-09-28,120.0,3.0,2.0,14.0,4.0,1.0,9.0,1\n\
         b@x.com,2021-09-28,0.0,0.0,1.0,2.0,0.0,0.0,1.0,0\n\
         c@x.com,2021-09-29,85.5,2.0,2.0,10.0,3.0,1.0,7.0,1\n\
         d@x.com,2021-09-29,4.0,1.0,1.0,3.0,1.0,0.0,2.0,0\n",
    )
    .unwrap();

    // Seed an artifact fit on the same 7-feature layout.
    let mut model = SgdClassifier::new(3, 0.1, 0.0, 23);
    let x = Array2::from_shape_vec(
        (4, 7),
        (0..28).map(|i| (i % 5) as f32 * 0.5 - 1.0).collect(),
    )
    .unwrap();
    let y = Array1::from_vec(vec![1, 0, 1, 0]);
    model.fit(&x, &y).unwrap();
    save_model(&model, &artifact_path).unwrap();
    let seen_before = model.samples_seen();

    cmd()
        .args([
            "model",
            "update",
            "--data",
            data_path.to_str().unwrap(),
            "--artifact",
            artifact_path.to_str().unwrap(),
            "--as-of",
            "2021-09-30",
        ])
        .assert()
        .success();

    let updated = load_model(&artifact_path).unwrap();
    assert_eq!(updated.samples_seen(), seen_before + 4);
    assert_eq!(updated.n_features(), Some(7));

    // A second run three days later finds no rows in the window.
    cmd()
        .args([
            "model",
            "update",
            "--data",
            data_path.to_str().unwrap(),
            "--artifact",
            artifact_path.to_str().unwrap(),
            "--as-of",
            "2021-10-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No labeled rows"));
}
