//! End-to-end tests for the experiment runner.

use chrono::NaiveDate;
use convml_classifiers::config::ModelType;
use convml_classifiers::data_handling::{ConversionData, DatasetMetadata};
use convml_classifiers::experiment::ExperimentRunner;
use convml_classifiers::preprocessing::Scaling;
use ndarray::{Array1, Array2};

const ALL_FEATURES: [&str; 13] = [
    "transactions_amount",
    "count_pay_attempt",
    "nunique_beacon_type",
    "count_user_stay",
    "count_buy_click",
    "profile_submit_count",
    "sum_beacon_value",
    "count_sessions",
    "nunique_report_type",
    "nunique_dob",
    "nunique_gender",
    "nunique_device",
    "nunique_language",
];

/// Deterministic synthetic dataset in the full training layout. The label
/// follows transactions_amount and count_pay_attempt; the rest is noise.
fn synthetic_dataset(n: usize) -> ConversionData {
    let d = ALL_FEATURES.len();
    let mut values = Vec::with_capacity(n * d);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let positive = i % 2 == 0;
        let noise = |k: usize| ((i * 7 + k * 13) % 11) as f32 * 0.1;
        // transactions_amount, count_pay_attempt carry the signal
        values.push(if positive { 150.0 + noise(0) } else { 5.0 + noise(0) });
        values.push(if positive { 4.0 + noise(1) } else { 0.0 + noise(1) });
        for k in 2..d {
            values.push(noise(k));
        }
        labels.push(if positive { 1 } else { 0 });
    }
    let metadata = DatasetMetadata {
        record_id: (0..n).map(|i| format!("user_{}@x.com", i)).collect(),
        date: vec![NaiveDate::from_ymd_opt(2021, 9, 27).unwrap(); n],
        feature_names: ALL_FEATURES.iter().map(|s| s.to_string()).collect(),
    };
    ConversionData::new(
        Array2::from_shape_vec((n, d), values).unwrap(),
        Array1::from_vec(labels),
        metadata,
    )
}

#[test]
fn evaluate_labels_rows_by_model_subset_and_scaling() {
    let data = synthetic_dataset(20);
    let mut runner = ExperimentRunner::new(2, 23);
    let sgd = ModelType::sgd(23);

    runner
        .evaluate(&sgd, "feature_set_1", Scaling::MaxAbs, &data.x, &data.y)
        .unwrap();
    runner
        .evaluate(&sgd, "all features", Scaling::None, &data.x, &data.y)
        .unwrap();

    let table = runner.leaderboard().ranked();
    assert_eq!(table.len(), 2);
    let names: Vec<&str> = table.iter().map(|r| r.model_name.as_str()).collect();
    assert!(names.contains(&"SGD feature_set_1 MaxAbs"));
    assert!(names.contains(&"SGD all features"));
}

#[test]
fn full_protocol_produces_forty_seven_ranked_trials() {
    let data = synthetic_dataset(30);
    let runner = ExperimentRunner::new(2, 23);
    let leaderboard = runner.run(&data).unwrap();

    let table = leaderboard.ranked();
    assert_eq!(table.len(), 47);

    // Sorted non-increasing by test balanced accuracy.
    for pair in table.windows(2) {
        assert!(pair[0].balanced_accuracy_test >= pair[1].balanced_accuracy_test);
    }

    // The derived subsets keep 7 features; set 5 keeps 4.
    assert!(table
        .iter()
        .any(|r| r.model_name == "GB feature_set_1" && r.feature_count == 7));
    assert!(table
        .iter()
        .any(|r| r.model_name == "SGD feature_set_5 StdScale" && r.feature_count == 4));

    // All-feature trials cover the full width.
    assert!(table
        .iter()
        .any(|r| r.model_name == "RF all features" && r.feature_count == 13));
}

#[test]
fn run_fails_when_a_hand_specified_column_is_absent() {
    let mut data = synthetic_dataset(20);
    data.metadata.feature_names[8] = "renamed_column".to_string();
    let runner = ExperimentRunner::new(2, 23);
    assert!(runner.run(&data).is_err());
}
