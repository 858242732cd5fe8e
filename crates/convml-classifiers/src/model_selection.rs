//! Stratified k-fold cross-validation.
//!
//! Folds are dealt deterministically (class indices round-robin into k
//! buckets, in data order), so a fixed dataset always produces the same
//! splits. Fold evaluation fans out across the rayon worker pool for the
//! duration of one `cross_validate` call and rejoins before returning.

use std::time::Instant;

use anyhow::{bail, Result};
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;

use crate::config::ModelType;
use crate::metrics::{balanced_accuracy, recall};
use crate::models::build_model;

/// Per-fold metric vectors from one cross-validation run.
#[derive(Debug, Clone)]
pub struct CrossValidationScores {
    pub test_balanced_accuracy: Vec<f64>,
    pub test_recall: Vec<f64>,
    pub train_balanced_accuracy: Vec<f64>,
    pub train_recall: Vec<f64>,
    pub fit_time: Vec<f64>,
    pub score_time: Vec<f64>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

impl CrossValidationScores {
    pub fn mean_test_balanced_accuracy(&self) -> f64 {
        mean(&self.test_balanced_accuracy)
    }

    pub fn mean_test_recall(&self) -> f64 {
        mean(&self.test_recall)
    }

    pub fn mean_train_balanced_accuracy(&self) -> f64 {
        mean(&self.train_balanced_accuracy)
    }

    pub fn mean_train_recall(&self) -> f64 {
        mean(&self.train_recall)
    }

    /// Cumulative fit time across folds, in seconds.
    pub fn total_fit_time(&self) -> f64 {
        self.fit_time.iter().sum()
    }

    /// Cumulative score time across folds, in seconds.
    pub fn total_score_time(&self) -> f64 {
        self.score_time.iter().sum()
    }
}

struct FoldScore {
    test_balanced_accuracy: f64,
    test_recall: f64,
    train_balanced_accuracy: f64,
    train_recall: f64,
    fit_time: f64,
    score_time: f64,
}

/// Deal each class's indices round-robin into `k` test buckets and return
/// the (train, test) index pair per fold.
pub fn stratified_folds(y: &Array1<i32>, k: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
    if k < 2 {
        bail!("Cross-validation requires at least 2 folds, got {}", k);
    }
    if y.len() < k {
        bail!(
            "Cannot split {} samples into {} folds",
            y.len(),
            k
        );
    }
    for class in [0, 1] {
        let count = y.iter().filter(|&&v| v == class).count();
        if count > 0 && count < k {
            bail!(
                "Class {} has {} members, fewer than the {} requested folds",
                class,
                count,
                k
            );
        }
    }

    let mut assignment = vec![0usize; y.len()];
    for class in [0, 1] {
        for (position, idx) in y
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| if v == class { Some(i) } else { None })
            .enumerate()
        {
            assignment[idx] = position % k;
        }
    }

    let folds = (0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..y.len()).partition(|&i| assignment[i] == fold);
            (train, test)
        })
        .collect();
    Ok(folds)
}

/// Run stratified k-fold cross-validation of one model type, measuring
/// balanced accuracy and recall on both the held-out and training
/// partitions plus per-fold fit and score times.
pub fn cross_validate(
    model_type: &ModelType,
    x: &Array2<f32>,
    y: &Array1<i32>,
    k: usize,
) -> Result<CrossValidationScores> {
    if x.nrows() != y.len() {
        bail!(
            "cross_validate: {} rows but {} labels",
            x.nrows(),
            y.len()
        );
    }

    let folds = stratified_folds(y, k)?;

    let fold_scores: Vec<FoldScore> = folds
        .into_par_iter()
        .enumerate()
        .map(|(fold, (train_idx, test_idx))| -> Result<FoldScore> {
            let x_train = x.select(Axis(0), &train_idx);
            let y_train = y.select(Axis(0), &train_idx);
            let x_test = x.select(Axis(0), &test_idx);
            let y_test = y.select(Axis(0), &test_idx);

            let train_classes = y_train.iter().filter(|&&v| v == 1).count();
            if train_classes == 0 || train_classes == y_train.len() {
                bail!(
                    "Training partition for fold {} contains a single class",
                    fold
                );
            }

            let mut model = build_model(model_type);

            let fit_start = Instant::now();
            model.fit(&x_train, &y_train)?;
            let fit_time = fit_start.elapsed().as_secs_f64();

            let score_start = Instant::now();
            let test_pred = model.predict(&x_test)?;
            let test_balanced_accuracy = balanced_accuracy(&y_test, &test_pred);
            let test_recall = recall(&y_test, &test_pred);
            let score_time = score_start.elapsed().as_secs_f64();

            let train_pred = model.predict(&x_train)?;
            let train_balanced_accuracy = balanced_accuracy(&y_train, &train_pred);
            let train_recall = recall(&y_train, &train_pred);

            Ok(FoldScore {
                test_balanced_accuracy,
                test_recall,
                train_balanced_accuracy,
                train_recall,
                fit_time,
                score_time,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut scores = CrossValidationScores {
        test_balanced_accuracy: Vec::with_capacity(k),
        test_recall: Vec::with_capacity(k),
        train_balanced_accuracy: Vec::with_capacity(k),
        train_recall: Vec::with_capacity(k),
        fit_time: Vec::with_capacity(k),
        score_time: Vec::with_capacity(k),
    };
    for fold in fold_scores {
        scores.test_balanced_accuracy.push(fold.test_balanced_accuracy);
        scores.test_recall.push(fold.test_recall);
        scores
            .train_balanced_accuracy
            .push(fold.train_balanced_accuracy);
        scores.train_recall.push(fold.train_recall);
        scores.fit_time.push(fold.fit_time);
        scores.score_time.push(fold.score_time);
    }
    Ok(scores)
}
