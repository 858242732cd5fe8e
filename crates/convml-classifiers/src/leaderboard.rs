//! Leaderboard tracker: accumulates one evaluation record per
//! (model, feature subset, scaling) trial and always exposes the current
//! ranking.
//!
//! The collection is an owned, append-only `Vec` created by the caller; no
//! process-wide state. Records are never mutated after insertion; the
//! ranked view re-sorts and re-rounds on every call.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model_selection::CrossValidationScores;

/// One evaluated (model, feature subset, scaling) combination.
///
/// Field names follow the leaderboard CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    pub model_name: String,
    pub feature_count: usize,
    #[serde(rename = "Balanced_Accuracy_test")]
    pub balanced_accuracy_test: f64,
    #[serde(rename = "Recall_test")]
    pub recall_test: f64,
    #[serde(rename = "Balanced_Accuracy_train")]
    pub balanced_accuracy_train: f64,
    #[serde(rename = "Recall_train")]
    pub recall_train: f64,
    #[serde(rename = "Fit_time")]
    pub fit_time: f64,
    #[serde(rename = "Score_time")]
    pub score_time: f64,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl EvaluationRecord {
    fn rounded(&self) -> EvaluationRecord {
        EvaluationRecord {
            model_name: self.model_name.clone(),
            feature_count: self.feature_count,
            balanced_accuracy_test: round3(self.balanced_accuracy_test),
            recall_test: round3(self.recall_test),
            balanced_accuracy_train: round3(self.balanced_accuracy_train),
            recall_train: round3(self.recall_train),
            fit_time: round3(self.fit_time),
            score_time: round3(self.score_time),
        }
    }
}

/// Append-only collection of evaluation records with a ranked view.
#[derive(Debug, Default)]
pub struct Leaderboard {
    records: Vec<EvaluationRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Leaderboard {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one record and return the full ranked table.
    pub fn record_and_rank(
        &mut self,
        label: &str,
        feature_count: usize,
        test_balanced_accuracy: f64,
        test_recall: f64,
        train_balanced_accuracy: f64,
        train_recall: f64,
        fit_time: f64,
        score_time: f64,
    ) -> Vec<EvaluationRecord> {
        self.records.push(EvaluationRecord {
            model_name: label.to_string(),
            feature_count,
            balanced_accuracy_test: test_balanced_accuracy,
            recall_test: test_recall,
            balanced_accuracy_train: train_balanced_accuracy,
            recall_train: train_recall,
            fit_time,
            score_time,
        });
        self.ranked()
    }

    /// Convenience wrapper feeding one cross-validation result into
    /// `record_and_rank`: metrics averaged across folds, times summed.
    pub fn record_scores(
        &mut self,
        label: &str,
        feature_count: usize,
        scores: &CrossValidationScores,
    ) -> Vec<EvaluationRecord> {
        self.record_and_rank(
            label,
            feature_count,
            scores.mean_test_balanced_accuracy(),
            scores.mean_test_recall(),
            scores.mean_train_balanced_accuracy(),
            scores.mean_train_recall(),
            scores.total_fit_time(),
            scores.total_score_time(),
        )
    }

    /// The current table: all records, rounded to 3 decimals, sorted in
    /// descending test balanced accuracy. The sort is stable, so ties keep
    /// insertion order.
    pub fn ranked(&self) -> Vec<EvaluationRecord> {
        let mut table: Vec<EvaluationRecord> =
            self.records.iter().map(|r| r.rounded()).collect();
        table.sort_by(|a, b| {
            b.balanced_accuracy_test
                .partial_cmp(&a.balanced_accuracy_test)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        table
    }

    /// Write the ranked table to a CSV file (UTF-8, header row, no index
    /// column), overwriting any existing file at `path`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(&path).with_context(|| {
            format!(
                "Failed to create leaderboard file: {}",
                path.as_ref().display()
            )
        })?;
        for record in self.ranked() {
            writer
                .serialize(&record)
                .context("Failed to write leaderboard row")?;
        }
        writer.flush().context("Failed to flush leaderboard file")?;
        Ok(())
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<28} {:>13} {:>22} {:>11} {:>23} {:>12} {:>9} {:>10}",
            "model_name",
            "feature_count",
            "Balanced_Accuracy_test",
            "Recall_test",
            "Balanced_Accuracy_train",
            "Recall_train",
            "Fit_time",
            "Score_time"
        )?;
        for r in self.ranked() {
            writeln!(
                f,
                "{:<28} {:>13} {:>22.3} {:>11.3} {:>23.3} {:>12.3} {:>9.3} {:>10.3}",
                r.model_name,
                r.feature_count,
                r.balanced_accuracy_test,
                r.recall_test,
                r.balanced_accuracy_train,
                r.recall_train,
                r.fit_time,
                r.score_time
            )?;
        }
        Ok(())
    }
}
