//! Data structures and helpers for loading and manipulating the conversion
//! dataset.
//!
//! This module defines `DatasetMetadata` and `ConversionData` and contains
//! helpers for selecting named feature subsets and filtering rows by date,
//! used by the experiment runner and the incremental updater.
use chrono::NaiveDate;
use ndarray::{Array1, Array2, Axis};

use crate::error::DataError;

/// Per-row bookkeeping that never enters the feature matrix.
#[derive(Debug, Clone)]
pub struct DatasetMetadata {
    /// Record identifier (an email-like key)
    pub record_id: Vec<String>,
    /// Row date
    pub date: Vec<NaiveDate>,
    /// Feature names, in feature-matrix column order
    pub feature_names: Vec<String>,
}

/// A labeled dataset split into a feature matrix and a binary label vector.
///
/// Invariant: the identifier, date and label columns are excluded from `x`
/// before any model sees it.
#[derive(Debug, Clone)]
pub struct ConversionData {
    pub x: Array2<f32>,
    pub y: Array1<i32>,
    pub metadata: DatasetMetadata,
}

impl ConversionData {
    pub fn new(x: Array2<f32>, y: Array1<i32>, metadata: DatasetMetadata) -> Self {
        ConversionData { x, y, metadata }
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn log_input_data_summary(&self) {
        println!("----- Input Data Summary -----");
        println!(
            "Info: {} converted and {} unconverted rows",
            self.y.iter().filter(|&&v| v == 1).count(),
            self.y.iter().filter(|&&v| v != 1).count()
        );
        println!("Info: {} feature columns", self.x.ncols());
        println!("-------------------------------");
    }

    /// Restrict the feature matrix to a named subset, in the requested order.
    ///
    /// Label and metadata rows are carried over unchanged. A name that does
    /// not match any feature column is a fatal error.
    pub fn select_features<S: AsRef<str>>(&self, names: &[S]) -> anyhow::Result<ConversionData> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = self
                .metadata
                .feature_names
                .iter()
                .position(|f| f == name.as_ref())
                .ok_or_else(|| DataError::MissingColumn(name.as_ref().to_string()))?;
            indices.push(idx);
        }

        let metadata = DatasetMetadata {
            record_id: self.metadata.record_id.clone(),
            date: self.metadata.date.clone(),
            feature_names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        };

        Ok(ConversionData {
            x: self.x.select(Axis(1), &indices),
            y: self.y.clone(),
            metadata,
        })
    }

    /// Keep only rows whose date is on or after `cutoff`.
    pub fn filter_since(&self, cutoff: NaiveDate) -> ConversionData {
        let keep: Vec<usize> = self
            .metadata
            .date
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| if d >= cutoff { Some(i) } else { None })
            .collect();
        self.select_rows(&keep)
    }

    /// Select rows by index across all row-aligned fields.
    pub fn select_rows(&self, indices: &[usize]) -> ConversionData {
        ConversionData {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
            metadata: self.metadata.filter_by_indices(indices),
        }
    }
}

impl DatasetMetadata {
    pub fn filter_by_indices(&self, indices: &[usize]) -> DatasetMetadata {
        DatasetMetadata {
            record_id: indices
                .iter()
                .map(|&i| self.record_id[i].clone())
                .collect(),
            date: indices.iter().map(|&i| self.date[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> ConversionData {
        let x = Array2::from_shape_vec((3, 2), vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]).unwrap();
        let y = Array1::from_vec(vec![1, 0, 1]);
        let metadata = DatasetMetadata {
            record_id: vec!["a@x.com".into(), "b@x.com".into(), "c@x.com".into()],
            date: vec![
                NaiveDate::from_ymd_opt(2021, 9, 25).unwrap(),
                NaiveDate::from_ymd_opt(2021, 9, 27).unwrap(),
                NaiveDate::from_ymd_opt(2021, 9, 29).unwrap(),
            ],
            feature_names: vec!["count_sessions".into(), "transactions_amount".into()],
        };
        ConversionData::new(x, y, metadata)
    }

    #[test]
    fn select_features_preserves_requested_order() {
        let data = sample_data();
        let subset = data
            .select_features(&["transactions_amount", "count_sessions"])
            .unwrap();
        assert_eq!(
            subset.metadata.feature_names,
            vec!["transactions_amount", "count_sessions"]
        );
        assert_eq!(subset.x[(0, 0)], 10.0);
        assert_eq!(subset.x[(0, 1)], 1.0);
    }

    #[test]
    fn select_features_unknown_name_errors() {
        let data = sample_data();
        assert!(data.select_features(&["nunique_device"]).is_err());
    }

    #[test]
    fn filter_since_drops_older_rows() {
        let data = sample_data();
        let cutoff = NaiveDate::from_ymd_opt(2021, 9, 27).unwrap();
        let window = data.filter_since(cutoff);
        assert_eq!(window.n_samples(), 2);
        assert_eq!(window.metadata.record_id, vec!["b@x.com", "c@x.com"]);
    }
}
