//! Behavioral-dataset CSV reader.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use ndarray::{Array1, Array2};

use crate::data_handling::{ConversionData, DatasetMetadata};

/// Configuration for reading the conversion dataset CSV.
#[derive(Debug, Clone)]
pub struct DatasetReaderConfig {
    /// Column name holding the binary conversion label (0 / 1).
    pub label_column: String,
    /// Column name for the record identifier.
    pub id_column: String,
    /// Column name for the row date.
    pub date_column: String,
    /// Date format understood by chrono.
    pub date_format: String,
    /// Optional list of feature columns to load (in order).
    /// When `None`, all remaining columns are treated as features.
    pub feature_columns: Option<Vec<String>>,
}

impl Default for DatasetReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "conversion_status".to_string(),
            id_column: "email".to_string(),
            date_column: "date".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            feature_columns: None,
        }
    }
}

/// Read the dataset CSV into arrays and metadata using the default layout.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<ConversionData> {
    read_dataset_with_config(path, &DatasetReaderConfig::default())
}

/// Read the dataset CSV using a custom configuration.
pub fn read_dataset_with_config<P: AsRef<Path>>(
    path: P,
    config: &DatasetReaderConfig,
) -> Result<ConversionData> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read dataset header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", config.label_column))?;
    let id_idx = find_column(&headers, &config.id_column)
        .ok_or_else(|| anyhow!("Missing identifier column '{}'", config.id_column))?;
    let date_idx = find_column(&headers, &config.date_column)
        .ok_or_else(|| anyhow!("Missing date column '{}'", config.date_column))?;

    let feature_indices = resolve_feature_indices(&headers, config, label_idx, id_idx, date_idx)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in dataset header"));
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut record_ids = Vec::new();
    let mut dates = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?
            .trim()
            .parse::<i32>()
            .with_context(|| format!("Invalid label at row {}", row_idx + 1))?;
        labels.push(label);

        record_ids.push(
            record
                .get(id_idx)
                .unwrap_or_default()
                .trim()
                .to_string(),
        );

        let date_value = record
            .get(date_idx)
            .ok_or_else(|| anyhow!("Missing date value at row {}", row_idx + 1))?
            .trim();
        let date = NaiveDate::parse_from_str(date_value, &config.date_format)
            .with_context(|| format!("Invalid date '{}' at row {}", date_value, row_idx + 1))?;
        dates.push(date);

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let parsed = value.trim().parse::<f32>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            features.push(parsed);
        }
    }

    let n_samples = labels.len();
    let n_features = feature_indices.len();
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;
    let y = Array1::from_vec(labels);

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    let metadata = DatasetMetadata {
        record_id: record_ids,
        date: dates,
        feature_names,
    };

    Ok(ConversionData::new(x, y, metadata))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &DatasetReaderConfig,
    label_idx: usize,
    id_idx: usize,
    date_idx: usize,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| anyhow!("Missing feature column '{}'", name))?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    let indices = (0..headers.len())
        .filter(|&idx| idx != label_idx && idx != id_idx && idx != date_idx)
        .collect();
    Ok(indices)
}
