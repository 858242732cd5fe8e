//! Model-artifact persistence.
//!
//! The deployed model is an `SgdClassifier` serialized with bincode to a
//! single file: an opaque blob, no schema versioning. The incremental
//! updater reads and rewrites it in place.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::sgd::SgdClassifier;

/// Serialize `model` and overwrite the artifact at `path`.
pub fn save_model<P: AsRef<Path>>(model: &SgdClassifier, path: P) -> Result<()> {
    let bytes = bincode::serialize(model).context("Failed to serialize model artifact")?;
    std::fs::write(&path, bytes).with_context(|| {
        format!(
            "Failed to write model artifact: {}",
            path.as_ref().display()
        )
    })?;
    Ok(())
}

/// Load a previously persisted model artifact from `path`.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<SgdClassifier> {
    let bytes = std::fs::read(&path).with_context(|| {
        format!(
            "Failed to read model artifact: {}",
            path.as_ref().display()
        )
    })?;
    let model = bincode::deserialize(&bytes).with_context(|| {
        format!(
            "Failed to deserialize model artifact: {}",
            path.as_ref().display()
        )
    })?;
    Ok(model)
}
