//! Column-wise scaling utilities.
//!
//! Provides mean/std standardization and max-absolute scaling over the
//! crate's `Array2<f32>` feature matrices. Every `Scaling::apply` call fits
//! a fresh scaler instance, so fit parameters are never shared between
//! feature subsets.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Minimum scale denominator to avoid division by zero when transforming.
const MIN_SCALE: f32 = 1e-6;

/// Per-column zero-mean/unit-variance scaler.
#[derive(Clone, Debug)]
pub struct StandardScaler {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl StandardScaler {
    /// Fit from an `Array2<f32>` where rows are samples and columns are
    /// features.
    pub fn fit(x: &Array2<f32>) -> StandardScaler {
        let (nrows, ncols) = x.dim();
        assert!(
            nrows > 0 && ncols > 0,
            "StandardScaler::fit requires non-empty matrix"
        );

        let mut mean = vec![0.0f32; ncols];
        for r in 0..nrows {
            for c in 0..ncols {
                mean[c] += x[(r, c)];
            }
        }
        let nrows_f = nrows as f32;
        for v in mean.iter_mut() {
            *v /= nrows_f;
        }

        let mut std = vec![0.0f32; ncols];
        for r in 0..nrows {
            for c in 0..ncols {
                let d = x[(r, c)] - mean[c];
                std[c] += d * d;
            }
        }
        for v in std.iter_mut() {
            *v = (*v / nrows_f).sqrt().max(MIN_SCALE);
        }

        StandardScaler { mean, std }
    }

    pub fn transform(&self, x: &Array2<f32>) -> Array2<f32> {
        let (nrows, ncols) = x.dim();
        let mut out = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                out.push((x[(r, c)] - self.mean[c]) / self.std[c]);
            }
        }
        Array2::from_shape_vec((nrows, ncols), out).expect("transform: shape mismatch")
    }

    pub fn fit_transform(x: &Array2<f32>) -> Array2<f32> {
        StandardScaler::fit(x).transform(x)
    }
}

/// Per-column max-absolute-value scaler.
#[derive(Clone, Debug)]
pub struct MaxAbsScaler {
    pub max_abs: Vec<f32>,
}

impl MaxAbsScaler {
    pub fn fit(x: &Array2<f32>) -> MaxAbsScaler {
        let (nrows, ncols) = x.dim();
        assert!(
            nrows > 0 && ncols > 0,
            "MaxAbsScaler::fit requires non-empty matrix"
        );

        let mut max_abs = vec![0.0f32; ncols];
        for r in 0..nrows {
            for c in 0..ncols {
                let v = x[(r, c)].abs();
                if v > max_abs[c] {
                    max_abs[c] = v;
                }
            }
        }
        for v in max_abs.iter_mut() {
            *v = v.max(MIN_SCALE);
        }

        MaxAbsScaler { max_abs }
    }

    pub fn transform(&self, x: &Array2<f32>) -> Array2<f32> {
        let (nrows, ncols) = x.dim();
        let mut out = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                out.push(x[(r, c)] / self.max_abs[c]);
            }
        }
        Array2::from_shape_vec((nrows, ncols), out).expect("transform: shape mismatch")
    }

    pub fn fit_transform(x: &Array2<f32>) -> Array2<f32> {
        MaxAbsScaler::fit(x).transform(x)
    }
}

/// Column-wise scaling strategy compared by the experiment runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    None,
    MaxAbs,
    Standard,
}

impl Scaling {
    /// Fit a fresh scaler on `x` and return the transformed matrix.
    pub fn apply(&self, x: &Array2<f32>) -> Array2<f32> {
        match self {
            Scaling::None => x.clone(),
            Scaling::MaxAbs => MaxAbsScaler::fit_transform(x),
            Scaling::Standard => StandardScaler::fit_transform(x),
        }
    }

    /// Leaderboard label suffix for this strategy.
    pub fn suffix(&self) -> &'static str {
        match self {
            Scaling::None => "",
            Scaling::MaxAbs => " MaxAbs",
            Scaling::Standard => " StdScale",
        }
    }
}
