//! Importance-based feature selection.
//!
//! The experiment runner derives two of its feature subsets by ranking a
//! fitted model's importance magnitudes and keeping the top k columns.

use ndarray::Array1;

/// Return the names of the `k` features with the highest importance
/// magnitudes, in descending-magnitude order.
///
/// Ties keep the original column order (stable sort). `k` is clamped to the
/// number of columns.
pub fn top_k_features(names: &[String], importances: &Array1<f32>, k: usize) -> Vec<String> {
    assert_eq!(
        names.len(),
        importances.len(),
        "top_k_features: one importance per feature name expected"
    );

    let mut indices: Vec<usize> = (0..names.len()).collect();
    indices.sort_by(|&i, &j| {
        importances[j]
            .abs()
            .partial_cmp(&importances[i].abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    indices
        .into_iter()
        .take(k.min(names.len()))
        .map(|i| names[i].clone())
        .collect()
}

/// Print an importance ranking the way the experiment log displays it:
/// one `name  magnitude` line per feature, highest first.
pub fn log_importance_ranking(source: &str, names: &[String], importances: &Array1<f32>) {
    let ranked = top_k_features(names, importances, names.len());
    println!("Feature importances from {} :-", source);
    for name in &ranked {
        let idx = names.iter().position(|n| n == name).unwrap_or(0);
        println!("  {:<24} {:.4}", name, importances[idx].abs());
    }
}
