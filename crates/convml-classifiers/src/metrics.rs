//! Classification metrics computed from confusion counts.

use ndarray::Array1;

/// Balanced accuracy: the mean of per-class recall over the classes present
/// in `y_true`. Robust to class imbalance.
pub fn balanced_accuracy(y_true: &Array1<i32>, y_pred: &Array1<i32>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "balanced_accuracy: label vectors must have equal length"
    );

    let mut recalls = Vec::with_capacity(2);
    for class in [0, 1] {
        let support = y_true.iter().filter(|&&v| v == class).count();
        if support == 0 {
            continue;
        }
        let hits = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(&t, &p)| t == class && p == class)
            .count();
        recalls.push(hits as f64 / support as f64);
    }

    if recalls.is_empty() {
        return 0.0;
    }
    recalls.iter().sum::<f64>() / recalls.len() as f64
}

/// Positive-class recall. Returns 0.0 when `y_true` has no positives.
pub fn recall(y_true: &Array1<i32>, y_pred: &Array1<i32>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "recall: label vectors must have equal length"
    );

    let positives = y_true.iter().filter(|&&v| v == 1).count();
    if positives == 0 {
        return 0.0;
    }
    let hits = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(&t, &p)| t == 1 && p == 1)
        .count();
    hits as f64 / positives as f64
}
