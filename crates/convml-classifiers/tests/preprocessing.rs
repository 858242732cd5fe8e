//! Integration tests for the scaling utilities.

use convml_classifiers::preprocessing::{MaxAbsScaler, Scaling, StandardScaler};
use ndarray::Array2;

#[test]
fn standard_scaler_centers_and_scales() {
    let x = Array2::from_shape_vec(
        (4, 2),
        vec![1.0, 100.0, 2.0, 200.0, 3.0, 300.0, 4.0, 400.0],
    )
    .unwrap();

    let t = StandardScaler::fit_transform(&x);
    for c in 0..2 {
        let mean: f32 = (0..4).map(|r| t[(r, c)]).sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-4, "col {} mean after transform = {}", c, mean);
        let var: f32 = (0..4).map(|r| (t[(r, c)] - mean).powi(2)).sum::<f32>() / 4.0;
        assert!((var - 1.0).abs() < 1e-3, "col {} var after transform = {}", c, var);
    }
}

#[test]
fn max_abs_scaler_maps_peak_to_one() {
    let x = Array2::from_shape_vec(
        (4, 2),
        vec![1.0, -8.0, 2.0, 4.0, -5.0, 2.0, 3.0, 1.0],
    )
    .unwrap();

    let t = MaxAbsScaler::fit_transform(&x);
    for c in 0..2 {
        let peak = (0..4).map(|r| t[(r, c)].abs()).fold(0.0f32, f32::max);
        assert!(
            (peak - 1.0).abs() < 1e-5,
            "col {} max abs after transform = {}",
            c,
            peak
        );
    }
}

#[test]
fn constant_column_stays_finite() {
    let x = Array2::from_shape_vec((3, 1), vec![5.0, 5.0, 5.0]).unwrap();

    let standard = StandardScaler::fit_transform(&x);
    let maxabs = MaxAbsScaler::fit_transform(&x);
    for r in 0..3 {
        assert!(standard[(r, 0)].is_finite());
        assert!(maxabs[(r, 0)].is_finite());
    }
}

#[test]
fn scaler_parameters_are_fit_per_subset() {
    // Two subsets with very different column statistics.
    let subset_a = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
    let subset_b = Array2::from_shape_vec((3, 1), vec![100.0, 200.0, 300.0]).unwrap();

    let scaler_a = StandardScaler::fit(&subset_a);
    let scaler_b = StandardScaler::fit(&subset_b);

    assert!((scaler_a.mean[0] - 2.0).abs() < 1e-5);
    assert!((scaler_b.mean[0] - 200.0).abs() < 1e-4);
    assert!(scaler_a.mean[0] != scaler_b.mean[0]);
    assert!(scaler_a.std[0] != scaler_b.std[0]);
}

#[test]
fn apply_never_carries_state_between_calls() {
    let subset_a = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
    let subset_b = Array2::from_shape_vec((3, 1), vec![100.0, 200.0, 300.0]).unwrap();

    // Transforming A first must not change how B is transformed.
    let _ = Scaling::Standard.apply(&subset_a);
    let after_a = Scaling::Standard.apply(&subset_b);
    let fresh = StandardScaler::fit(&subset_b).transform(&subset_b);

    for r in 0..3 {
        assert!((after_a[(r, 0)] - fresh[(r, 0)]).abs() < 1e-6);
    }
}

#[test]
fn scaling_none_returns_input_unchanged() {
    let x = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(Scaling::None.apply(&x), x);
}
