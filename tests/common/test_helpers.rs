//! Helper functions for integration tests

use richards_rs::models::{BrooksCorey, InitialProfile};
use richards_rs::solver::{DirichletBoundaries, Grid1D, Scenario};

/// Assert that two nodal fields agree element-wise within `tolerance`
pub fn assert_fields_close(field1: &[f64], field2: &[f64], tolerance: f64, message: &str) {
    assert_eq!(field1.len(), field2.len(), "{}: Dimension mismatch", message);

    for (i, (&v1, &v2)) in field1.iter().zip(field2.iter()).enumerate() {
        let diff = (v1 - v2).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// `true` when every value lies in `[low − slack, high + slack]`
pub fn within_bounds(values: &[f64], low: f64, high: f64, slack: f64) -> bool {
    values.iter().all(|&v| v >= low - slack && v <= high + slack)
}

/// Gaussian pulse centred at `L/2` on `[0, L]`, Brooks-Corey, zero ends
pub fn gaussian_scenario(length: f64, interior: usize, width: f64, amplitude: f64) -> Scenario {
    Scenario::line(
        Box::new(BrooksCorey::default()),
        Grid1D::new(length, interior).expect("valid grid"),
        DirichletBoundaries::zero(),
        &InitialProfile::gaussian(0.5 * length, width, amplitude),
    )
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
