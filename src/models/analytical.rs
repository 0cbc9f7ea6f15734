//! Closed-form references for the linear case
//!
//! With a constant diffusivity `D₀` and zero Dirichlet edges, the lowest
//! sine mode decays exponentially:
//!
//! ```text
//! 1D:  θ(x, t)    = A · sin(πx/L) · exp(−D₀ (π/L)² t)
//! 2D:  θ(x, y, t) = A · sin(πx/Lx) · sin(πy/Ly) · exp(−D₀ ((π/Lx)² + (π/Ly)²) t)
//! ```
//!
//! These are used to check the steppers against the implicit Euler
//! discretization error.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use crate::solver::{Grid1D, Grid2D};

/// First sine mode of the 1D heat equation at `(x, t)`.
pub fn sine_decay_1d(x: f64, t: f64, length: f64, diffusivity: f64, amplitude: f64) -> f64 {
    let k = PI / length;
    amplitude * (k * x).sin() * (-diffusivity * k * k * t).exp()
}

/// First sine mode of the 2D heat equation at `(x, y, t)`.
pub fn sine_decay_2d(
    x: f64,
    y: f64,
    t: f64,
    lengths: (f64, f64),
    diffusivity: f64,
    amplitude: f64,
) -> f64 {
    let kx = PI / lengths.0;
    let ky = PI / lengths.1;
    amplitude * (kx * x).sin() * (ky * y).sin() * (-diffusivity * (kx * kx + ky * ky) * t).exp()
}

/// [`sine_decay_1d`] on every node of `grid`
pub fn sine_decay_profile(grid: &Grid1D, t: f64, diffusivity: f64, amplitude: f64) -> DVector<f64> {
    let length = grid.length();
    DVector::from_iterator(
        grid.nodes(),
        grid.positions()
            .into_iter()
            .map(|x| sine_decay_1d(x, t, length, diffusivity, amplitude)),
    )
}

/// [`sine_decay_2d`] on every node of `grid`
pub fn sine_decay_surface(grid: &Grid2D, t: f64, diffusivity: f64, amplitude: f64) -> DMatrix<f64> {
    let (rows, cols) = grid.shape();
    let lengths = (grid.lx(), grid.ly());
    DMatrix::from_fn(rows, cols, |i, j| {
        sine_decay_2d(grid.x(i), grid.y(j), t, lengths, diffusivity, amplitude)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_time_is_sine() {
        assert_relative_eq!(sine_decay_1d(0.5, 0.0, 1.0, 0.1, 1.0), 1.0);
        assert_relative_eq!(sine_decay_2d(0.5, 0.5, 0.0, (1.0, 1.0), 0.1, 2.0), 2.0);
    }

    #[test]
    fn test_decay_rate() {
        let d0 = 0.05;
        let t = 0.3;
        let expected = (-d0 * PI * PI * t).exp();
        assert_relative_eq!(sine_decay_1d(0.5, t, 1.0, d0, 1.0), expected, max_relative = 1e-14);

        let expected_2d = (-2.0 * d0 * PI * PI * t).exp();
        assert_relative_eq!(
            sine_decay_2d(0.5, 0.5, t, (1.0, 1.0), d0, 1.0),
            expected_2d,
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_samples_vanish_on_edges() {
        let grid = Grid2D::new(1.0, 2.0, 8, 12).unwrap();
        let surface = sine_decay_surface(&grid, 0.1, 0.01, 1.0);
        assert!(surface[(0, 5)].abs() < 1e-15);
        assert!(surface[(9, 5)].abs() < 1e-15);
        assert!(surface[(4, 13)].abs() < 1e-15);

        let line = Grid1D::new(2.0, 19).unwrap();
        let profile = sine_decay_profile(&line, 0.0, 1.0, 1.0);
        assert!(profile[20].abs() < 1e-15);
        assert_relative_eq!(profile[10], 1.0);
    }
}
