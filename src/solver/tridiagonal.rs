//! Banded (tridiagonal) linear solver
//!
//! # Layout
//!
//! A size-`n` system is stored as three diagonals of length `n` and a
//! right-hand side of length `n`:
//!
//! ```text
//! | d0 u0                |   | x0 |   | r0 |
//! | l1 d1 u1             |   | x1 |   | r1 |
//! |    l2 d2 u2          | · | x2 | = | r2 |
//! |       ..  ..  ..     |   | .. |   | .. |
//! |           ln-1 dn-1  |   |xn-1|   |rn-1|
//! ```
//!
//! `lower[0]` and `upper[n-1]` lie outside the matrix and are ignored.
//!
//! # Algorithm
//!
//! Thomas elimination: one forward sweep, one back substitution, `O(n)`
//! work and no pivoting. Systems assembled by the Picard steppers have a
//! main diagonal of `1 + (non-negative terms)` and are diagonally dominant,
//! so the missing pivoting is not a concern for physical inputs. A zero
//! pivot is reported as [`SolverError::SingularSystem`].

use nalgebra::DVector;

use crate::solver::SolverError;

/// Owned tridiagonal system, assembled fresh for every Picard pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    /// Sub-diagonal, `lower[i]` multiplies `x[i-1]`
    pub lower: Vec<f64>,
    /// Main diagonal
    pub diagonal: Vec<f64>,
    /// Super-diagonal, `upper[i]` multiplies `x[i+1]`
    pub upper: Vec<f64>,
    /// Right-hand side
    pub rhs: Vec<f64>,
}

impl TridiagonalSystem {
    /// Zero-filled system of size `n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diagonal: vec![0.0; n],
            upper: vec![0.0; n],
            rhs: vec![0.0; n],
        }
    }

    /// Number of unknowns
    pub fn len(&self) -> usize {
        self.diagonal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagonal.is_empty()
    }

    /// Solve the system, consuming nothing.
    pub fn solve(&self) -> Result<DVector<f64>, SolverError> {
        solve_tridiagonal(&self.lower, &self.diagonal, &self.upper, &self.rhs)
    }

    /// Matrix-vector product `A·x`, ignoring the right-hand side.
    ///
    /// # Panics
    ///
    /// Panics when `x.len()` differs from the system size.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let n = self.len();
        assert_eq!(x.len(), n, "vector length must match system size");

        (0..n)
            .map(|i| {
                let mut value = self.diagonal[i] * x[i];
                if i > 0 {
                    value += self.lower[i] * x[i - 1];
                }
                if i + 1 < n {
                    value += self.upper[i] * x[i + 1];
                }
                value
            })
            .collect()
    }
}

/// Solve `A·x = rhs` for a tridiagonal `A` given by its three diagonals.
///
/// # Errors
///
/// - [`SolverError::DimensionMismatch`] when the four slices differ in length
/// - [`SolverError::SingularSystem`] when elimination meets a zero or
///   non-finite pivot; `row` is the offending equation
///
/// # Example
///
/// ```rust
/// use richards_rs::solver::solve_tridiagonal;
///
/// let lower = [0.0, -1.0, -1.0];
/// let diagonal = [2.0, 2.0, 2.0];
/// let upper = [-1.0, -1.0, 0.0];
/// let rhs = [1.0, 0.0, 1.0];
///
/// let x = solve_tridiagonal(&lower, &diagonal, &upper, &rhs).unwrap();
/// assert!((x[1] - 1.0).abs() < 1e-12);
/// ```
pub fn solve_tridiagonal(
    lower: &[f64],
    diagonal: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> Result<DVector<f64>, SolverError> {
    let n = diagonal.len();

    for len in [lower.len(), upper.len(), rhs.len()] {
        if len != n {
            return Err(SolverError::DimensionMismatch { expected: n, found: len });
        }
    }

    if n == 0 {
        return Ok(DVector::zeros(0));
    }

    // ====== Forward sweep ======

    // c' and d' of the classic formulation
    let mut upper_prime = vec![0.0; n];
    let mut rhs_prime = vec![0.0; n];

    let pivot = checked_pivot(diagonal[0], 0)?;
    upper_prime[0] = upper[0] / pivot;
    rhs_prime[0] = rhs[0] / pivot;

    for i in 1..n {
        let pivot = checked_pivot(diagonal[i] - lower[i] * upper_prime[i - 1], i)?;
        upper_prime[i] = if i + 1 < n { upper[i] / pivot } else { 0.0 };
        rhs_prime[i] = (rhs[i] - lower[i] * rhs_prime[i - 1]) / pivot;
    }

    // ====== Back substitution ======

    let mut x = DVector::zeros(n);
    x[n - 1] = rhs_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = rhs_prime[i] - upper_prime[i] * x[i + 1];
    }

    Ok(x)
}

fn checked_pivot(pivot: f64, row: usize) -> Result<f64, SolverError> {
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(SolverError::SingularSystem { row });
    }
    Ok(pivot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hand_computed_five_by_five() {
        // tridiag(-1, 4, -1) with x = [1, 2, 3, 4, 5]
        let lower = [0.0, -1.0, -1.0, -1.0, -1.0];
        let diagonal = [4.0; 5];
        let upper = [-1.0, -1.0, -1.0, -1.0, 0.0];
        let rhs = [2.0, 4.0, 6.0, 8.0, 16.0];

        let x = solve_tridiagonal(&lower, &diagonal, &upper, &rhs).unwrap();

        for (i, expected) in [1.0, 2.0, 3.0, 4.0, 5.0].iter().enumerate() {
            assert_relative_eq!(x[i], *expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_single_equation() {
        let x = solve_tridiagonal(&[9.0], &[4.0], &[9.0], &[2.0]).unwrap();
        assert_relative_eq!(x[0], 0.5);
    }

    #[test]
    fn test_empty_system() {
        let x = solve_tridiagonal(&[], &[], &[], &[]).unwrap();
        assert_eq!(x.len(), 0);
    }

    #[test]
    fn test_ignores_out_of_matrix_entries() {
        let base = solve_tridiagonal(
            &[0.0, -1.0, -1.0],
            &[3.0, 3.0, 3.0],
            &[-1.0, -1.0, 0.0],
            &[1.0, 2.0, 3.0],
        )
        .unwrap();

        let noisy = solve_tridiagonal(
            &[123.0, -1.0, -1.0],
            &[3.0, 3.0, 3.0],
            &[-1.0, -1.0, -77.0],
            &[1.0, 2.0, 3.0],
        )
        .unwrap();

        assert_eq!(base, noisy);
    }

    #[test]
    fn test_zero_first_pivot_is_singular() {
        let err = solve_tridiagonal(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0])
            .unwrap_err();
        assert_eq!(err, SolverError::SingularSystem { row: 0 });
    }

    #[test]
    fn test_zero_interior_pivot_is_singular() {
        // Second pivot: 1 - 1 * (1 / 1) = 0
        let err = solve_tridiagonal(&[0.0, 1.0, 0.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 0.0], &[1.0; 3])
            .unwrap_err();
        assert_eq!(err, SolverError::SingularSystem { row: 1 });
    }

    #[test]
    fn test_nan_pivot_is_singular() {
        let err = solve_tridiagonal(&[0.0], &[f64::NAN], &[0.0], &[1.0]).unwrap_err();
        assert_eq!(err, SolverError::SingularSystem { row: 0 });
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = solve_tridiagonal(&[0.0, 0.0], &[1.0, 1.0], &[0.0, 0.0], &[1.0]).unwrap_err();
        assert_eq!(err, SolverError::DimensionMismatch { expected: 2, found: 1 });
    }

    #[test]
    fn test_system_apply_recovers_rhs() {
        let mut system = TridiagonalSystem::zeros(4);
        system.lower.copy_from_slice(&[0.0, -0.5, -0.5, -0.5]);
        system.diagonal.copy_from_slice(&[2.0, 2.0, 2.0, 2.0]);
        system.upper.copy_from_slice(&[-0.5, -0.5, -0.5, 0.0]);
        system.rhs.copy_from_slice(&[1.0, -1.0, 0.5, 3.0]);

        let x = system.solve().unwrap();
        let back = system.apply(x.as_slice());

        for (lhs, rhs) in back.iter().zip(system.rhs.iter()) {
            assert_relative_eq!(*lhs, *rhs, epsilon = 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "vector length must match system size")]
    fn test_apply_wrong_length_panics() {
        TridiagonalSystem::zeros(3).apply(&[1.0]);
    }
}
