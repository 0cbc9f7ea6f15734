//! Solver error taxonomy
//!
//! Every fallible operation of the numerical core returns
//! `Result<_, SolverError>`. Construction-time problems (geometry,
//! configuration) fail fast; step-time problems are only raised when the
//! caller asked for the strict convergence policy.

use thiserror::Error;

/// Errors raised by grids, linear solves, steppers and the time driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Forward elimination met a zero (or non-finite) pivot.
    #[error("singular tridiagonal system: zero pivot at row {row}")]
    SingularSystem { row: usize },

    /// Two arrays that must agree in length do not.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Degenerate grid or field layout.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Non-physical time, tolerance or pass budget.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Picard pass budget exhausted (strict policy only).
    #[error(
        "Picard iteration did not converge at step {step}: \
         residual {residual:.3e} after {iterations} passes"
    )]
    NonConvergence {
        step: usize,
        iterations: usize,
        residual: f64,
    },

    /// A Picard pass was abandoned on a failed linear solve (strict policy only).
    #[error("linear solve failed at step {step}")]
    SolveFailed {
        step: usize,
        #[source]
        source: Box<SolverError>,
    },

    /// NaN or infinity showed up in the field.
    #[error(
        "non-finite value in field at step {step}; \
         try a smaller time step (increase time_steps)"
    )]
    NumericalInstability { step: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_messages() {
        let err = SolverError::SingularSystem { row: 3 };
        assert_eq!(err.to_string(), "singular tridiagonal system: zero pivot at row 3");

        let err = SolverError::InvalidGeometry("length must be positive".into());
        assert!(err.to_string().contains("length must be positive"));
    }

    #[test]
    fn test_solve_failed_exposes_source() {
        let err = SolverError::SolveFailed {
            step: 7,
            source: Box::new(SolverError::SingularSystem { row: 0 }),
        };

        let source = err.source().expect("source must be set");
        assert_eq!(source.to_string(), "singular tridiagonal system: zero pivot at row 0");
    }
}
