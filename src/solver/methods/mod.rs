//! Picard-linearized implicit methods
//!
//! This module contains the concrete steppers and the [`Solver`](crate::solver::Solver)
//! implementations that drive them.
//!
//! # Architecture
//!
//! ```text
//! Solver ──► TimeIntegrator ──► Stepper::step ──► run_picard ──► pass
//!                                                                 │
//!                                         evaluate D ─► faces ─► tridiagonal solve(s)
//! ```
//!
//! # Available Methods
//!
//! - **[`ImplicitPicardSolver`]** / [`PicardStepper1D`]: backward Euler in
//!   time, one tridiagonal system per pass. Planar or cylindrical metric.
//! - **[`AdiPicardSolver`]** / [`AdiPicardStepper`]: alternating-direction
//!   splitting, one tridiagonal system per grid line and sweep. Independent
//!   lines of a sweep run on rayon when the `parallel` feature is on and the
//!   sweep is larger than [`parallel_threshold()`](crate::solver::parallel_threshold).
//!
//! # The Picard Loop
//!
//! Each pass re-evaluates `D` on the current iterate and solves the now
//! linear system. The loop stops when the change between two iterates drops
//! below tolerance, when the pass budget runs out, or when a linear solve
//! fails; in that last case the previous iterate is kept and the failure is
//! reported through [`ConvergenceStatus::SolveFailed`].

pub mod adi;
pub mod picard;

pub use adi::{AdiPicardSolver, AdiPicardStepper};
pub use picard::{ImplicitPicardSolver, PicardStepper1D};

use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::solver::{
    parallel_threshold, ConvergenceStatus, NodalField, PicardSettings, SolverError, StepOutcome,
};

/// Fixed-point loop shared by all steppers.
///
/// `pass` maps the current iterate to the next one; `old` is the starting
/// guess.
pub(crate) fn run_picard<F, P>(settings: &PicardSettings, old: &F, mut pass: P) -> StepOutcome<F>
where
    F: NodalField,
    P: FnMut(&F) -> Result<F, SolverError>,
{
    let mut iterate = old.clone();
    let mut residuals = Vec::with_capacity(settings.max_iterations);

    for k in 1..=settings.max_iterations {
        let next = match pass(&iterate) {
            Ok(next) => next,
            Err(error) => {
                let residual = residuals.last().copied().unwrap_or(f64::NAN);
                return StepOutcome {
                    field: iterate,
                    status: ConvergenceStatus::SolveFailed { iterations: k - 1, residual, error },
                    residuals,
                };
            }
        };

        let residual = settings.norm.measure(next.nodes(), iterate.nodes());
        log::debug!("Picard pass {}: residual {:.3e}", k, residual);

        residuals.push(residual);
        iterate = next;

        if residual < settings.tolerance {
            return StepOutcome {
                field: iterate,
                status: ConvergenceStatus::Converged { iterations: k, residual },
                residuals,
            };
        }
    }

    let residual = residuals.last().copied().unwrap_or(f64::NAN);
    StepOutcome {
        field: iterate,
        status: ConvergenceStatus::Exhausted { iterations: settings.max_iterations, residual },
        residuals,
    }
}

/// Solve `count` independent lines, in parallel when `work` exceeds the
/// threshold. Results come back in line order.
pub(crate) fn solve_lines<L>(count: usize, work: usize, line: L) -> Result<Vec<DVector<f64>>, SolverError>
where
    L: Fn(usize) -> Result<DVector<f64>, SolverError> + Sync + Send,
{
    if work > parallel_threshold() {
        #[cfg(feature = "parallel")]
        return (0..count).into_par_iter().map(&line).collect();
    }

    (0..count).map(line).collect()
}
