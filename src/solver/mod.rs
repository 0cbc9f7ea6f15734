//! Numerical core
//!
//! Everything needed to advance a moisture field in time: grids, Dirichlet
//! boundaries, the tridiagonal kernel, face averaging, the Picard steppers
//! and the time driver.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Diffusivity model `D(θ)`
//!    - Domain (`Grid1D` or `Grid2D`) and Dirichlet boundaries
//!    - Initial field
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Final time and number of steps
//!    - Picard tolerance and pass budget
//!    - Convergence policy, snapshot interval
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - `ImplicitPicardSolver` for 1D (planar or cylindrical)
//!    - `AdiPicardSolver` for 2D
//!
//! # Module Organization
//!
//! - **`tridiagonal`**: Thomas algorithm, `TridiagonalSystem`
//! - **`averaging`**: node-to-face arithmetic means
//! - **`grid`**: `Grid1D`, `Grid2D`, `Domain`, `CoordinateSystem`
//! - **`boundary`**: `DirichletBoundaries`
//! - **`traits`**: `Stepper`, `Solver`, settings, reports, results
//! - **`driver`**: `TimeIntegrator`, the fixed-step loop
//! - **`scenario`**: `Scenario`
//! - **`methods`**: the Picard steppers and their solvers
//!
//! # Quick Start Example
//!
//! ```rust
//! use richards_rs::models::{BrooksCorey, InitialProfile};
//! use richards_rs::solver::{
//!     DirichletBoundaries, Grid1D, ImplicitPicardSolver, Scenario, Solver, SolverConfiguration,
//! };
//!
//! // 1. Create scenario (WHAT to solve)
//! let scenario = Scenario::line(
//!     Box::new(BrooksCorey::default()),
//!     Grid1D::new(0.5, 100).unwrap(),
//!     DirichletBoundaries::zero(),
//!     &InitialProfile::gaussian(0.25, 0.05, 0.8),
//! );
//!
//! // 2. Create configuration (HOW to solve)
//! let config = SolverConfiguration::time_evolution(0.1, 200);
//!
//! // 3. Solve
//! let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();
//!
//! // 4. Access results
//! assert_eq!(result.final_state.len(), 102);
//! assert!(result.final_state.max() <= 0.8 + 1e-12);
//! ```
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │ DiffusivityModel│  (D(θ))
//! └────────┬────────┘
//!          │
//!          ├──────────────┐
//!          │              │
//! ┌────────▼────────┐ ┌──▼──────────────┐
//! │ Domain +        │ │ Scenario        │ ← WHAT to solve
//! │ Boundaries      │ │ (model + field) │
//! └─────────────────┘ └────────┬────────┘
//!                              │
//!                     ┌────────▼─────────────┐
//!                     │ Solver Configuration │ ← HOW to solve
//!                     │ (T, N, Picard, ...)  │
//!                     └────────┬─────────────┘
//!                              │
//!                     ┌────────▼────────┐
//!                     │ Stepper +       │ ← The method
//!                     │ TimeIntegrator  │
//!                     └────────┬────────┘
//!                              │
//!                     ┌────────▼────────────┐
//!                     │ Simulation Result   │ ← The solution
//!                     │ (trajectory + cost) │
//!                     └─────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return `Result<T, SolverError>`:
//!
//! ```rust
//! use richards_rs::solver::{Grid1D, SolverError};
//!
//! match Grid1D::new(-1.0, 10) {
//!     Ok(_) => unreachable!(),
//!     Err(SolverError::InvalidGeometry(message)) => assert!(message.contains("length")),
//!     Err(other) => panic!("unexpected {}", other),
//! }
//! ```
//!
//! Common errors:
//! - Invalid configuration (non-positive time, zero steps, bad Picard settings)
//! - Invalid geometry (degenerate grid, initial field of the wrong shape)
//! - Singular line system (zero pivot)
//! - Numerical instability (NaN or infinite values)
//! - Non-convergence, under the strict policy

// =================================================================================================
// Module Declarations
// =================================================================================================
mod averaging;
mod boundary;
mod driver;
mod error;
mod grid;
mod scenario;
mod traits;
mod tridiagonal;
pub mod methods;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work to Rayon is an execution concern shared by
// nodal model evaluation (physics/data.rs) and the ADI line sweeps, so the
// threshold lives here.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (benchmarks and tests) without a mutex on every sweep. Relaxed
// ordering is sufficient: the value is a performance hint, not a
// synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of nodes above which nodal evaluation and line sweeps
/// switch to parallel iteration.
///
/// Below roughly a thousand nodes the overhead of Rayon's dispatch outweighs
/// the per-line Thomas solve.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// Work items larger than this value go to Rayon, but only when the crate
/// is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use richards_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use richards_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

#[cfg(test)]
static THRESHOLD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds. Guards also serialise the tests that touch
/// the threshold, so one test cannot observe another's value.
///
/// ```rust,ignore
/// let _guard = crate::solver::ThresholdGuard::save(50);
/// // threshold is now 50 …
/// // … and is automatically restored when _guard is dropped.
/// ```
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        let lock = THRESHOLD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous, _lock: lock }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use averaging::{midpoint_average, x_face_average, y_face_average};
pub use boundary::DirichletBoundaries;
pub use driver::{Integration, TimeIntegrator};
pub use error::SolverError;
pub use grid::{CoordinateSystem, Domain, Grid1D, Grid2D};
pub use scenario::Scenario;
pub use traits::{
    ConvergencePolicy,
    ConvergenceStatus,
    CostReport,
    NodalField,
    PicardSettings,
    ResidualNorm,
    SimulationResult,
    Solver,
    SolverConfiguration,
    StepOutcome,
    StepReport,
    Stepper,
};
pub use tridiagonal::{solve_tridiagonal, TridiagonalSystem};

pub use methods::{AdiPicardSolver, AdiPicardStepper, ImplicitPicardSolver, PicardStepper1D};

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Validate a field for numerical issues
///
/// NaN arises from `0/0` or `Inf − Inf`; infinity from overflow or a
/// division by a vanishing pivot that slipped past the solver.
///
/// # Example
///
/// ```rust,ignore
/// validate_field(field.nodes(), 42)?;  // Validates the field at step 42
/// ```
pub(crate) fn validate_field(nodes: &[f64], step: usize) -> Result<(), SolverError> {
    if let Some(position) = nodes.iter().position(|x| !x.is_finite()) {
        log::error!(
            "non-finite value {} at node {} after step {}",
            nodes[position],
            position,
            step
        );
        return Err(SolverError::NumericalInstability { step });
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_value() {
        assert_eq!(DEFAULT_PARALLEL_THRESHOLD, 999);
    }

    #[test]
    fn test_get_and_set_threshold() {
        let _guard = ThresholdGuard::save(500);
        assert_eq!(parallel_threshold(), 500);
    }

    #[test]
    #[should_panic(expected = "parallel threshold must be at least 1")]
    fn test_zero_threshold_panics() {
        set_parallel_threshold(0);
    }

    #[test]
    fn test_threshold_guard_restores_previous_value() {
        {
            let _guard = ThresholdGuard::save(42);
            assert_eq!(parallel_threshold(), 42);
        }
        assert_ne!(parallel_threshold(), 42);
    }

    #[test]
    fn test_validate_field() {
        assert!(validate_field(&[0.0, 0.5, 1.0], 3).is_ok());
        assert_eq!(
            validate_field(&[0.0, f64::NAN], 7),
            Err(SolverError::NumericalInstability { step: 7 })
        );
        assert_eq!(
            validate_field(&[f64::INFINITY], 1),
            Err(SolverError::NumericalInstability { step: 1 })
        );
    }
}
