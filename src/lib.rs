//! richards-rs: Nonlinear Moisture Diffusion Solvers
//!
//! Implicit finite-difference solvers for the Richards-type diffusion
//! equation `∂θ/∂t = ∇·(D(θ)∇θ)` with a strongly nonlinear diffusivity.
//!
//! # Architecture
//!
//! richards-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Diffusivity models define `D(θ)` (what to solve)
//!    - Steppers linearize and solve (how to solve)
//!
//! 2. **Linear Kernels Everywhere**
//!    - Backward Euler in time, Picard iteration on `D`
//!    - Every linear solve is a tridiagonal system (Thomas algorithm)
//!    - In 2D, alternating-direction sweeps keep the systems tridiagonal
//!
//! # Quick Start
//!
//! ```rust
//! use richards_rs::models::{BrooksCorey, DropShape, InitialSurface};
//! use richards_rs::solver::{
//!     AdiPicardSolver, DirichletBoundaries, Grid2D, Scenario, Solver, SolverConfiguration,
//! };
//!
//! # fn main() -> Result<(), richards_rs::solver::SolverError> {
//! // 1. Domain, model and initial drop
//! let grid = Grid2D::square(1.0, 30)?;
//! let scenario = Scenario::plane(
//!     Box::new(BrooksCorey::default()),
//!     grid,
//!     DirichletBoundaries::uniform(1e-4),
//!     &InitialSurface::drop(DropShape::centered_circle(&grid), 0.9, 1e-4),
//! );
//!
//! // 2. Configure the run
//! let config = SolverConfiguration::time_evolution(0.05, 20);
//!
//! // 3. Run simulation
//! let result = AdiPicardSolver::new().solve(&scenario, &config)?;
//!
//! // 4. Access results
//! println!("{}", result.cost);
//! assert!(result.final_state.max() <= 0.9 + 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: the diffusivity trait and field containers
//! - [`models`]: Brooks-Corey and constant laws, initial conditions, analytical references
//! - [`solver`]: grids, tridiagonal kernel, Picard steppers, time driver
//! - [`analysis`]: mass, error norms, radial profiles, symmetry checks
//! - [`output`]: CSV export

// Core modules
pub mod physics;

pub mod models;
pub mod solver;

pub mod analysis;
pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use richards_rs::prelude::*;
    //! ```
    pub use crate::models::{BrooksCorey,
                            ConstantDiffusivity,
                            DropShape,
                            InitialProfile,
                            InitialSurface};
    pub use crate::physics::{DiffusivityModel,
                             FieldData};
    pub use crate::solver::{AdiPicardSolver,
                            DirichletBoundaries,
                            Grid1D,
                            Grid2D,
                            ImplicitPicardSolver,
                            PicardSettings,
                            Scenario,
                            SimulationResult,
                            Solver,
                            SolverConfiguration,
                            SolverError};
}
