//! Diffusivity models and initial conditions
//!
//! All diffusivity laws implement the
//! [`DiffusivityModel`](crate::physics::DiffusivityModel) trait. The stepper
//! evaluates `D(θ)` on the current Picard iterate; models are responsible
//! for the constitutive law, the stepper for the linearization and solves.
//!
//! # Available Models
//!
//! ## [`BrooksCorey`] — power-law soil model
//!
//! `D(θ) = D_sat · Se^n`. Strongly nonlinear: `D` spans dozens of orders of
//! magnitude between dry and saturated soil, which produces the sharp
//! wetting fronts typical of Richards-type flow.
//!
//! ## [`ConstantDiffusivity`] — linear special case
//!
//! Reduces the problem to the heat equation; [`analytical`] holds the
//! matching closed-form references.
//!
//! # Initial Conditions
//!
//! [`InitialProfile`] (1D) and [`InitialSurface`] with [`DropShape`] (2D)
//! describe θ at `t = 0`.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod analytical;
pub mod brooks_corey;
pub mod constant;
pub mod initial;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use brooks_corey::BrooksCorey;
pub use constant::ConstantDiffusivity;
pub use initial::{DropShape, InitialProfile, InitialSurface};
