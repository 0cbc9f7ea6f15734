//! Diffusivity model trait
//!
//! This module defines the interface the steppers consume: a pointwise
//! constitutive law `D(θ)` together with its derivative.

use nalgebra::{DMatrix, DVector};

use crate::physics::data::{FieldData, apply_nodewise};

// =================================================================================================
// Diffusivity Model Trait
// =================================================================================================

/// Trait for moisture diffusivity models
///
/// # Responsibility
///
/// Maps a saturation value `θ` to a diffusion coefficient `D(θ) ≥ 0`.
/// Does NOT advance anything in time (that's the stepper's job).
///
/// The model provides the "physics" (constitutive law), the stepper
/// provides the "numerics" (Picard linearization, tridiagonal solves).
///
/// # Evaluation Contract
///
/// The steppers call [`evaluate_vector`](Self::evaluate_vector) /
/// [`evaluate_matrix`](Self::evaluate_matrix) once per Picard pass on the
/// current iterate. Results are never cached across passes, since the
/// iterate changes. Implementations must be pure.
///
/// # Example
///
/// ```rust
/// use richards_rs::physics::DiffusivityModel;
///
/// struct Linear { slope: f64 }
///
/// impl DiffusivityModel for Linear {
///     fn diffusivity(&self, theta: f64) -> f64 { self.slope * theta.max(0.0) }
///     fn derivative(&self, theta: f64) -> f64 { if theta > 0.0 { self.slope } else { 0.0 } }
///     fn name(&self) -> &str { "Linear" }
/// }
///
/// let model = Linear { slope: 2.0 };
/// assert_eq!(model.diffusivity(0.25), 0.5);
/// ```
pub trait DiffusivityModel: Send + Sync {

    /// `D(θ)`, expected non-negative for physical inputs
    fn diffusivity(&self, theta: f64) -> f64;

    /// `dD/dθ (θ)`
    ///
    /// Not used by the Picard steppers.
    fn derivative(&self, theta: f64) -> f64;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }

    /// Same-shape evaluation of `D` over any field
    fn evaluate(&self, field: &FieldData) -> FieldData {
        field.map(|theta| self.diffusivity(theta))
    }

    /// Nodal `D` along a 1D profile
    fn evaluate_vector(&self, field: &DVector<f64>) -> DVector<f64> {
        let mut out = field.clone();
        apply_nodewise(out.as_mut_slice(), |theta| self.diffusivity(theta));
        out
    }

    /// Nodal `D` over a 2D field
    fn evaluate_matrix(&self, field: &DMatrix<f64>) -> DMatrix<f64> {
        let mut out = field.clone();
        apply_nodewise(out.as_mut_slice(), |theta| self.diffusivity(theta));
        out
    }
}

// =================================================================================================
// Tests
// =================================================================================================
