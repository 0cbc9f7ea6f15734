//! Constant diffusivity
//!
//! The linear special case `D(θ) = D₀`. Face averages are exact, so the
//! Picard loop reduces to a single implicit Euler solve and the second pass
//! only confirms it with a zero residual.

use crate::physics::DiffusivityModel;

/// `D(θ) = D₀` for every θ
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantDiffusivity {
    value: f64,
}

impl ConstantDiffusivity {
    /// # Panics
    ///
    /// Panics when `value` is not finite.
    pub fn new(value: f64) -> Self {
        assert!(value.is_finite(), "Diffusivity must be finite, got {}", value);
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl DiffusivityModel for ConstantDiffusivity {
    fn diffusivity(&self, _theta: f64) -> f64 {
        self.value
    }

    fn derivative(&self, _theta: f64) -> f64 {
        0.0
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_everywhere() {
        let model = ConstantDiffusivity::new(0.25);
        assert_eq!(model.diffusivity(0.0), 0.25);
        assert_eq!(model.diffusivity(0.9), 0.25);
        assert_eq!(model.derivative(0.5), 0.0);
        assert_eq!(model.value(), 0.25);
    }

    #[test]
    #[should_panic(expected = "Diffusivity must be finite")]
    fn test_nan_panics() {
        ConstantDiffusivity::new(f64::NAN);
    }
}
