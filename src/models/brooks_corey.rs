//! Brooks–Corey power-law diffusivity
//!
//! # Constitutive Law
//!
//! ```text
//! Se(θ) = min( max(θ − θr, ε) / (θs − θr), 1 )      ε = 1e-12
//! D(θ)  = D_sat · Se^n
//! dD/dθ = D_sat · n · Se^(n−1) / (θs − θr)          (0 when θ − θr ≤ ε)
//! ```
//!
//! The floor `ε` keeps `D` strictly positive below the residual saturation,
//! so dry regions still produce a non-singular (if very weakly coupled)
//! tridiagonal system.
//!
//! # Default Parameters
//!
//! | Symbol | Value       | Meaning                        |
//! |--------|-------------|--------------------------------|
//! | θr     | 2.378e-5    | residual saturation            |
//! | θs     | 1.0         | saturated value                |
//! | D_sat  | 3.983e-6    | saturated diffusivity \[m²/s\] |
//! | n      | 4.795       | pore-size exponent             |

use crate::physics::DiffusivityModel;

/// Residual saturation of the reference soil
pub const THETA_R: f64 = 2.378e-5;

/// Saturated value
pub const THETA_S: f64 = 1.0;

/// Saturated diffusivity \[m²/s\]
pub const D_SAT: f64 = 3.983e-6;

/// Brooks–Corey exponent
pub const N_BC: f64 = 4.795;

/// Floor on `θ − θr` and threshold below which the derivative is zero
const SATURATION_FLOOR: f64 = 1e-12;

/// Brooks–Corey diffusivity model
#[derive(Clone, Debug, PartialEq)]
pub struct BrooksCorey {
    theta_r: f64,
    theta_s: f64,
    d_sat: f64,
    exponent: f64,
}

impl BrooksCorey {
    /// Create a model from explicit parameters
    ///
    /// # Panics
    ///
    /// Panics when `theta_s <= theta_r`, when `d_sat` is negative or not
    /// finite, or when `exponent` is not positive. Use
    /// [`try_new`](Self::try_new) for a fallible constructor.
    ///
    /// # Example
    ///
    /// ```rust
    /// use richards_rs::models::BrooksCorey;
    /// use richards_rs::physics::DiffusivityModel;
    ///
    /// let model = BrooksCorey::new(0.0, 1.0, 1e-6, 3.0);
    /// assert!((model.diffusivity(0.5) - 1.25e-7).abs() < 1e-20);
    /// ```
    pub fn new(theta_r: f64, theta_s: f64, d_sat: f64, exponent: f64) -> Self {
        assert!(
            theta_s > theta_r,
            "Saturated value must exceed residual saturation, got θs={} θr={}",
            theta_s,
            theta_r
        );
        assert!(
            d_sat.is_finite() && d_sat >= 0.0,
            "Saturated diffusivity must be non-negative, got {}",
            d_sat
        );
        assert!(
            exponent.is_finite() && exponent > 0.0,
            "Brooks-Corey exponent must be positive, got {}",
            exponent
        );

        Self { theta_r, theta_s, d_sat, exponent }
    }

    /// Fallible counterpart of [`new`](Self::new)
    pub fn try_new(theta_r: f64, theta_s: f64, d_sat: f64, exponent: f64) -> Result<Self, String> {
        if !(theta_r.is_finite() && theta_s.is_finite()) || theta_s <= theta_r {
            return Err(format!(
                "Saturated value must exceed residual saturation, got θs={} θr={}",
                theta_s, theta_r
            ));
        }
        if !(d_sat.is_finite() && d_sat >= 0.0) {
            return Err(format!("Saturated diffusivity must be non-negative, got {}", d_sat));
        }
        if !(exponent.is_finite() && exponent > 0.0) {
            return Err(format!("Brooks-Corey exponent must be positive, got {}", exponent));
        }

        Ok(Self { theta_r, theta_s, d_sat, exponent })
    }

    pub fn residual_saturation(&self) -> f64 {
        self.theta_r
    }

    pub fn saturated_value(&self) -> f64 {
        self.theta_s
    }

    pub fn saturated_diffusivity(&self) -> f64 {
        self.d_sat
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// `Se(θ)`, clamped to `[1e-12 / Δθ, 1]`
    #[inline]
    pub fn effective_saturation(&self, theta: f64) -> f64 {
        let span = self.theta_s - self.theta_r;
        ((theta - self.theta_r).max(SATURATION_FLOOR) / span).min(1.0)
    }
}

impl Default for BrooksCorey {
    /// Reference soil parameters
    fn default() -> Self {
        Self::new(THETA_R, THETA_S, D_SAT, N_BC)
    }
}

impl DiffusivityModel for BrooksCorey {

    fn diffusivity(&self, theta: f64) -> f64 {
        self.d_sat * self.effective_saturation(theta).powf(self.exponent)
    }

    fn derivative(&self, theta: f64) -> f64 {
        if theta - self.theta_r <= SATURATION_FLOOR {
            return 0.0;
        }
        let se = self.effective_saturation(theta);
        self.d_sat * self.exponent * se.powf(self.exponent - 1.0) / (self.theta_s - self.theta_r)
    }

    fn name(&self) -> &str {
        "Brooks-Corey"
    }

    fn description(&self) -> Option<&str> {
        Some("D(θ) = D_sat · Se^n with Se = (θ − θr) / (θs − θr)")
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_parameters() {
        let model = BrooksCorey::default();
        assert_eq!(model.residual_saturation(), THETA_R);
        assert_eq!(model.saturated_value(), THETA_S);
        assert_eq!(model.saturated_diffusivity(), D_SAT);
        assert_eq!(model.exponent(), N_BC);
    }

    #[test]
    fn test_saturated_value_gives_saturated_diffusivity() {
        let model = BrooksCorey::default();
        assert_relative_eq!(model.diffusivity(1.0), D_SAT, max_relative = 1e-12);
        // Se is clamped at 1 above θs
        assert_relative_eq!(model.diffusivity(1.5), D_SAT, max_relative = 1e-12);
    }

    #[test]
    fn test_dry_side_is_tiny_but_non_negative() {
        let model = BrooksCorey::default();
        let d = model.diffusivity(0.0);
        assert!(d >= 0.0);
        assert!(d < 1e-50);
    }

    #[test]
    fn test_monotone_in_theta() {
        let model = BrooksCorey::default();
        let mut previous = model.diffusivity(0.0);
        for k in 1..=100 {
            let d = model.diffusivity(k as f64 / 100.0);
            assert!(d >= previous);
            previous = d;
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let model = BrooksCorey::default();
        let h = 1e-6;
        for theta in [0.2, 0.5, 0.8] {
            let numeric = (model.diffusivity(theta + h) - model.diffusivity(theta - h)) / (2.0 * h);
            assert_relative_eq!(model.derivative(theta), numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_derivative_vanishes_below_residual() {
        let model = BrooksCorey::default();
        assert_eq!(model.derivative(0.0), 0.0);
        assert_eq!(model.derivative(-1.0), 0.0);
        assert_eq!(model.derivative(THETA_R), 0.0);
        assert!(model.derivative(THETA_R + 1e-3) > 0.0);

        // Same with a zero residual saturation
        let model = BrooksCorey::new(0.0, 1.0, 1e-2, 2.0);
        assert_eq!(model.derivative(0.0), 0.0);
        assert!(model.derivative(1e-6) > 0.0);
    }

    #[test]
    fn test_try_new_rejects_bad_parameters() {
        assert!(BrooksCorey::try_new(0.5, 0.5, 1.0, 2.0).is_err());
        assert!(BrooksCorey::try_new(0.0, 1.0, -1.0, 2.0).is_err());
        assert!(BrooksCorey::try_new(0.0, 1.0, 1.0, 0.0).is_err());
        assert!(BrooksCorey::try_new(0.0, 1.0, 1.0, 2.0).is_ok());
    }

    #[test]
    #[should_panic(expected = "Saturated value must exceed residual saturation")]
    fn test_new_panics_on_inverted_range() {
        BrooksCorey::new(1.0, 0.5, 1e-6, 2.0);
    }
}
