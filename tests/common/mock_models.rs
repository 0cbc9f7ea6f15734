//! Mock diffusivity laws for testing
//!
//! Simple laws whose behaviour is easy to predict, or deliberately broken
//! ones that exercise the failure paths.

use richards_rs::physics::DiffusivityModel;

// =================================================================================================
// Linear Diffusivity: D(θ) = d0 + d1·θ
// =================================================================================================

/// Mildly nonlinear law, well conditioned for every θ ≥ 0
pub struct LinearDiffusivity {
    pub d0: f64,
    pub d1: f64,
}

impl LinearDiffusivity {
    pub fn new(d0: f64, d1: f64) -> Self {
        Self { d0, d1 }
    }
}

impl DiffusivityModel for LinearDiffusivity {
    fn diffusivity(&self, theta: f64) -> f64 {
        self.d0 + self.d1 * theta
    }

    fn derivative(&self, _theta: f64) -> f64 {
        self.d1
    }

    fn name(&self) -> &str {
        "Linear"
    }
}

// =================================================================================================
// Negative Diffusivity
// =================================================================================================

/// Anti-diffusive law producing singular line systems on coarse grids
pub struct NegativeDiffusivity {
    pub value: f64,
}

impl DiffusivityModel for NegativeDiffusivity {
    fn diffusivity(&self, _theta: f64) -> f64 {
        -self.value
    }

    fn derivative(&self, _theta: f64) -> f64 {
        0.0
    }

    fn name(&self) -> &str {
        "Negative"
    }
}
