//! Physical layer
//!
//! This module provides the constitutive side of the problem:
//! - `DiffusivityModel`: trait for `D(θ)` laws
//! - `FieldData`: shape-flexible nodal field container
//!
//! # Architecture
//!
//! Physical models are **separate from numerical steppers**:
//! - The model provides the **coefficient** `D(θ)` (physics)
//! - The stepper provides the **method** to advance `∂θ/∂t = ∇·(D(θ)∇θ)` (numerics)
//!
//! This separation allows:
//! - Same model in 1D planar, 1D radial and 2D runs
//! - Same stepper with different laws (Brooks–Corey, constant, user closures)
//!
//! # Example
//!
//! ```rust
//! use richards_rs::physics::{DiffusivityModel, FieldData};
//! use richards_rs::models::BrooksCorey;
//!
//! let model = BrooksCorey::default();
//! let field = FieldData::from_vec(vec![0.0, 0.5, 1.0]);
//! let d = model.evaluate(&field);
//!
//! assert_eq!(d.len(), 3);
//! assert!(d.max() <= model.saturated_diffusivity());
//! ```
//!
//! # Implementing a New Diffusivity Model
//!
//! ```rust
//! use richards_rs::physics::DiffusivityModel;
//!
//! struct Exponential {
//!     d0: f64,
//!     beta: f64,
//! }
//!
//! impl DiffusivityModel for Exponential {
//!     fn diffusivity(&self, theta: f64) -> f64 {
//!         self.d0 * (self.beta * theta).exp()
//!     }
//!
//!     fn derivative(&self, theta: f64) -> f64 {
//!         self.beta * self.diffusivity(theta)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Exponential"
//!     }
//! }
//! ```

// module declaration
pub mod traits;
pub mod data;

// re-export commonly used types for convenience
pub use data::{FieldData, apply_nodewise};
pub use traits::DiffusivityModel;
