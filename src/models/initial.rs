//! Initial saturation fields
//!
//! Defines how θ is distributed over the grid at `t = 0`.
//!
//! # 1D vs 2D
//!
//! - **[`InitialProfile`]**: θ(x, 0) along a line (planar or radial coordinate)
//! - **[`InitialSurface`]**: θ(x, y, 0) over a plane, usually a wet drop
//!   ([`DropShape`]) on a dry background
//!
//! Generators are sampled on every node, boundaries included. The scenario
//! overwrites boundary nodes with the Dirichlet values afterwards.
//!
//! # Example
//!
//! ```rust
//! use richards_rs::models::InitialProfile;
//!
//! // 0.8 peak at x = 0.25, σ = 0.05
//! let pulse = InitialProfile::gaussian(0.25, 0.05, 0.8);
//!
//! assert!((pulse.evaluate(0.25) - 0.8).abs() < 1e-12);
//! assert!(pulse.evaluate(0.0) < 1e-5);
//! ```

use std::f64::consts::PI;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::solver::{Grid1D, Grid2D};

// =================================================================================================
// 1D Profiles
// =================================================================================================

/// Initial θ along a 1D grid
///
/// # Types
///
/// - **Uniform**: same value everywhere
/// - **GaussianPulse**: bell-shaped bump over a background
/// - **Plateau**: constant value on `[start, end]`, background elsewhere
/// - **Step**: wet for `x ≤ front`, background beyond (radial drop in
///   cylindrical coordinates)
/// - **SineMode**: `A · sin(kπx/L)`, the linear-decay reference
/// - **Custom**: user-defined θ(x)
pub enum InitialProfile {
    Uniform(f64),

    /// ```text
    /// θ(x) = background + amplitude · exp(−(x − center)² / (2σ²))
    /// ```
    GaussianPulse {
        center: f64,
        width: f64,
        amplitude: f64,
        background: f64,
    },

    Plateau {
        start: f64,
        end: f64,
        value: f64,
        background: f64,
    },

    Step {
        front: f64,
        inside: f64,
        outside: f64,
    },

    SineMode {
        amplitude: f64,
        mode: u32,
        length: f64,
    },

    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

// ==================== Manual Clone Implementation ====================

impl Clone for InitialProfile {
    fn clone(&self) -> Self {
        match self {
            Self::Uniform(value) => Self::Uniform(*value),
            Self::GaussianPulse { center, width, amplitude, background } => Self::GaussianPulse {
                center: *center,
                width: *width,
                amplitude: *amplitude,
                background: *background,
            },
            Self::Plateau { start, end, value, background } => Self::Plateau {
                start: *start,
                end: *end,
                value: *value,
                background: *background,
            },
            Self::Step { front, inside, outside } => Self::Step {
                front: *front,
                inside: *inside,
                outside: *outside,
            },
            Self::SineMode { amplitude, mode, length } => Self::SineMode {
                amplitude: *amplitude,
                mode: *mode,
                length: *length,
            },
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

// ==================== Manual Debug Implementation ====================

impl std::fmt::Debug for InitialProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uniform(value) => f.debug_tuple("Uniform").field(value).finish(),
            Self::GaussianPulse { center, width, amplitude, background } => f
                .debug_struct("GaussianPulse")
                .field("center", center)
                .field("width", width)
                .field("amplitude", amplitude)
                .field("background", background)
                .finish(),
            Self::Plateau { start, end, value, background } => f
                .debug_struct("Plateau")
                .field("start", start)
                .field("end", end)
                .field("value", value)
                .field("background", background)
                .finish(),
            Self::Step { front, inside, outside } => f
                .debug_struct("Step")
                .field("front", front)
                .field("inside", inside)
                .field("outside", outside)
                .finish(),
            Self::SineMode { amplitude, mode, length } => f
                .debug_struct("SineMode")
                .field("amplitude", amplitude)
                .field("mode", mode)
                .field("length", length)
                .finish(),
            Self::Custom(_) => f
                .debug_struct("Custom")
                .field("function", &"<user-defined>")
                .finish(),
        }
    }
}

impl InitialProfile {
    pub fn uniform(value: f64) -> Self {
        Self::Uniform(value)
    }

    /// Gaussian pulse on a zero background
    ///
    /// # Panics
    ///
    /// Panics when `width` is not positive.
    pub fn gaussian(center: f64, width: f64, amplitude: f64) -> Self {
        assert!(width > 0.0, "Gaussian width must be positive, got {}", width);
        Self::GaussianPulse { center, width, amplitude, background: 0.0 }
    }

    /// `value` on `[start, end]`, `background` elsewhere
    ///
    /// # Panics
    ///
    /// Panics when `end < start`.
    pub fn plateau(start: f64, end: f64, value: f64, background: f64) -> Self {
        assert!(end >= start, "Plateau end must be >= start");
        Self::Plateau { start, end, value, background }
    }

    /// `inside` for `x ≤ front`, `outside` beyond
    pub fn step(front: f64, inside: f64, outside: f64) -> Self {
        Self::Step { front, inside, outside }
    }

    /// `amplitude · sin(mode · π x / length)`
    ///
    /// # Panics
    ///
    /// Panics when `length` is not positive.
    pub fn sine(amplitude: f64, mode: u32, length: f64) -> Self {
        assert!(length > 0.0, "Sine length must be positive, got {}", length);
        Self::SineMode { amplitude, mode, length }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// θ at coordinate `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Uniform(value) => *value,
            Self::GaussianPulse { center, width, amplitude, background } => {
                let z = (x - center) / width;
                background + amplitude * (-0.5 * z * z).exp()
            }
            Self::Plateau { start, end, value, background } => {
                if x >= *start && x <= *end { *value } else { *background }
            }
            Self::Step { front, inside, outside } => {
                if x <= *front { *inside } else { *outside }
            }
            Self::SineMode { amplitude, mode, length } => {
                amplitude * (*mode as f64 * PI * x / length).sin()
            }
            Self::Custom(f) => f(x),
        }
    }

    /// Nodal values on every node of `grid`, boundaries included
    pub fn sample(&self, grid: &Grid1D) -> DVector<f64> {
        DVector::from_iterator(grid.nodes(), grid.positions().into_iter().map(|x| self.evaluate(x)))
    }
}

// =================================================================================================
// Drop Shapes
// =================================================================================================

/// Region of the plane covered by the wet drop
pub enum DropShape {
    /// `(x − cx)² + (y − cy)² ≤ R²`
    Circle { center: (f64, f64), radius: f64 },

    /// `(x − cx)²/a² + (y − cy)²/b² ≤ 1`
    Ellipse {
        center: (f64, f64),
        semi_x: f64,
        semi_y: f64,
    },

    /// User-defined membership test
    Custom(Arc<dyn Fn(f64, f64) -> bool + Send + Sync>),
}

impl Clone for DropShape {
    fn clone(&self) -> Self {
        match self {
            Self::Circle { center, radius } => Self::Circle { center: *center, radius: *radius },
            Self::Ellipse { center, semi_x, semi_y } => Self::Ellipse {
                center: *center,
                semi_x: *semi_x,
                semi_y: *semi_y,
            },
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl std::fmt::Debug for DropShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Circle { center, radius } => f
                .debug_struct("Circle")
                .field("center", center)
                .field("radius", radius)
                .finish(),
            Self::Ellipse { center, semi_x, semi_y } => f
                .debug_struct("Ellipse")
                .field("center", center)
                .field("semi_x", semi_x)
                .field("semi_y", semi_y)
                .finish(),
            Self::Custom(_) => f
                .debug_struct("Custom")
                .field("predicate", &"<user-defined>")
                .finish(),
        }
    }
}

impl DropShape {
    /// # Panics
    ///
    /// Panics when `radius` is not positive.
    pub fn circle(center: (f64, f64), radius: f64) -> Self {
        assert!(radius > 0.0, "Drop radius must be positive, got {}", radius);
        Self::Circle { center, radius }
    }

    /// # Panics
    ///
    /// Panics when either semi-axis is not positive.
    pub fn ellipse(center: (f64, f64), semi_x: f64, semi_y: f64) -> Self {
        assert!(
            semi_x > 0.0 && semi_y > 0.0,
            "Ellipse semi-axes must be positive, got {} and {}",
            semi_x,
            semi_y
        );
        Self::Ellipse { center, semi_x, semi_y }
    }

    /// Disk of radius `min(Lx, Ly) / 5` at the domain centre
    pub fn centered_circle(grid: &Grid2D) -> Self {
        Self::circle(grid.center(), grid.lx().min(grid.ly()) / 5.0)
    }

    /// 2:1 ellipse at the domain centre, `b = min(Lx, Ly) / 6`, `a = 2b`
    pub fn centered_ellipse(grid: &Grid2D) -> Self {
        let base = grid.lx().min(grid.ly()) / 6.0;
        Self::ellipse(grid.center(), 2.0 * base, base)
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Membership test at `(x, y)`
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Circle { center, radius } => {
                let (dx, dy) = (x - center.0, y - center.1);
                dx * dx + dy * dy <= radius * radius
            }
            Self::Ellipse { center, semi_x, semi_y } => {
                let (u, v) = ((x - center.0) / semi_x, (y - center.1) / semi_y);
                u * u + v * v <= 1.0
            }
            Self::Custom(f) => f(x, y),
        }
    }
}

// =================================================================================================
// 2D Surfaces
// =================================================================================================

/// Initial θ over a 2D grid
pub enum InitialSurface {
    /// `wet` inside `shape`, `dry` elsewhere
    Drop { shape: DropShape, wet: f64, dry: f64 },

    /// `A · sin(πx/Lx) · sin(πy/Ly)`, the linear-decay reference
    SineMode { amplitude: f64 },

    Uniform(f64),

    Custom(Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>),
}

impl Clone for InitialSurface {
    fn clone(&self) -> Self {
        match self {
            Self::Drop { shape, wet, dry } => Self::Drop {
                shape: shape.clone(),
                wet: *wet,
                dry: *dry,
            },
            Self::SineMode { amplitude } => Self::SineMode { amplitude: *amplitude },
            Self::Uniform(value) => Self::Uniform(*value),
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl std::fmt::Debug for InitialSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drop { shape, wet, dry } => f
                .debug_struct("Drop")
                .field("shape", shape)
                .field("wet", wet)
                .field("dry", dry)
                .finish(),
            Self::SineMode { amplitude } => f
                .debug_struct("SineMode")
                .field("amplitude", amplitude)
                .finish(),
            Self::Uniform(value) => f.debug_tuple("Uniform").field(value).finish(),
            Self::Custom(_) => f
                .debug_struct("Custom")
                .field("function", &"<user-defined>")
                .finish(),
        }
    }
}

impl InitialSurface {
    pub fn drop(shape: DropShape, wet: f64, dry: f64) -> Self {
        Self::Drop { shape, wet, dry }
    }

    pub fn sine(amplitude: f64) -> Self {
        Self::SineMode { amplitude }
    }

    pub fn uniform(value: f64) -> Self {
        Self::Uniform(value)
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Nodal values on every node of `grid`, indexed `(i, j) = (x, y)`
    pub fn sample(&self, grid: &Grid2D) -> DMatrix<f64> {
        let (rows, cols) = grid.shape();
        DMatrix::from_fn(rows, cols, |i, j| {
            let (x, y) = (grid.x(i), grid.y(j));
            match self {
                Self::Drop { shape, wet, dry } => {
                    if shape.contains(x, y) { *wet } else { *dry }
                }
                Self::SineMode { amplitude } => {
                    amplitude * (PI * x / grid.lx()).sin() * (PI * y / grid.ly()).sin()
                }
                Self::Uniform(value) => *value,
                Self::Custom(f) => f(x, y),
            }
        })
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
    fn test_gaussian_peak_and_tails() {
        let pulse = InitialProfile::gaussian(0.25, 0.05, 0.8);
        assert_relative_eq!(pulse.evaluate(0.25), 0.8);
        assert_relative_eq!(pulse.evaluate(0.30), 0.8 * (-0.5f64).exp(), epsilon = 1e-12);
        assert!(pulse.evaluate(0.5) < 1e-5);
    }

    #[test]
    fn test_plateau_and_step() {
        let plateau = InitialProfile::plateau(0.2, 0.4, 0.8, 0.0);
        assert_eq!(plateau.evaluate(0.3), 0.8);
        assert_eq!(plateau.evaluate(0.41), 0.0);

        let step = InitialProfile::step(0.1, 0.9, 1e-4);
        assert_eq!(step.evaluate(0.1), 0.9);
        assert_eq!(step.evaluate(0.2), 1e-4);
    }

    #[test]
    fn test_sine_vanishes_at_ends() {
        let sine = InitialProfile::sine(1.0, 1, 2.0);
        assert_relative_eq!(sine.evaluate(1.0), 1.0);
        assert!(sine.evaluate(2.0).abs() < 1e-12);
    }

    #[test]
    fn test_profile_sample_covers_all_nodes() {
        let grid = Grid1D::new(1.0, 9).unwrap();
        let values = InitialProfile::custom(|x| 2.0 * x).sample(&grid);

        assert_eq!(values.len(), 11);
        assert_relative_eq!(values[10], 2.0);
    }

    #[test]
    #[should_panic(expected = "Gaussian width must be positive")]
    fn test_gaussian_zero_width_panics() {
        InitialProfile::gaussian(0.0, 0.0, 1.0);
    }

    #[test]
    fn test_circle_membership() {
        let circle = DropShape::circle((0.5, 0.5), 0.2);
        assert!(circle.contains(0.5, 0.5));
        assert!(circle.contains(0.7, 0.5));
        assert!(!circle.contains(0.71, 0.5));
    }

    #[test]
    fn test_ellipse_membership() {
        let ellipse = DropShape::ellipse((0.0, 0.0), 2.0, 1.0);
        assert!(ellipse.contains(1.9, 0.0));
        assert!(!ellipse.contains(0.0, 1.1));
    }

    #[test]
    fn test_centered_shapes() {
        let grid = Grid2D::new(1.0, 0.6, 10, 10).unwrap();

        match DropShape::centered_circle(&grid) {
            DropShape::Circle { center, radius } => {
                assert_eq!(center, (0.5, 0.3));
                assert_relative_eq!(radius, 0.12);
            }
            other => panic!("unexpected shape {:?}", other),
        }

        match DropShape::centered_ellipse(&grid) {
            DropShape::Ellipse { semi_x, semi_y, .. } => {
                assert_relative_eq!(semi_x, 0.2);
                assert_relative_eq!(semi_y, 0.1);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_drop_surface_sample() {
        let grid = Grid2D::square(1.0, 49).unwrap();
        let surface = InitialSurface::drop(DropShape::centered_circle(&grid), 0.9, 1e-4);
        let field = surface.sample(&grid);

        assert_eq!(field.shape(), (51, 51));
        assert_eq!(field[(25, 25)], 0.9);
        assert_eq!(field[(0, 0)], 1e-4);
        assert_eq!(field, field.transpose());
    }

    #[test]
    fn test_sine_surface_peak() {
        let grid = Grid2D::square(1.0, 9).unwrap();
        let field = InitialSurface::sine(2.0).sample(&grid);
        assert_relative_eq!(field[(5, 5)], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_debug_hides_closures() {
        let text = format!("{:?}", InitialSurface::custom(|x, y| x * y));
        assert!(text.contains("<user-defined>"));
    }
}
