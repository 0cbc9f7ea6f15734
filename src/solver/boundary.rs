//! Dirichlet boundary values
//!
//! # Design Philosophy
//!
//! The steppers only support fixed-value (Dirichlet) edges. Each edge is a
//! single uniform value:
//!
//! ```text
//!                 north (j = Ny+1)
//!            ┌───────────────────────┐
//!            │                       │
//!  west      │                       │  east
//!  (i = 0)   │        interior       │  (i = Nx+1)
//!            │                       │
//!            └───────────────────────┘
//!                 south (j = 0)
//! ```
//!
//! 1D problems only read `west` and `east`. In cylindrical coordinates the
//! west end is the symmetry axis and `west` is ignored.
//!
//! On 2D fields the x-edges are written first, then the y-edges, so the
//! four corners carry the south / north values.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::solver::{CoordinateSystem, SolverError};

// =================================================================================================
// Dirichlet Boundaries
// =================================================================================================

/// Fixed edge values for a 1D or 2D domain.
///
/// # Examples
///
/// ```rust
/// use richards_rs::solver::DirichletBoundaries;
///
/// // Absorbing walls
/// let walls = DirichletBoundaries::zero();
///
/// // Dry background all around a wet drop
/// let dry = DirichletBoundaries::uniform(1e-4);
/// assert_eq!(dry.north, 1e-4);
///
/// // 1D column wetted from the left
/// let column = DirichletBoundaries::line(0.9, 0.0);
/// assert_eq!(column.west, 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirichletBoundaries {
    /// Value at `x = 0` (1D: left end)
    pub west: f64,

    /// Value at `x = L` / `x = Lx` (1D: right end or outer radius)
    pub east: f64,

    /// Value at `y = 0` (2D only)
    pub south: f64,

    /// Value at `y = Ly` (2D only)
    pub north: f64,
}

impl DirichletBoundaries {
    /// All four edges at the same value
    pub fn uniform(value: f64) -> Self {
        Self::plane(value, value, value, value)
    }

    /// Homogeneous zero edges
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// 1D ends; the unused y-edges take the west value.
    pub fn line(west: f64, east: f64) -> Self {
        Self::plane(west, east, west, west)
    }

    pub fn plane(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self { west, east, south, north }
    }

    /// Edge values as `[west, east, south, north]`
    pub fn values(&self) -> [f64; 4] {
        [self.west, self.east, self.south, self.north]
    }

    /// Reject non-finite edge values.
    pub fn validate(&self) -> Result<(), SolverError> {
        for (name, value) in ["west", "east", "south", "north"].iter().zip(self.values()) {
            if !value.is_finite() {
                return Err(SolverError::InvalidConfiguration(format!(
                    "{} boundary value must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    // ======================================== Imposition ========================================

    /// Write the end values into a 1D nodal field.
    ///
    /// Cartesian fields get both ends; cylindrical fields only the outer
    /// wall, node `0` being the axis.
    pub fn impose_on_vector(&self, field: &mut DVector<f64>, coordinates: CoordinateSystem) {
        let n = field.len();
        if n == 0 {
            return;
        }

        if coordinates == CoordinateSystem::Cartesian {
            field[0] = self.west;
        }
        field[n - 1] = self.east;
    }

    /// Write the four edge values into a 2D nodal field indexed `(x, y)`.
    pub fn impose_on_matrix(&self, field: &mut DMatrix<f64>) {
        let (rows, cols) = field.shape();
        if rows == 0 || cols == 0 {
            return;
        }

        field.row_mut(0).fill(self.west);
        field.row_mut(rows - 1).fill(self.east);
        field.column_mut(0).fill(self.south);
        field.column_mut(cols - 1).fill(self.north);
    }
}

impl fmt::Display for DirichletBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dirichlet(W={}, E={}, S={}, N={})",
            self.west, self.east, self.south, self.north
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories() {
        assert_eq!(DirichletBoundaries::zero().values(), [0.0; 4]);
        assert_eq!(DirichletBoundaries::uniform(0.3).values(), [0.3; 4]);

        let line = DirichletBoundaries::line(1.0, 2.0);
        assert_eq!(line.west, 1.0);
        assert_eq!(line.east, 2.0);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut bc = DirichletBoundaries::zero();
        assert!(bc.validate().is_ok());

        bc.south = f64::NAN;
        let err = bc.validate().unwrap_err();
        assert!(err.to_string().contains("south"));
    }

    #[test]
    fn test_impose_cartesian_vector() {
        let mut field = DVector::from_element(5, 0.5);
        DirichletBoundaries::line(0.1, 0.2).impose_on_vector(&mut field, CoordinateSystem::Cartesian);

        assert_eq!(field.as_slice(), &[0.1, 0.5, 0.5, 0.5, 0.2]);
    }

    #[test]
    fn test_impose_cylindrical_vector_keeps_axis() {
        let mut field = DVector::from_element(4, 0.5);
        DirichletBoundaries::line(0.1, 0.2)
            .impose_on_vector(&mut field, CoordinateSystem::Cylindrical);

        assert_eq!(field.as_slice(), &[0.5, 0.5, 0.5, 0.2]);
    }

    #[test]
    fn test_impose_matrix_corners_take_y_edges() {
        let mut field = DMatrix::from_element(4, 3, 9.0);
        DirichletBoundaries::plane(1.0, 2.0, 3.0, 4.0).impose_on_matrix(&mut field);

        assert_eq!(field[(0, 1)], 1.0);
        assert_eq!(field[(3, 1)], 2.0);
        assert_eq!(field[(1, 0)], 3.0);
        assert_eq!(field[(2, 2)], 4.0);

        assert_eq!(field[(0, 0)], 3.0);
        assert_eq!(field[(3, 0)], 3.0);
        assert_eq!(field[(0, 2)], 4.0);
        assert_eq!(field[(3, 2)], 4.0);

        assert_eq!(field[(1, 1)], 9.0);
    }

    #[test]
    fn test_display() {
        let text = DirichletBoundaries::uniform(0.0).to_string();
        assert!(text.starts_with("Dirichlet("));
    }
}
