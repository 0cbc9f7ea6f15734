//! Structured grids
//!
//! # 1D
//!
//! `M + 2` nodes span `[0, L]` with uniform spacing `dx = L / (M + 1)`.
//! Node `0` and node `M + 1` are boundary nodes, `1..=M` are interior.
//!
//! In cylindrical coordinates the coordinate is the radius `r`; node `0`
//! sits on the axis. The axis is not a physical boundary, so it becomes an
//! unknown: the implicit system covers nodes `0..=M`, while node `M + 1`
//! (the outer wall) keeps its Dirichlet value.
//!
//! # 2D
//!
//! `(Nx + 2) × (Ny + 2)` nodes over `[0, Lx] × [0, Ly]`, stored as a
//! `DMatrix` indexed `(i, j) = (x, y)`. The four edges are boundary nodes.

use std::fmt;

use crate::solver::SolverError;

// =================================================================================================
// Coordinate System
// =================================================================================================

/// Metric used by the 1D stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSystem {
    /// Planar `∂θ/∂t = ∂x(D ∂x θ)`
    #[default]
    Cartesian,

    /// Axisymmetric `∂θ/∂t = (1/r) ∂r(r D ∂r θ)`
    Cylindrical,
}

impl CoordinateSystem {
    pub fn name(&self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => "Cartesian",
            CoordinateSystem::Cylindrical => "Cylindrical",
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// 1D Grid
// =================================================================================================

/// Uniform 1D grid with Dirichlet end nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid1D {
    length: f64,
    interior: usize,
    coordinates: CoordinateSystem,
}

impl Grid1D {
    /// Planar grid of `interior` unknowns over `[0, length]`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidGeometry`] when `length` is not a positive
    /// finite number or `interior == 0`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use richards_rs::solver::Grid1D;
    ///
    /// let grid = Grid1D::new(0.5, 100).unwrap();
    /// assert_eq!(grid.nodes(), 102);
    /// assert!((grid.spacing() - 0.5 / 101.0).abs() < 1e-15);
    /// ```
    pub fn new(length: f64, interior: usize) -> Result<Self, SolverError> {
        Self::with_coordinates(length, interior, CoordinateSystem::Cartesian)
    }

    /// Radial grid over `[0, radius]`, axis at node 0.
    pub fn cylindrical(radius: f64, interior: usize) -> Result<Self, SolverError> {
        Self::with_coordinates(radius, interior, CoordinateSystem::Cylindrical)
    }

    pub fn with_coordinates(
        length: f64,
        interior: usize,
        coordinates: CoordinateSystem,
    ) -> Result<Self, SolverError> {
        if !(length.is_finite() && length > 0.0) {
            return Err(SolverError::InvalidGeometry(format!(
                "domain length must be positive and finite, got {}",
                length
            )));
        }
        if interior == 0 {
            return Err(SolverError::InvalidGeometry(
                "grid needs at least one interior node".to_string(),
            ));
        }

        Ok(Self { length, interior, coordinates })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of interior nodes `M`
    pub fn interior(&self) -> usize {
        self.interior
    }

    /// Total node count `M + 2`
    pub fn nodes(&self) -> usize {
        self.interior + 2
    }

    pub fn coordinates(&self) -> CoordinateSystem {
        self.coordinates
    }

    /// `dx = L / (M + 1)`
    pub fn spacing(&self) -> f64 {
        self.length / (self.interior + 1) as f64
    }

    /// Coordinate of node `i`
    pub fn position(&self, i: usize) -> f64 {
        i as f64 * self.spacing()
    }

    /// All node coordinates, boundaries included
    pub fn positions(&self) -> Vec<f64> {
        (0..self.nodes()).map(|i| self.position(i)).collect()
    }

    /// Size of the implicit system: `M` planar, `M + 1` cylindrical (axis included).
    pub fn unknowns(&self) -> usize {
        match self.coordinates {
            CoordinateSystem::Cartesian => self.interior,
            CoordinateSystem::Cylindrical => self.interior + 1,
        }
    }

    /// Node index of the first implicit unknown.
    pub fn first_unknown(&self) -> usize {
        match self.coordinates {
            CoordinateSystem::Cartesian => 1,
            CoordinateSystem::Cylindrical => 0,
        }
    }
}

// =================================================================================================
// 2D Grid
// =================================================================================================

/// Uniform 2D grid with Dirichlet edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid2D {
    lx: f64,
    ly: f64,
    nx: usize,
    ny: usize,
}

impl Grid2D {
    /// Grid of `nx × ny` interior nodes over `[0, lx] × [0, ly]`.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidGeometry`] on a non-positive side or a zero
    /// interior count.
    pub fn new(lx: f64, ly: f64, nx: usize, ny: usize) -> Result<Self, SolverError> {
        for (name, side) in [("lx", lx), ("ly", ly)] {
            if !(side.is_finite() && side > 0.0) {
                return Err(SolverError::InvalidGeometry(format!(
                    "{} must be positive and finite, got {}",
                    name, side
                )));
            }
        }
        if nx == 0 || ny == 0 {
            return Err(SolverError::InvalidGeometry(format!(
                "grid needs interior nodes in both directions, got {} x {}",
                nx, ny
            )));
        }

        Ok(Self { lx, ly, nx, ny })
    }

    /// Square domain `[0, side]²` with `n × n` interior nodes.
    pub fn square(side: f64, n: usize) -> Result<Self, SolverError> {
        Self::new(side, side, n, n)
    }

    pub fn lx(&self) -> f64 {
        self.lx
    }

    pub fn ly(&self) -> f64 {
        self.ly
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dx(&self) -> f64 {
        self.lx / (self.nx + 1) as f64
    }

    pub fn dy(&self) -> f64 {
        self.ly / (self.ny + 1) as f64
    }

    pub fn x(&self, i: usize) -> f64 {
        i as f64 * self.dx()
    }

    pub fn y(&self, j: usize) -> f64 {
        j as f64 * self.dy()
    }

    /// Nodal shape `(Nx + 2, Ny + 2)`
    pub fn shape(&self) -> (usize, usize) {
        (self.nx + 2, self.ny + 2)
    }

    /// `Nx · Ny`
    pub fn interior_points(&self) -> usize {
        self.nx * self.ny
    }

    /// Geometric centre of the domain
    pub fn center(&self) -> (f64, f64) {
        (0.5 * self.lx, 0.5 * self.ly)
    }

    /// `true` when the domain and the node layout are invariant under `(x, y) → (y, x)`
    pub fn is_square(&self) -> bool {
        self.nx == self.ny && self.lx == self.ly
    }
}

// =================================================================================================
// Domain
// =================================================================================================

/// Spatial domain of a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    Line(Grid1D),
    Plane(Grid2D),
}

impl Domain {
    pub fn ndim(&self) -> usize {
        match self {
            Domain::Line(_) => 1,
            Domain::Plane(_) => 2,
        }
    }

    /// Node count including boundaries
    pub fn nodes(&self) -> usize {
        match self {
            Domain::Line(grid) => grid.nodes(),
            Domain::Plane(grid) => {
                let (rows, cols) = grid.shape();
                rows * cols
            }
        }
    }

    /// Implicit unknowns per sweep of one time step
    pub fn unknowns(&self) -> usize {
        match self {
            Domain::Line(grid) => grid.unknowns(),
            Domain::Plane(grid) => grid.interior_points(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Line(grid) => write!(
                f,
                "{} line L={} with {} interior nodes",
                grid.coordinates(),
                grid.length(),
                grid.interior()
            ),
            Domain::Plane(grid) => write!(
                f,
                "plane {}x{} with {}x{} interior nodes",
                grid.lx(),
                grid.ly(),
                grid.nx(),
                grid.ny()
            ),
        }
    }
}
