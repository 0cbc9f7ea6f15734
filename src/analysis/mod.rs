//! Post-processing diagnostics
//!
//! Quantities computed from nodal fields after (or during) a run:
//!
//! - **Mass**: trapezoidal integral of θ over the domain
//! - **Error norms**: discrete L2 distance to a reference field
//! - **Peak position**: location of the largest nodal value
//! - **Radial profile**: binned average of a 2D field about a centre, used
//!   to compare a circular drop with the 1D cylindrical solution
//! - **Symmetry**: largest deviation of a square field from its transpose
//!
//! All functions take plain nalgebra containers and the grid they live on.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use crate::solver::{CoordinateSystem, Grid1D, Grid2D, SolverError};

// =================================================================================================
// Integrals
// =================================================================================================

/// Composite trapezoidal rule over uniformly spaced samples
pub fn trapezoid(values: &[f64], spacing: f64) -> f64 {
    match values.len() {
        0 | 1 => 0.0,
        n => {
            let interior: f64 = values[1..n - 1].iter().sum();
            spacing * (interior + 0.5 * (values[0] + values[n - 1]))
        }
    }
}

/// Total moisture of a 1D field
///
/// Planar: `∫ θ dx`. Cylindrical: `2π ∫ θ r dr`, the content of the disk.
///
/// # Errors
///
/// [`SolverError::DimensionMismatch`] when `field` does not hold one value
/// per grid node.
pub fn mass_1d(field: &DVector<f64>, grid: &Grid1D) -> Result<f64, SolverError> {
    check_len(field.len(), grid.nodes())?;

    let mass = match grid.coordinates() {
        CoordinateSystem::Cartesian => trapezoid(field.as_slice(), grid.spacing()),
        CoordinateSystem::Cylindrical => {
            let weighted: Vec<f64> = field
                .iter()
                .enumerate()
                .map(|(i, theta)| theta * grid.position(i))
                .collect();
            2.0 * PI * trapezoid(&weighted, grid.spacing())
        }
    };
    Ok(mass)
}

/// Total moisture of a 2D field, `∬ θ dx dy`
pub fn mass_2d(field: &DMatrix<f64>, grid: &Grid2D) -> Result<f64, SolverError> {
    check_shape(field, grid)?;

    let columns: Vec<f64> = field
        .column_iter()
        .map(|column| {
            let values: Vec<f64> = column.iter().copied().collect();
            trapezoid(&values, grid.dx())
        })
        .collect();
    Ok(trapezoid(&columns, grid.dy()))
}

// =================================================================================================
// Error Norms
// =================================================================================================

/// `sqrt(Σ (a − b)² · cell)`
///
/// `cell` is the area (or length) one node stands for: `dx` in 1D, `dx·dy`
/// in 2D.
pub fn l2_error(numeric: &[f64], reference: &[f64], cell: f64) -> Result<f64, SolverError> {
    check_len(numeric.len(), reference.len())?;

    let sum: f64 = numeric
        .iter()
        .zip(reference)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();
    Ok((sum * cell).sqrt())
}

/// Discrete L2 error of a 1D field, interior nodes only
pub fn l2_error_1d(
    numeric: &DVector<f64>,
    reference: &DVector<f64>,
    grid: &Grid1D,
) -> Result<f64, SolverError> {
    check_len(numeric.len(), grid.nodes())?;
    check_len(reference.len(), grid.nodes())?;

    let m = grid.interior();
    l2_error(&numeric.as_slice()[1..=m], &reference.as_slice()[1..=m], grid.spacing())
}

/// Discrete L2 error of a 2D field, interior nodes only
pub fn l2_error_2d(
    numeric: &DMatrix<f64>,
    reference: &DMatrix<f64>,
    grid: &Grid2D,
) -> Result<f64, SolverError> {
    check_shape(numeric, grid)?;
    check_shape(reference, grid)?;

    let (nx, ny) = (grid.nx(), grid.ny());
    let a: Vec<f64> = numeric.view((1, 1), (nx, ny)).iter().copied().collect();
    let b: Vec<f64> = reference.view((1, 1), (nx, ny)).iter().copied().collect();
    l2_error(&a, &b, grid.dx() * grid.dy())
}

// =================================================================================================
// Peaks and Symmetry
// =================================================================================================

/// Index of the largest value, first one on ties. `None` for an empty slice
/// or when every value is NaN.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Coordinate of the peak of a 1D field
pub fn peak_position(field: &DVector<f64>, grid: &Grid1D) -> Option<f64> {
    argmax(field.as_slice()).map(|i| grid.position(i))
}

/// `max |θ − θᵀ|`, zero for a field symmetric under `(x, y) → (y, x)`
///
/// # Errors
///
/// [`SolverError::InvalidGeometry`] when the field is not square.
pub fn max_transpose_asymmetry(field: &DMatrix<f64>) -> Result<f64, SolverError> {
    if !field.is_square() {
        return Err(SolverError::InvalidGeometry(format!(
            "transpose symmetry needs a square field, got {}x{}",
            field.nrows(),
            field.ncols()
        )));
    }
    Ok((field - field.transpose()).amax())
}

// =================================================================================================
// Radial Profile
// =================================================================================================

/// Binned radial average of a 2D field
#[derive(Debug, Clone, PartialEq)]
pub struct RadialProfile {
    /// Bin centres
    pub radii: Vec<f64>,

    /// Mean θ per bin
    pub values: Vec<f64>,

    /// Nodes that fell in each bin (0 for a bin filled from its neighbour)
    pub counts: Vec<usize>,
}

impl RadialProfile {
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Linear interpolation of the profile at radius `r`, clamped to the
    /// first and last bin centres.
    pub fn value_at(&self, r: f64) -> f64 {
        let n = self.radii.len();
        if n == 0 {
            return f64::NAN;
        }
        if r <= self.radii[0] {
            return self.values[0];
        }
        if r >= self.radii[n - 1] {
            return self.values[n - 1];
        }

        let k = self.radii.partition_point(|&x| x <= r) - 1;
        let t = (r - self.radii[k]) / (self.radii[k + 1] - self.radii[k]);
        self.values[k] + t * (self.values[k + 1] - self.values[k])
    }
}

/// Average `field` over `n_bins` rings of equal width covering `[0, r_max)`
/// around `center`.
///
/// A bin with no node takes the value of the bin before it. A leading empty
/// bin has no predecessor and is NaN rather than 0, so that it cannot be
/// mistaken for a dry ring.
///
/// # Errors
///
/// [`SolverError::InvalidGeometry`] on a non-positive `r_max`, zero bins, or
/// a `field` whose shape is not `grid.shape()`.
pub fn extract_radial_profile(
    grid: &Grid2D,
    field: &DMatrix<f64>,
    center: (f64, f64),
    r_max: f64,
    n_bins: usize,
) -> Result<RadialProfile, SolverError> {
    if !(r_max.is_finite() && r_max > 0.0) || n_bins == 0 {
        return Err(SolverError::InvalidGeometry(format!(
            "radial profile needs r_max > 0 and at least one bin, got {} and {}",
            r_max, n_bins
        )));
    }
    check_shape(field, grid)?;
    let (rows, cols) = grid.shape();

    let width = r_max / n_bins as f64;
    let mut sums = vec![0.0; n_bins];
    let mut counts = vec![0usize; n_bins];

    for j in 0..cols {
        for i in 0..rows {
            let (dx, dy) = (grid.x(i) - center.0, grid.y(j) - center.1);
            let r = (dx * dx + dy * dy).sqrt();
            if r >= r_max {
                continue;
            }
            let bin = ((r / width) as usize).min(n_bins - 1);
            sums[bin] += field[(i, j)];
            counts[bin] += 1;
        }
    }

    let mut values = Vec::with_capacity(n_bins);
    for k in 0..n_bins {
        let value = if counts[k] > 0 {
            sums[k] / counts[k] as f64
        } else {
            values.last().copied().unwrap_or(f64::NAN)
        };
        values.push(value);
    }

    let radii = (0..n_bins).map(|k| (k as f64 + 0.5) * width).collect();

    Ok(RadialProfile { radii, values, counts })
}

fn check_shape(field: &DMatrix<f64>, grid: &Grid2D) -> Result<(), SolverError> {
    let expected = grid.shape();
    if field.shape() != expected {
        return Err(SolverError::InvalidGeometry(format!(
            "field is {}x{}, grid has {}x{} nodes",
            field.nrows(),
            field.ncols(),
            expected.0,
            expected.1
        )));
    }
    Ok(())
}

fn check_len(found: usize, expected: usize) -> Result<(), SolverError> {
    if found != expected {
        return Err(SolverError::DimensionMismatch { expected, found });
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
