//! Field data types
//!
//! This module provides a container for nodal fields whose shape depends
//! on the problem's dimensionality.

use nalgebra::{DMatrix, DVector};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::solver::parallel_threshold;

/// Nodal field container, scalar to 2D
///
/// # Storage Types
///
/// - **Scalar**: Single uniform value (0D)
/// - **Vector**: 1D profile, boundary nodes included
/// - **Matrix**: 2D field indexed `(i, j) = (x, y)`, boundary nodes included
///
/// # Memory Layout
///
/// - **Scalar**: 8 bytes
/// - **Vector[n]**: 8n bytes
/// - **Matrix[n×m]**: 8nm bytes, column-major (a fixed `y` line is contiguous)
///
/// # Examples
///
/// ```rust
/// use richards_rs::physics::FieldData;
///
/// let profile = FieldData::uniform_vector(102, 0.0);
/// assert_eq!(profile.ndim(), 1);
///
/// let surface = FieldData::uniform_matrix(52, 52, 1e-4);
/// assert_eq!(surface.shape(), vec![52, 52]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    /// Scalar value (0D) - 8 bytes
    ///
    /// Use for: uniform quantities, single evaluations
    Scalar(f64),

    /// Vector (1D) - 8n bytes
    ///
    /// Use for: 1D saturation profiles (planar or radial)
    Vector(DVector<f64>),

    /// Matrix (2D) - 8nm bytes
    ///
    /// Use for: 2D saturation fields, `A[x, y]`
    Matrix(DMatrix<f64>),
}

impl FieldData {

    // ======================================= constructors =======================================

    /// Create from scalar
    pub fn from_scalar(value: f64) -> Self {
        Self::Scalar(value)
    }

    /// Create from vector
    pub fn from_vec(vector: Vec<f64>) -> Self {
        Self::Vector(DVector::from_vec(vector))
    }

    /// Create from DVector
    pub fn from_vector(vector: DVector<f64>) -> Self {
        Self::Vector(vector)
    }

    /// Create from DMatrix
    pub fn from_matrix(matrix: DMatrix<f64>) -> Self {
        Self::Matrix(matrix)
    }

    /// Create uniform vector
    pub fn uniform_vector(size: usize, value: f64) -> Self {
        Self::Vector(DVector::from_element(size, value))
    }

    /// Create uniform matrix
    pub fn uniform_matrix(rows: usize, columns: usize, value: f64) -> Self {
        Self::Matrix(DMatrix::from_element(rows, columns, value))
    }

    // ========================================== Queries ==========================================

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, Self::Matrix(_))
    }

    /// Get data dimension
    ///
    /// Returns: 0 (scalar), 1 (vector), 2 (matrix)
    pub fn ndim(&self) -> usize {
        match self {
            FieldData::Scalar(_) => 0,
            FieldData::Vector(_) => 1,
            FieldData::Matrix(_) => 2,
        }
    }

    /// Get shape as a vector
    pub fn shape(&self) -> Vec<usize> {
        match self {
            FieldData::Scalar(_) => vec![],
            FieldData::Vector(v) => vec![v.len()],
            FieldData::Matrix(m) => vec![m.nrows(), m.ncols()],
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        match self {
            FieldData::Scalar(_) => 1,
            FieldData::Vector(v) => v.len(),
            FieldData::Matrix(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat view over all stored values (column-major for matrices)
    pub fn as_slice(&self) -> &[f64] {
        match self {
            FieldData::Scalar(value) => std::slice::from_ref(value),
            FieldData::Vector(v) => v.as_slice(),
            FieldData::Matrix(m) => m.as_slice(),
        }
    }

    /// Smallest stored value (`+inf` when empty)
    pub fn min(&self) -> f64 {
        self.as_slice().iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest stored value (`-inf` when empty)
    pub fn max(&self) -> f64 {
        self.as_slice().iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// `true` when no value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|x| x.is_finite())
    }

    // ======================================== Extractions ========================================

    /// Extract as a scalar (panic if not)
    pub fn as_scalar(&self) -> f64 {
        match self {
            FieldData::Scalar(value) => *value,
            _ => panic!("Not a scalar value"),
        }
    }

    pub fn try_as_scalar(&self) -> Option<f64> {
        match self {
            FieldData::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Extract as a DVector (panic if not)
    pub fn as_vector(&self) -> &DVector<f64> {
        match self {
            FieldData::Vector(value) => value,
            _ => panic!("Not a vector value"),
        }
    }

    pub fn try_as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            FieldData::Vector(value) => Some(value),
            _ => None,
        }
    }

    /// Extract as a DMatrix (panic if not)
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        match self {
            FieldData::Matrix(value) => value,
            _ => panic!("Not a matrix value"),
        }
    }

    pub fn try_as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            FieldData::Matrix(value) => Some(value),
            _ => None,
        }
    }

    // ====================================== Apply functions ======================================

    /// Apply `f` to every value in place
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        match self {
            FieldData::Scalar(value) => *value = f(*value),
            FieldData::Vector(value) => apply_nodewise(value.as_mut_slice(), f),
            FieldData::Matrix(value) => apply_nodewise(value.as_mut_slice(), f),
        }
    }

    /// Same-shape copy with `f` applied to every value
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        let mut out = self.clone();
        out.apply(f);
        out
    }
}

/// Apply `f` to every element of `values` in place.
///
/// Switches to rayon above [`parallel_threshold()`] when the `parallel`
/// feature is on.
pub fn apply_nodewise<F>(values: &mut [f64], f: F)
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    if values.len() > parallel_threshold() {
        #[cfg(feature = "parallel")]
        values.par_iter_mut().for_each(|x| *x = f(*x));
        #[cfg(not(feature = "parallel"))]
        values.iter_mut().for_each(|x| *x = f(*x));
    } else {
        values.iter_mut().for_each(|x| *x = f(*x));
    }
}

// ======================== Conversions ============================

impl From<DVector<f64>> for FieldData {
    fn from(value: DVector<f64>) -> Self {
        FieldData::Vector(value)
    }
}

impl From<DMatrix<f64>> for FieldData {
    fn from(value: DMatrix<f64>) -> Self {
        FieldData::Matrix(value)
    }
}

// ======================== Display ============================

impl fmt::Display for FieldData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldData::Scalar(value) => write!(f, "Scalar ({})", value),
            FieldData::Vector(value) => write!(f, "Vector [{}]", value.len()),
            FieldData::Matrix(value) => write!(f, "Matrix [{} * {}]", value.nrows(), value.ncols()),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ThresholdGuard;

    #[test]
    fn test_scalar() {
        let data = FieldData::Scalar(42.0);
        assert!(data.is_scalar());
        assert_eq!(data.ndim(), 0);
        assert_eq!(data.len(), 1);
        assert_eq!(data.as_slice(), &[42.0]);
    }

    #[test]
    fn test_vector() {
        let data = FieldData::uniform_vector(100, 1.0);
        assert!(data.is_vector());
        assert_eq!(data.ndim(), 1);
        assert_eq!(data.len(), 100);
        assert!(data.try_as_matrix().is_none());
    }

    #[test]
    fn test_matrix() {
        let data = FieldData::uniform_matrix(12, 7, 0.5);
        assert!(data.is_matrix());
        assert_eq!(data.ndim(), 2);
        assert_eq!(data.shape(), vec![12, 7]);
    }

    #[test]
    fn test_min_max() {
        let data = FieldData::from_vec(vec![0.3, -1.0, 2.5, 0.0]);
        assert_eq!(data.min(), -1.0);
        assert_eq!(data.max(), 2.5);
    }

    #[test]
    fn test_is_finite() {
        assert!(FieldData::uniform_matrix(3, 3, 0.1).is_finite());
        assert!(!FieldData::from_vec(vec![0.0, f64::NAN]).is_finite());
        assert!(!FieldData::Scalar(f64::INFINITY).is_finite());
    }

    #[test]
    fn test_apply_sequential() {
        let mut data = FieldData::uniform_vector(10, 2.0);
        data.apply(|x| x * 3.0);
        assert_eq!(data.as_vector()[0], 6.0);
    }

    #[test]
    fn test_apply_above_threshold_matches_sequential() {
        let _guard = ThresholdGuard::save(16);

        let source = FieldData::from_matrix(DMatrix::from_fn(20, 20, |i, j| (i * 20 + j) as f64));
        let mapped = source.map(|x| x.sqrt());

        for (before, after) in source.as_slice().iter().zip(mapped.as_slice()) {
            assert_eq!(before.sqrt(), *after);
        }
    }

    #[test]
    #[should_panic(expected = "Not a vector value")]
    fn test_as_vector_on_matrix_panics() {
        FieldData::uniform_matrix(2, 2, 0.0).as_vector();
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldData::uniform_matrix(3, 4, 0.0).to_string(), "Matrix [3 * 4]");
        assert_eq!(FieldData::uniform_vector(5, 0.0).to_string(), "Vector [5]");
    }
}
