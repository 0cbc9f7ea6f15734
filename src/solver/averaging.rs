//! Face-centred diffusivity
//!
//! Control-volume faces sit halfway between two nodes. The diffusivity on a
//! face is the arithmetic mean of the two nodal samples it separates:
//!
//! ```text
//! node:     0       1       2   ...   n-1
//! face:         0       1       ...  n-2
//! D_face[k] = (D[k] + D[k+1]) / 2
//! ```
//!
//! Faces are re-evaluated on every Picard pass, since nodal diffusivity
//! follows the current iterate.

use nalgebra::DMatrix;

/// Midpoint average along a line of `n` nodes, returning `n - 1` faces.
///
/// Fewer than two nodes have no face and yield an empty vector.
///
/// ```rust
/// use richards_rs::solver::midpoint_average;
///
/// assert_eq!(midpoint_average(&[1.0, 3.0, 7.0]), vec![2.0, 5.0]);
/// ```
pub fn midpoint_average(nodal: &[f64]) -> Vec<f64> {
    nodal.windows(2).map(|pair| 0.5 * (pair[0] + pair[1])).collect()
}

/// Faces normal to x on a nodal matrix indexed `(i, j) = (x, y)`.
///
/// Entry `(i, j)` is the face between nodes `(i, j)` and `(i + 1, j)`; the
/// result has one row fewer than the input.
pub fn x_face_average(nodal: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = nodal.shape();
    DMatrix::from_fn(rows.saturating_sub(1), cols, |i, j| {
        0.5 * (nodal[(i, j)] + nodal[(i + 1, j)])
    })
}

/// Faces normal to y on a nodal matrix indexed `(i, j) = (x, y)`.
///
/// Entry `(i, j)` is the face between nodes `(i, j)` and `(i, j + 1)`; the
/// result has one column fewer than the input.
pub fn y_face_average(nodal: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = nodal.shape();
    DMatrix::from_fn(rows, cols.saturating_sub(1), |i, j| {
        0.5 * (nodal[(i, j)] + nodal[(i, j + 1)])
    })
}
