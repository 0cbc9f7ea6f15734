//! Export module for simulation results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module; adding
//! a format means adding a file.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use richards_rs::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//!
//! // Final field only
//! exporter.export_final(&result, "final.csv")?;
//!
//! // Recorded snapshots, downsampled to at most 5
//! exporter.export_trajectory(&result, Some(5), "history.csv")?;
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, CsvMetadata};

use crate::solver::SimulationResult;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type, so callers
/// can react to the precise failure without boxing.
///
/// # Parameter `n_points`
///
/// - `None`: exports every recorded snapshot
/// - `Some(n)`: uniformly downsamples to `n` snapshots, always keeping the
///   **first and last** ones
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Exports the field at the end of the run.
    ///
    /// 1D results give `position, theta`; 2D results give `x, y, theta`.
    fn export_final(&self, result: &SimulationResult, path: &str) -> Result<(), Self::Error>;

    /// Exports the recorded snapshots.
    ///
    /// 1D results give one row per node and one column per snapshot; 2D
    /// results give one row per node and snapshot (`time, x, y, theta`).
    fn export_trajectory(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), Self::Error>;
}

/// Indices of at most `n_points` entries out of `len`, evenly spread, first
/// and last always included.
pub fn downsample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n < len => match n {
            0 => Vec::new(),
            1 => vec![len - 1],
            _ => {
                let mut indices: Vec<usize> = (0..n)
                    .map(|k| (k as f64 * (len - 1) as f64 / (n - 1) as f64).round() as usize)
                    .collect();
                indices.dedup();
                indices
            }
        },
        _ => (0..len).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsample_keeps_everything_by_default() {
        assert_eq!(downsample_indices(4, None), vec![0, 1, 2, 3]);
        assert_eq!(downsample_indices(4, Some(10)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_downsample_keeps_ends() {
        let indices = downsample_indices(101, Some(5));
        assert_eq!(indices, vec![0, 25, 50, 75, 100]);

        let indices = downsample_indices(10, Some(3));
        assert_eq!(indices.first(), Some(&0));
        assert_eq!(indices.last(), Some(&9));
        assert_eq!(indices.len(), 3);
    }

    #[test]
    fn test_downsample_degenerate() {
        assert!(downsample_indices(5, Some(0)).is_empty());
        assert_eq!(downsample_indices(5, Some(1)), vec![4]);
        assert!(downsample_indices(0, None).is_empty());
    }
}
