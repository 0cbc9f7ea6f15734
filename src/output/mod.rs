//! Output module for simulation results
//!
//! Writes results to disk for external analysis and plotting.
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Data export
//!     ├── mod.rs          ← Exporter trait
//!     └── csv.rs          ← CSV writers
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use richards_rs::output::export::{CsvExporter, Exporter};
//!
//! CsvExporter::default().export_final(&result, "final.csv")?;
//! ```
//!
//! Every writer accepts plain slices or nalgebra fields, so profiles taken
//! from [`analysis`](crate::analysis) export the same way as solver output.

pub mod export;
