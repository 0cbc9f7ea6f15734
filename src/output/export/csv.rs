//! CSV export for moisture simulation results
//!
//! Writes profiles, 2D fields, radial profiles and per-step convergence
//! reports in CSV, readable by spreadsheets, pandas or MATLAB.
//!
//! # Features
//!
//! - **Simple interface**: export with `&[f64]` slices or nalgebra fields
//! - **Metadata support**: optional `#` comment header with run parameters
//! - **Customizable**: delimiter, precision, decimal separator
//! - **Validation**: rejects empty data, NaN or Inf, mismatched lengths
//!
//! # Quick Examples
//!
//! ## Minimal Export
//!
//! ```rust,ignore
//! use richards_rs::output::export::csv::export_profile_csv;
//!
//! let x = vec![0.0, 0.25, 0.5];
//! let theta = vec![0.0, 0.8, 0.0];
//!
//! export_profile_csv(&x, &theta, "profile.csv", None)?;
//! ```
//!
//! **Output** (`profile.csv`):
//! ```csv
//! x,theta
//! 0.000000,0.000000
//! 0.250000,0.800000
//! 0.500000,0.000000
//! ```
//!
//! ## With Metadata
//!
//! ```rust,ignore
//! let metadata = CsvMetadata::from_simulation("Brooks-Corey", "Implicit Picard 1D", 0.1, 200);
//! let config = CsvConfig::default().with_metadata(metadata);
//!
//! export_profile_csv(&x, &theta, "profile.csv", Some(&config))?;
//! ```
//!
//! **Output** (`profile.csv`):
//! ```csv
//! # Moisture Diffusion Simulation Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Model: Brooks-Corey
//! # Solver: Implicit Picard 1D
//! # Total Time: 0.1
//! # Time Steps: 200
//! #
//! x,theta
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};

use nalgebra::DMatrix;
use thiserror::Error;

use crate::analysis::RadialProfile;
use crate::output::export::{downsample_indices, Exporter};
use crate::physics::FieldData;
use crate::solver::{ConvergenceStatus, Domain, Grid2D, SimulationResult, StepReport};

// =============================================================================
// Errors
// =============================================================================

/// Errors raised by the CSV writers
#[derive(Debug, Error)]
pub enum CsvError {
    /// File creation or write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Empty, non-finite or inconsistent input
    #[error("invalid data: {0}")]
    InvalidData(String),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use richards_rs::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.decimal_separator, '.');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the position column of 1D exports (default: "x")
    pub position_header: String,

    /// Header of the moisture column (default: "theta")
    pub value_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            position_header: "x".to_string(),
            value_header: "theta".to_string(),
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: set the 1D position header (e.g. "r" for radial runs)
    pub fn position_header(mut self, header: &str) -> Self {
        self.position_header = header.to_string();
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// All fields are optional. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Diffusivity model name (e.g. "Brooks-Corey")
    pub model_name: Option<String>,

    /// Solver name (e.g. "ADI Picard 2D")
    pub solver_name: Option<String>,

    /// Final time `T`
    pub total_time: Option<f64>,

    /// Number of time steps `N`
    pub time_steps: Option<usize>,

    /// Domain description
    pub domain: Option<String>,

    /// Picard passes over the whole run
    pub picard_passes: Option<usize>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    pub fn from_simulation(model: &str, solver: &str, total_time: f64, time_steps: usize) -> Self {
        Self {
            model_name: Some(model.to_string()),
            solver_name: Some(solver.to_string()),
            total_time: Some(total_time),
            time_steps: Some(time_steps),
            ..Default::default()
        }
    }

    /// Collect what a [`SimulationResult`] knows about its own run
    pub fn from_result(result: &SimulationResult) -> Self {
        let mut metadata = Self {
            model_name: result.get_metadata("model").map(str::to_string),
            solver_name: result.get_metadata("solver").map(str::to_string),
            total_time: Some(result.final_time()),
            time_steps: Some(result.cost.time_steps),
            domain: Some(result.domain.to_string()),
            picard_passes: Some(result.cost.picard_passes),
            custom: Vec::new(),
        };
        if let Some(dt) = result.get_metadata("dt") {
            metadata.add_custom("dt", dt);
        }
        metadata
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: &str, value: &str) {
        self.custom.push((key.to_string(), value.to_string()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(writer: &mut W, metadata: &CsvMetadata) -> Result<(), CsvError> {
    writeln!(writer, "# Moisture Diffusion Simulation Data")?;

    let now = chrono::Utc::now();
    writeln!(writer, "# Generated: {}", now.to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(writer, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(writer, "# Solver: {}", solver)?;
    }
    if let Some(domain) = &metadata.domain {
        writeln!(writer, "# Domain: {}", domain)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(writer, "# Total Time: {}", total_time)?;
    }
    if let Some(time_steps) = metadata.time_steps {
        writeln!(writer, "# Time Steps: {}", time_steps)?;
    }
    if let Some(passes) = metadata.picard_passes {
        writeln!(writer, "# Picard Passes: {}", passes)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(writer, "# {}: {}", key, value)?;
    }

    writeln!(writer, "#")?;

    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

fn check_finite(values: &[f64], what: &str) -> Result<(), CsvError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CsvError::InvalidData(format!("NaN or Inf detected in {}", what)));
    }
    Ok(())
}

fn create(output_path: &str, config: &CsvConfig) -> Result<BufWriter<File>, CsvError> {
    let mut writer = BufWriter::new(File::create(output_path)?);

    if config.include_metadata {
        if let Some(metadata) = &config.metadata {
            write_metadata_header(&mut writer, metadata)?;
        }
    }
    Ok(writer)
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export a 1D profile as `position, theta`
///
/// # Errors
///
/// - Empty data or mismatched lengths ([`CsvError::InvalidData`])
/// - NaN or Inf values ([`CsvError::InvalidData`])
/// - File creation errors ([`CsvError::Io`])
pub fn export_profile_csv(
    positions: &[f64],
    values: &[f64],
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {

    // ============================= Validation =============================

    if positions.is_empty() || values.is_empty() {
        return Err(CsvError::InvalidData("profile must not be empty".to_string()));
    }
    if positions.len() != values.len() {
        return Err(CsvError::InvalidData(format!(
            "{} positions versus {} values",
            positions.len(),
            values.len()
        )));
    }
    check_finite(positions, "positions")?;
    check_finite(values, "profile")?;

    // ============================= Write ==================================

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);
    let mut file = create(output_path, configuration)?;

    writeln!(
        file,
        "{}{}{}",
        configuration.position_header, configuration.delimiter, configuration.value_header
    )?;

    for (x, theta) in positions.iter().zip(values) {
        writeln!(
            file,
            "{}{}{}",
            format_number(*x, configuration),
            configuration.delimiter,
            format_number(*theta, configuration)
        )?;
    }

    file.flush()?;
    Ok(())
}

/// Export a 2D field as `x, y, theta`, one row per node, `x` varying fastest
pub fn export_field_csv(
    grid: &Grid2D,
    field: &DMatrix<f64>,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    if field.shape() != grid.shape() {
        return Err(CsvError::InvalidData(format!(
            "field is {}x{} but the grid has {}x{} nodes",
            field.nrows(),
            field.ncols(),
            grid.shape().0,
            grid.shape().1
        )));
    }
    check_finite(field.as_slice(), "field")?;

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);
    let mut file = create(output_path, configuration)?;
    let d = configuration.delimiter;

    writeln!(file, "x{}y{}{}", d, d, configuration.value_header)?;

    for j in 0..field.ncols() {
        for i in 0..field.nrows() {
            writeln!(
                file,
                "{}{}{}{}{}",
                format_number(grid.x(i), configuration),
                d,
                format_number(grid.y(j), configuration),
                d,
                format_number(field[(i, j)], configuration)
            )?;
        }
    }

    file.flush()?;
    Ok(())
}

/// Export a binned radial profile as `r, theta, count`
///
/// Bins that hold no value yet (NaN) are skipped.
pub fn export_radial_csv(
    profile: &RadialProfile,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    if profile.is_empty() {
        return Err(CsvError::InvalidData("radial profile must not be empty".to_string()));
    }

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);
    let mut file = create(output_path, configuration)?;
    let d = configuration.delimiter;

    writeln!(file, "r{}{}{}count", d, configuration.value_header, d)?;

    for ((r, theta), count) in profile.radii.iter().zip(&profile.values).zip(&profile.counts) {
        if theta.is_nan() {
            continue;
        }
        writeln!(
            file,
            "{}{}{}{}{}",
            format_number(*r, configuration),
            d,
            format_number(*theta, configuration),
            d,
            count
        )?;
    }

    file.flush()?;
    Ok(())
}

/// Export per-step convergence as `step, time, passes, residual, status`
pub fn export_reports_csv(
    reports: &[StepReport],
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    if reports.is_empty() {
        return Err(CsvError::InvalidData("no step reports to export".to_string()));
    }

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);
    let mut file = create(output_path, configuration)?;
    let d = configuration.delimiter;

    writeln!(file, "step{}time{}passes{}residual{}status", d, d, d, d)?;

    for report in reports {
        let status = match report.status {
            ConvergenceStatus::Converged { .. } => "converged",
            ConvergenceStatus::Exhausted { .. } => "exhausted",
            ConvergenceStatus::SolveFailed { .. } => "solve_failed",
        };
        writeln!(
            file,
            "{}{}{}{}{}{}{:e}{}{}",
            report.step,
            d,
            format_number(report.time, configuration),
            d,
            report.status.iterations(),
            d,
            report.status.residual(),
            d,
            status
        )?;
    }

    file.flush()?;
    Ok(())
}

// =============================================================================
// Exporter
// =============================================================================

/// [`Exporter`] writing CSV files
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Configuration for `result`: metadata from the run is added when the
    /// exporter was asked for metadata but given none.
    fn config_for(&self, result: &SimulationResult) -> CsvConfig {
        let mut config = self.config.clone();
        if config.include_metadata && config.metadata.is_none() {
            config.metadata = Some(CsvMetadata::from_result(result));
        }
        config
    }

    fn export_field(
        &self,
        domain: &Domain,
        field: &FieldData,
        path: &str,
        config: &CsvConfig,
    ) -> Result<(), CsvError> {
        match (domain, field) {
            (Domain::Line(grid), FieldData::Vector(values)) => {
                export_profile_csv(&grid.positions(), values.as_slice(), path, Some(config))
            }
            (Domain::Plane(grid), FieldData::Matrix(values)) => {
                export_field_csv(grid, values, path, Some(config))
            }
            _ => Err(CsvError::InvalidData(format!(
                "{}D field does not match the {}D domain",
                field.ndim(),
                domain.ndim()
            ))),
        }
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_final(&self, result: &SimulationResult, path: &str) -> Result<(), CsvError> {
        let config = self.config_for(result);
        self.export_field(&result.domain, &result.final_state, path, &config)
    }

    fn export_trajectory(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), CsvError> {
        if result.is_empty() {
            return Err(CsvError::InvalidData("result holds no snapshots".to_string()));
        }
        for snapshot in &result.trajectory {
            check_finite(snapshot.as_slice(), "trajectory")?;
        }

        let config = self.config_for(result);
        let d = config.delimiter;
        let indices = downsample_indices(result.len(), n_points);
        let mut file = create(path, &config)?;

        match result.domain {
            Domain::Line(grid) => {
                write!(file, "{}", config.position_header)?;
                for &k in &indices {
                    write!(
                        file,
                        "{}{}(t={})",
                        d,
                        config.value_header,
                        format_number(result.time_points[k], &config)
                    )?;
                }
                writeln!(file)?;

                for (node, x) in grid.positions().iter().enumerate() {
                    write!(file, "{}", format_number(*x, &config))?;
                    for &k in &indices {
                        let value = result.trajectory[k].as_slice()[node];
                        write!(file, "{}{}", d, format_number(value, &config))?;
                    }
                    writeln!(file)?;
                }
            }
            Domain::Plane(grid) => {
                writeln!(file, "time{}x{}y{}{}", d, d, d, config.value_header)?;

                for &k in &indices {
                    let time = format_number(result.time_points[k], &config);
                    let field = result.trajectory[k].try_as_matrix().ok_or_else(|| {
                        CsvError::InvalidData("2D result holds a non-matrix snapshot".to_string())
                    })?;

                    for j in 0..field.ncols() {
                        for i in 0..field.nrows() {
                            writeln!(
                                file,
                                "{}{}{}{}{}{}{}",
                                time,
                                d,
                                format_number(grid.x(i), &config),
                                d,
                                format_number(grid.y(j), &config),
                                d,
                                format_number(field[(i, j)], &config)
                            )?;
                        }
                    }
                }
            }
        }

        file.flush()?;
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
