//! Stepper and solver traits, Picard settings and result types
//!
//! # Layers
//!
//! - [`Stepper`]: advances one field by one time step (Picard loop inside)
//! - [`Solver`]: turns a [`Scenario`] and a [`SolverConfiguration`] into a
//!   [`SimulationResult`] by driving a stepper over all time steps
//!
//! # Convergence Reporting
//!
//! Every step returns a [`ConvergenceStatus`]. Whether an exhausted budget
//! or a failed linear solve aborts the run is decided by the
//! [`ConvergencePolicy`], not by the stepper.

use std::collections::HashMap;
use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::physics::FieldData;
use crate::solver::{Domain, Scenario, SolverError};

// =================================================================================================
// Picard Settings
// =================================================================================================

/// Norm used to measure the change between two successive Picard iterates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidualNorm {
    /// `‖θ⁽ᵏ⁺¹⁾ − θ⁽ᵏ⁾‖₂`
    #[default]
    Absolute,

    /// `‖θ⁽ᵏ⁺¹⁾ − θ⁽ᵏ⁾‖₂ / (‖θ⁽ᵏ⁾‖₂ + 1e-12)`
    Relative,
}

impl ResidualNorm {
    /// Distance between `current` and `previous` under this norm.
    ///
    /// # Panics
    ///
    /// Panics when the slices differ in length.
    pub fn measure(&self, current: &[f64], previous: &[f64]) -> f64 {
        assert_eq!(current.len(), previous.len(), "iterates must have the same length");

        let difference = current
            .iter()
            .zip(previous)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();

        match self {
            ResidualNorm::Absolute => difference,
            ResidualNorm::Relative => {
                let scale = previous.iter().map(|x| x * x).sum::<f64>().sqrt();
                difference / (scale + 1e-12)
            }
        }
    }
}

/// Tolerance and pass budget of the Picard fixed point
///
/// # Examples
///
/// ```rust
/// use richards_rs::solver::{PicardSettings, ResidualNorm};
///
/// let one_d = PicardSettings::one_dimensional();
/// assert_eq!(one_d.tolerance, 1e-6);
/// assert_eq!(one_d.max_iterations, 20);
///
/// let custom = PicardSettings::new(1e-8, 50).relative();
/// assert_eq!(custom.norm, ResidualNorm::Relative);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PicardSettings {
    /// Stop once the residual drops below this value
    pub tolerance: f64,

    /// Pass budget per time step
    pub max_iterations: usize,

    pub norm: ResidualNorm,
}

impl PicardSettings {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self { tolerance, max_iterations, norm: ResidualNorm::Absolute }
    }

    /// 1D defaults: `1e-6`, 20 passes, absolute norm
    pub fn one_dimensional() -> Self {
        Self::new(1e-6, 20)
    }

    /// 2D defaults: `1e-4`, 15 passes, absolute norm
    pub fn two_dimensional() -> Self {
        Self::new(1e-4, 15)
    }

    /// Builder pattern: switch to the relative norm
    pub fn relative(mut self) -> Self {
        self.norm = ResidualNorm::Relative;
        self
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidConfiguration(format!(
                "Picard tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfiguration(
                "Picard pass budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PicardSettings {
    fn default() -> Self {
        Self::one_dimensional()
    }
}

// =================================================================================================
// Convergence
// =================================================================================================

/// What the driver does with a step that did not converge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergencePolicy {
    /// Accept the last iterate and log a warning
    #[default]
    Lenient,

    /// Abort the run with [`SolverError::NonConvergence`] or
    /// [`SolverError::SolveFailed`]
    Strict,
}

/// Outcome of the Picard loop of one time step
#[derive(Debug, Clone, PartialEq)]
pub enum ConvergenceStatus {
    /// Residual dropped below tolerance after `iterations` passes
    Converged { iterations: usize, residual: f64 },

    /// Pass budget used up; `residual` is the last one measured
    Exhausted { iterations: usize, residual: f64 },

    /// A pass was abandoned on a failed linear solve. The field is the last
    /// completed iterate; `iterations` counts completed passes and
    /// `residual` is NaN when none completed.
    SolveFailed {
        iterations: usize,
        residual: f64,
        error: SolverError,
    },
}

impl ConvergenceStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceStatus::Converged { .. })
    }

    /// Completed Picard passes
    pub fn iterations(&self) -> usize {
        match self {
            ConvergenceStatus::Converged { iterations, .. }
            | ConvergenceStatus::Exhausted { iterations, .. }
            | ConvergenceStatus::SolveFailed { iterations, .. } => *iterations,
        }
    }

    /// Last measured residual
    pub fn residual(&self) -> f64 {
        match self {
            ConvergenceStatus::Converged { residual, .. }
            | ConvergenceStatus::Exhausted { residual, .. }
            | ConvergenceStatus::SolveFailed { residual, .. } => *residual,
        }
    }
}

impl fmt::Display for ConvergenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceStatus::Converged { iterations, residual } => {
                write!(f, "converged in {} passes (residual {:.3e})", iterations, residual)
            }
            ConvergenceStatus::Exhausted { iterations, residual } => {
                write!(f, "exhausted after {} passes (residual {:.3e})", iterations, residual)
            }
            ConvergenceStatus::SolveFailed { iterations, error, .. } => {
                write!(f, "solve failed after {} passes: {}", iterations, error)
            }
        }
    }
}

// =================================================================================================
// Stepper
// =================================================================================================

/// Nodal field a stepper can advance (1D vector or 2D matrix)
pub trait NodalField: Clone + Send + Sync {
    /// All nodal values, boundaries included
    fn nodes(&self) -> &[f64];

    fn into_data(self) -> FieldData;
}

impl NodalField for DVector<f64> {
    fn nodes(&self) -> &[f64] {
        self.as_slice()
    }

    fn into_data(self) -> FieldData {
        FieldData::Vector(self)
    }
}

impl NodalField for DMatrix<f64> {
    fn nodes(&self) -> &[f64] {
        self.as_slice()
    }

    fn into_data(self) -> FieldData {
        FieldData::Matrix(self)
    }
}

/// Result of one time step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome<F> {
    /// Field at the new time level
    pub field: F,

    pub status: ConvergenceStatus,

    /// Residual of every completed pass, in order
    pub residuals: Vec<f64>,
}

/// One-step advance of a nodal field under a fixed time step
///
/// Implementations hold the grid, model, boundaries and `dt`; the old
/// level is read-only input and the new level is returned by value.
pub trait Stepper {
    type Field: NodalField;

    fn step(&self, old: &Self::Field) -> StepOutcome<Self::Field>;

    /// Unknowns solved per direction sweep
    fn unknowns(&self) -> usize;

    /// Tridiagonal solves per Picard pass
    fn lines_per_pass(&self) -> usize;

    /// Direction sweeps per Picard pass
    fn sweeps_per_pass(&self) -> usize {
        1
    }

    fn name(&self) -> &str;
}

// =================================================================================================
// Solver Configuration
// =================================================================================================

/// Configuration for a time-integration run
///
/// # Examples
///
/// ```rust
/// use richards_rs::solver::{PicardSettings, SolverConfiguration};
///
/// // 200 steps to t = 0.1, stepper defaults for Picard
/// let config = SolverConfiguration::time_evolution(0.1, 200);
/// assert!((config.dt() - 5e-4).abs() < 1e-18);
///
/// // Tighter Picard loop, abort on non-convergence, keep every 50th step
/// let strict = SolverConfiguration::time_evolution(0.1, 200)
///     .with_picard(PicardSettings::new(1e-8, 40))
///     .strict()
///     .with_snapshots(50);
/// assert!(strict.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Final time `T`
    pub total_time: f64,

    /// Number of steps `N`, `dt = T / N`
    pub time_steps: usize,

    /// Picard settings; `None` takes the stepper's defaults
    pub picard: Option<PicardSettings>,

    pub policy: ConvergencePolicy,

    /// Record the field every `k` steps (the final field is always recorded)
    pub snapshot_every: Option<usize>,
}

impl SolverConfiguration {
    /// Create a time evolution configuration
    pub fn time_evolution(total_time: f64, time_steps: usize) -> Self {
        Self {
            total_time,
            time_steps,
            picard: None,
            policy: ConvergencePolicy::Lenient,
            snapshot_every: None,
        }
    }

    /// Builder pattern: override Picard settings
    pub fn with_picard(mut self, settings: PicardSettings) -> Self {
        self.picard = Some(settings);
        self
    }

    /// Builder pattern: abort on exhausted budgets and failed solves
    pub fn strict(mut self) -> Self {
        self.policy = ConvergencePolicy::Strict;
        self
    }

    /// Builder pattern: record the field every `every` steps
    pub fn with_snapshots(mut self, every: usize) -> Self {
        self.snapshot_every = Some(every);
        self
    }

    /// `dt = T / N`
    pub fn dt(&self) -> f64 {
        self.total_time / self.time_steps as f64
    }

    /// Picard settings, falling back to `default`
    pub fn picard_or(&self, default: PicardSettings) -> PicardSettings {
        self.picard.unwrap_or(default)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.total_time.is_finite() && self.total_time > 0.0) {
            return Err(SolverError::InvalidConfiguration(format!(
                "Total time must be positive, got {}",
                self.total_time
            )));
        }
        if self.time_steps == 0 {
            return Err(SolverError::InvalidConfiguration(
                "Time steps must be greater than 0".to_string(),
            ));
        }
        if let Some(settings) = &self.picard {
            settings.validate()?;
        }
        if self.snapshot_every == Some(0) {
            return Err(SolverError::InvalidConfiguration(
                "Snapshot interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =================================================================================================
// Reports
// =================================================================================================

/// Convergence record of one time step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// 1-based step index
    pub step: usize,

    pub time: f64,

    pub status: ConvergenceStatus,

    pub residuals: Vec<f64>,
}

/// Work accounting for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostReport {
    /// Unknowns per direction sweep
    pub unknowns: usize,

    pub time_steps: usize,

    /// Direction sweeps per pass (1 in 1D, 2 for ADI)
    pub sweeps_per_pass: usize,

    /// Completed Picard passes over the whole run
    pub picard_passes: usize,

    /// Tridiagonal solves over the whole run
    pub line_solves: usize,
}

impl CostReport {
    /// Unknown updates performed: `unknowns · sweeps · passes`
    pub fn unknown_updates(&self) -> usize {
        self.unknowns * self.sweeps_per_pass * self.picard_passes
    }

    /// Average Picard passes per time step
    pub fn mean_passes(&self) -> f64 {
        if self.time_steps == 0 {
            0.0
        } else {
            self.picard_passes as f64 / self.time_steps as f64
        }
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} unknowns x {} steps, {} Picard passes ({:.2}/step), {} line solves",
            self.unknowns,
            self.time_steps,
            self.picard_passes,
            self.mean_passes(),
            self.line_solves
        )
    }
}

// =================================================================================================
// Simulation Result
// =================================================================================================

/// Output of a [`Solver`] run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Times of the recorded fields (starts at 0, ends at `T`)
    pub time_points: Vec<f64>,

    /// Recorded fields, aligned with `time_points`
    pub trajectory: Vec<FieldData>,

    /// Field after the last step, same layout as the initial condition
    pub final_state: FieldData,

    pub domain: Domain,

    /// One report per time step
    pub reports: Vec<StepReport>,

    pub cost: CostReport,

    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn new(
        time_points: Vec<f64>,
        trajectory: Vec<FieldData>,
        final_state: FieldData,
        domain: Domain,
    ) -> Self {
        Self {
            time_points,
            trajectory,
            final_state,
            domain,
            reports: Vec::new(),
            cost: CostReport::default(),
            metadata: HashMap::new(),
        }
    }

    /// Number of recorded fields
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// `true` when every step converged within its budget
    pub fn all_converged(&self) -> bool {
        self.reports.iter().all(|report| report.status.is_converged())
    }

    /// Time at the end of the run
    pub fn final_time(&self) -> f64 {
        self.time_points.last().copied().unwrap_or(0.0)
    }
}

// =================================================================================================
// Solver Trait
// =================================================================================================

/// Numerical method solving a [`Scenario`]
pub trait Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SolverError>;

    fn name(&self) -> &str;
}

// =================================================================================================
// Tests
// =================================================================================================
