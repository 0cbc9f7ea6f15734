//! Time-integration driver
//!
//! Runs a [`Stepper`] a fixed number of times, feeding each new level back
//! as the next old level. The driver owns the field for the whole run and
//! hands it to exactly one stepper call at a time.
//!
//! # Per-step Sequence
//!
//! ```text
//! old ──► stepper.step(old) ──► (field, status)
//!                                   │
//!                      policy(status) ── Strict + not converged ──► Err
//!                                   │
//!                      validate_field(field)   (NaN / Inf check)
//!                                   │
//!                      report, snapshot, old = field
//! ```

use crate::solver::{
    validate_field, ConvergencePolicy, ConvergenceStatus, CostReport, Domain, NodalField,
    SimulationResult, SolverConfiguration, SolverError, StepOutcome, StepReport, Stepper,
};

/// Steps between two progress log lines
const PROGRESS_INTERVAL: usize = 100;

/// Fixed-step time loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeIntegrator {
    time_steps: usize,
    dt: f64,
    policy: ConvergencePolicy,
    snapshot_every: Option<usize>,
}

/// Everything a run produced, before conversion to a [`SimulationResult`]
#[derive(Debug, Clone)]
pub struct Integration<F> {
    pub final_state: F,
    pub time_points: Vec<f64>,
    pub snapshots: Vec<F>,
    pub reports: Vec<StepReport>,
    pub cost: CostReport,
}

impl TimeIntegrator {
    /// `time_steps` steps of size `dt`, lenient policy, no intermediate snapshots
    pub fn new(time_steps: usize, dt: f64) -> Self {
        Self {
            time_steps,
            dt,
            policy: ConvergencePolicy::Lenient,
            snapshot_every: None,
        }
    }

    pub fn from_configuration(config: &SolverConfiguration) -> Self {
        Self {
            time_steps: config.time_steps,
            dt: config.dt(),
            policy: config.policy,
            snapshot_every: config.snapshot_every,
        }
    }

    pub fn with_policy(mut self, policy: ConvergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_snapshots(mut self, every: usize) -> Self {
        self.snapshot_every = Some(every);
        self
    }

    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Advance `initial` by all time steps.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidConfiguration`] on a snapshot interval of 0
    /// - [`SolverError::NonConvergence`] / [`SolverError::SolveFailed`]
    ///   under the strict policy
    /// - [`SolverError::NumericalInstability`] when a step produces NaN or Inf
    pub fn run<S: Stepper>(
        &self,
        stepper: &S,
        initial: &S::Field,
    ) -> Result<Integration<S::Field>, SolverError> {
        if self.snapshot_every == Some(0) {
            return Err(SolverError::InvalidConfiguration(
                "Snapshot interval must be at least 1".to_string(),
            ));
        }

        log::info!(
            "{}: {} steps of dt={:e}, {} unknowns",
            stepper.name(),
            self.time_steps,
            self.dt,
            stepper.unknowns()
        );

        let mut state = initial.clone();
        let mut time_points = vec![0.0];
        let mut snapshots = vec![initial.clone()];
        let mut reports = Vec::with_capacity(self.time_steps);

        let mut cost = CostReport {
            unknowns: stepper.unknowns(),
            time_steps: self.time_steps,
            sweeps_per_pass: stepper.sweeps_per_pass(),
            ..CostReport::default()
        };

        for step in 1..=self.time_steps {
            let StepOutcome { field, status, residuals } = stepper.step(&state);

            cost.picard_passes += status.iterations();
            cost.line_solves += status.iterations() * stepper.lines_per_pass();

            self.apply_policy(&status, step)?;
            validate_field(field.nodes(), step)?;
            state = field;

            // t_n = n·dt, computed from the index to avoid accumulating rounding
            let time = step as f64 * self.dt;
            reports.push(StepReport { step, time, status, residuals });

            let on_interval = self.snapshot_every.is_some_and(|every| step % every == 0);
            if on_interval || step == self.time_steps {
                time_points.push(time);
                snapshots.push(state.clone());
            }

            if step % PROGRESS_INTERVAL == 0 {
                log::info!("{}: step {}/{}", stepper.name(), step, self.time_steps);
            }
        }

        log::info!("{}: done, {}", stepper.name(), cost);

        Ok(Integration {
            final_state: state,
            time_points,
            snapshots,
            reports,
            cost,
        })
    }

    fn apply_policy(&self, status: &ConvergenceStatus, step: usize) -> Result<(), SolverError> {
        match (status, self.policy) {
            (ConvergenceStatus::Converged { .. }, _) => Ok(()),

            (ConvergenceStatus::Exhausted { iterations, residual }, ConvergencePolicy::Lenient) => {
                log::warn!(
                    "step {}: Picard budget of {} passes exhausted (residual {:.3e}), keeping last iterate",
                    step,
                    iterations,
                    residual
                );
                Ok(())
            }
            (ConvergenceStatus::Exhausted { iterations, residual }, ConvergencePolicy::Strict) => {
                Err(SolverError::NonConvergence {
                    step,
                    iterations: *iterations,
                    residual: *residual,
                })
            }

            (ConvergenceStatus::SolveFailed { iterations, error, .. }, ConvergencePolicy::Lenient) => {
                log::warn!(
                    "step {}: {} after {} passes, keeping last iterate",
                    step,
                    error,
                    iterations
                );
                Ok(())
            }
            (ConvergenceStatus::SolveFailed { error, .. }, ConvergencePolicy::Strict) => {
                Err(SolverError::SolveFailed { step, source: Box::new(error.clone()) })
            }
        }
    }
}

impl<F: NodalField> Integration<F> {
    /// Convert into a [`SimulationResult`] over `domain`.
    pub fn into_result(self, domain: Domain) -> SimulationResult {
        let trajectory = self.snapshots.into_iter().map(NodalField::into_data).collect();
        let mut result = SimulationResult::new(
            self.time_points,
            trajectory,
            self.final_state.into_data(),
            domain,
        );
        result.reports = self.reports;
        result.cost = self.cost;
        result
    }
}

// =================================================================================================
// Tests
// =================================================================================================
