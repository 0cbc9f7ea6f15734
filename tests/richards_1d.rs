//! Integration tests for the 1D implicit Picard solver
//!
//! Full runs through `ImplicitPicardSolver`, checked for boundedness, mass
//! balance, symmetry of the pulse and behaviour of the failure policies.

mod common;

use approx::assert_relative_eq;
use common::{gaussian_scenario, within_bounds, LinearDiffusivity, NegativeDiffusivity};

use richards_rs::analysis::{mass_1d, peak_position};
use richards_rs::models::{BrooksCorey, InitialProfile};
use richards_rs::solver::{
    ConvergenceStatus, DirichletBoundaries, Grid1D, ImplicitPicardSolver, PicardSettings, Scenario,
    Solver, SolverConfiguration, SolverError,
};

// =================================================================================================
// Gaussian Pulse
// =================================================================================================

#[test]
fn test_gaussian_pulse_stays_bounded_and_centred() {
    let scenario = gaussian_scenario(0.5, 100, 0.05, 0.8);
    let config = SolverConfiguration::time_evolution(0.1, 200);

    let initial = scenario.initial_vector().unwrap();
    let result = ImplicitPicardSolver::new()
        .solve(&scenario, &config)
        .expect("Gaussian run should succeed");

    let theta = result.final_state.as_vector();
    assert_eq!(theta.len(), 102);
    assert!(within_bounds(theta.as_slice(), 0.0, 0.8, 1e-9));
    assert_eq!(theta[0], 0.0);
    assert_eq!(theta[101], 0.0);

    let grid = Grid1D::new(0.5, 100).unwrap();
    let peak = peak_position(theta, &grid).unwrap();
    assert!((peak - 0.25).abs() <= grid.spacing());

    let before = mass_1d(&initial, &grid).unwrap();
    let after = mass_1d(theta, &grid).unwrap();
    assert!((after - before).abs() / before < 0.05);

    assert!(result.all_converged());
}

#[test]
fn test_nonlinear_spreading_conserves_mass() {
    let grid = Grid1D::new(0.5, 100).unwrap();
    let scenario = Scenario::line(
        Box::new(BrooksCorey::new(0.0, 1.0, 1e-2, 2.0)),
        grid,
        DirichletBoundaries::zero(),
        &InitialProfile::gaussian(0.25, 0.03, 0.8),
    );
    let config = SolverConfiguration::time_evolution(0.1, 200);

    let initial = scenario.initial_vector().unwrap();
    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();
    let theta = result.final_state.as_vector();

    // The peak drops and the flanks two widths out rise
    let flank = ((0.25 - 0.06) / grid.spacing()).round() as usize;
    assert!(theta.max() < initial.max());
    assert!(theta[flank] > initial[flank]);
    assert!(within_bounds(theta.as_slice(), 0.0, 0.8, 1e-9));

    // The pulse never reaches the walls, so mass stays put
    let before = mass_1d(&initial, &grid).unwrap();
    let after = mass_1d(theta, &grid).unwrap();
    assert_relative_eq!(after, before, max_relative = 1e-3);
}

#[test]
fn test_mirror_symmetry_is_preserved() {
    let grid = Grid1D::new(1.0, 81).unwrap();
    let scenario = Scenario::line(
        Box::new(LinearDiffusivity::new(1e-3, 1e-2)),
        grid,
        DirichletBoundaries::line(0.1, 0.1),
        &InitialProfile::plateau(0.4, 0.6, 0.9, 0.1),
    );
    let config = SolverConfiguration::time_evolution(0.2, 50)
        .with_picard(PicardSettings::new(1e-12, 50));

    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();
    let theta = result.final_state.as_vector();
    let n = theta.len();

    for i in 0..n / 2 {
        assert!(
            (theta[i] - theta[n - 1 - i]).abs() < 1e-9,
            "node {} and its mirror differ: {} vs {}",
            i,
            theta[i],
            theta[n - 1 - i]
        );
    }
}

// =================================================================================================
// Picard Behaviour
// =================================================================================================

#[test]
fn test_residuals_never_rise_within_a_step() {
    let scenario = Scenario::line(
        Box::new(BrooksCorey::new(0.0, 1.0, 1e-2, 2.0)),
        Grid1D::new(0.5, 60).unwrap(),
        DirichletBoundaries::zero(),
        &InitialProfile::plateau(0.2, 0.3, 0.8, 0.0),
    );
    let config = SolverConfiguration::time_evolution(0.05, 10)
        .with_picard(PicardSettings::new(1e-8, 60));

    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();

    for report in &result.reports {
        assert!(report.status.is_converged(), "step {} did not converge", report.step);
        assert!(report.residuals.len() >= 2);
        assert!(
            report.residuals.windows(2).all(|w| w[1] <= w[0]),
            "step {}: residuals rose {:?}",
            report.step,
            report.residuals
        );
    }
}

#[test]
fn test_tight_budget_is_exhausted_but_run_continues() {
    let scenario = Scenario::line(
        Box::new(BrooksCorey::new(0.0, 1.0, 1e-2, 2.0)),
        Grid1D::new(0.5, 60).unwrap(),
        DirichletBoundaries::zero(),
        &InitialProfile::plateau(0.2, 0.3, 0.8, 0.0),
    );
    let config = SolverConfiguration::time_evolution(0.05, 10)
        .with_picard(PicardSettings::new(1e-14, 1));

    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();

    assert_eq!(result.reports.len(), 10);
    assert!(!result.all_converged());
    assert_eq!(result.cost.picard_passes, 10);
    assert!(matches!(
        result.reports[0].status,
        ConvergenceStatus::Exhausted { iterations: 1, .. }
    ));
}

#[test]
fn test_tight_budget_fails_under_strict_policy() {
    let scenario = Scenario::line(
        Box::new(BrooksCorey::new(0.0, 1.0, 1e-2, 2.0)),
        Grid1D::new(0.5, 60).unwrap(),
        DirichletBoundaries::zero(),
        &InitialProfile::plateau(0.2, 0.3, 0.8, 0.0),
    );
    let config = SolverConfiguration::time_evolution(0.05, 10)
        .with_picard(PicardSettings::new(1e-14, 1))
        .strict();

    let err = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap_err();
    assert!(matches!(err, SolverError::NonConvergence { step: 1, iterations: 1, .. }));
}

// =================================================================================================
// Singular Systems
// =================================================================================================

fn singular_scenario() -> Scenario {
    // L = 2, one interior node: dx = 1; with dt = 1 and D = −0.5 the only
    // pivot is 1 − 0.5 − 0.5 = 0
    Scenario::line(
        Box::new(NegativeDiffusivity { value: 0.5 }),
        Grid1D::new(2.0, 1).unwrap(),
        DirichletBoundaries::zero(),
        &InitialProfile::uniform(0.3),
    )
}

#[test]
fn test_singular_system_is_reported_under_lenient_policy() {
    let config = SolverConfiguration::time_evolution(1.0, 1);

    let result = ImplicitPicardSolver::new()
        .solve(&singular_scenario(), &config)
        .unwrap();

    match &result.reports[0].status {
        ConvergenceStatus::SolveFailed { iterations, error, .. } => {
            assert_eq!(*iterations, 0);
            assert_eq!(*error, SolverError::SingularSystem { row: 0 });
        }
        other => panic!("expected a failed solve, got {:?}", other),
    }

    // The field is left at the last good iterate
    let theta = result.final_state.as_vector();
    assert_eq!(theta.as_slice(), &[0.0, 0.3, 0.0]);
}

#[test]
fn test_singular_system_fails_under_strict_policy() {
    let config = SolverConfiguration::time_evolution(1.0, 1).strict();

    let err = ImplicitPicardSolver::new()
        .solve(&singular_scenario(), &config)
        .unwrap_err();

    match err {
        SolverError::SolveFailed { step, source } => {
            assert_eq!(step, 1);
            assert_eq!(*source, SolverError::SingularSystem { row: 0 });
        }
        other => panic!("expected SolveFailed, got {:?}", other),
    }
}

// =================================================================================================
// Cylindrical Coordinates
// =================================================================================================

#[test]
fn test_cylindrical_wet_core_spreads_and_conserves_mass() {
    let grid = Grid1D::cylindrical(1.0, 100).unwrap();
    let scenario = Scenario::line(
        Box::new(BrooksCorey::new(0.0, 1.0, 1e-2, 2.0)),
        grid,
        DirichletBoundaries::uniform(1e-4),
        &InitialProfile::step(0.2, 0.9, 1e-4),
    );
    let config = SolverConfiguration::time_evolution(0.05, 100);

    let initial = scenario.initial_vector().unwrap();
    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();
    let theta = result.final_state.as_vector();

    assert!(within_bounds(theta.as_slice(), 1e-4, 0.9, 1e-9));

    // Moisture has moved past the initial front
    let front = (0.2 / grid.spacing()).round() as usize;
    assert!(theta[front + 1] > initial[front + 1]);
    assert!(theta[front - 1] <= initial[front - 1]);

    let before = mass_1d(&initial, &grid).unwrap();
    let after = mass_1d(theta, &grid).unwrap();
    assert_relative_eq!(after, before, max_relative = 1e-2);
}

#[test]
fn test_cylindrical_axis_is_an_unknown() {
    let grid = Grid1D::cylindrical(0.5, 20).unwrap();
    let scenario = Scenario::line(
        Box::new(LinearDiffusivity::new(1e-2, 0.0)),
        grid,
        DirichletBoundaries::uniform(0.0),
        &InitialProfile::uniform(0.5),
    );
    let config = SolverConfiguration::time_evolution(2.0, 40);

    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();
    let theta = result.final_state.as_vector();

    assert_eq!(result.cost.unknowns, 21);
    // Drying from the wall reaches the axis but leaves it the wettest node
    assert!(theta[0] < 0.5);
    assert!(theta[0] > 0.0);
    assert_eq!(argmax_of(theta.as_slice()), 0);
    assert_eq!(theta[21], 0.0);
}

fn argmax_of(values: &[f64]) -> usize {
    richards_rs::analysis::argmax(values).unwrap()
}
