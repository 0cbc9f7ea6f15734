//! Linear consistency tests
//!
//! With a constant diffusivity the Picard loop collapses to one implicit
//! Euler solve per step and the first sine mode decays at a known rate.
//! These tests compare both steppers against that closed form and check
//! the order of the discretization error.

use approx::assert_relative_eq;

use richards_rs::analysis::{l2_error_1d, l2_error_2d};
use richards_rs::models::analytical::{sine_decay_profile, sine_decay_surface};
use richards_rs::models::{ConstantDiffusivity, InitialProfile, InitialSurface};
use richards_rs::solver::{
    AdiPicardSolver, DirichletBoundaries, Grid1D, Grid2D, ImplicitPicardSolver, PicardSettings,
    Scenario, Solver, SolverConfiguration,
};

const D0: f64 = 0.01;

fn sine_error_1d(interior: usize, total_time: f64, time_steps: usize) -> f64 {
    let grid = Grid1D::new(1.0, interior).unwrap();
    let scenario = Scenario::line(
        Box::new(ConstantDiffusivity::new(D0)),
        grid,
        DirichletBoundaries::zero(),
        &InitialProfile::sine(1.0, 1, 1.0),
    );
    let config = SolverConfiguration::time_evolution(total_time, time_steps);

    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();
    let reference = sine_decay_profile(&grid, total_time, D0, 1.0);

    l2_error_1d(result.final_state.as_vector(), &reference, &grid).unwrap()
}

// =================================================================================================
// 1D
// =================================================================================================

#[test]
fn test_sine_mode_decay_1d() {
    let error = sine_error_1d(50, 0.5, 500);
    assert!(error < 1e-3, "L2 error {:.3e}", error);
}

#[test]
fn test_spatial_error_is_second_order() {
    // Enough steps that the time error stays well below the spatial one
    let coarse = sine_error_1d(10, 0.5, 2000);
    let medium = sine_error_1d(20, 0.5, 2000);
    let fine = sine_error_1d(40, 0.5, 2000);

    assert!(coarse / medium > 3.0, "ratio {:.2}", coarse / medium);
    assert!(medium / fine > 3.0, "ratio {:.2}", medium / fine);
}

#[test]
fn test_time_error_is_first_order() {
    // Fine grid, coarse steps: the time error dominates
    let coarse = sine_error_1d(200, 0.5, 10);
    let fine = sine_error_1d(200, 0.5, 20);

    let ratio = coarse / fine;
    assert!(ratio > 1.8 && ratio < 2.2, "ratio {:.3}", ratio);
}

#[test]
fn test_constant_diffusivity_needs_two_passes() {
    let scenario = Scenario::line(
        Box::new(ConstantDiffusivity::new(D0)),
        Grid1D::new(1.0, 30).unwrap(),
        DirichletBoundaries::zero(),
        &InitialProfile::sine(1.0, 1, 1.0),
    );
    let config = SolverConfiguration::time_evolution(0.1, 25);

    let result = ImplicitPicardSolver::new().solve(&scenario, &config).unwrap();

    // The first pass lands on the answer, the second confirms it
    assert_eq!(result.cost.picard_passes, 50);
    assert_relative_eq!(result.cost.mean_passes(), 2.0);
    assert!(result.all_converged());
}

// =================================================================================================
// 2D
// =================================================================================================

#[test]
fn test_sine_mode_decay_2d() {
    let grid = Grid2D::square(1.0, 20).unwrap();
    let scenario = Scenario::plane(
        Box::new(ConstantDiffusivity::new(D0)),
        grid,
        DirichletBoundaries::zero(),
        &InitialSurface::sine(1.0),
    );
    // The ADI split only reproduces implicit Euler once Picard has converged
    let config = SolverConfiguration::time_evolution(0.1, 100)
        .with_picard(PicardSettings::new(1e-12, 100));

    let result = AdiPicardSolver::new().solve(&scenario, &config).unwrap();
    let reference = sine_decay_surface(&grid, 0.1, D0, 1.0);

    let error = l2_error_2d(result.final_state.as_matrix(), &reference, &grid).unwrap();
    assert!(error < 1e-4, "L2 error {:.3e}", error);
    assert!(result.all_converged());
}

#[test]
fn test_rectangular_sine_mode_decay_2d() {
    let grid = Grid2D::new(2.0, 1.0, 31, 15).unwrap();
    let scenario = Scenario::plane(
        Box::new(ConstantDiffusivity::new(D0)),
        grid,
        DirichletBoundaries::zero(),
        &InitialSurface::sine(0.5),
    );
    let config = SolverConfiguration::time_evolution(0.2, 100)
        .with_picard(PicardSettings::new(1e-12, 100));

    let result = AdiPicardSolver::new().solve(&scenario, &config).unwrap();
    let reference = sine_decay_surface(&grid, 0.2, D0, 0.5);

    let error = l2_error_2d(result.final_state.as_matrix(), &reference, &grid).unwrap();
    assert!(error < 1e-4, "L2 error {:.3e}", error);
}
