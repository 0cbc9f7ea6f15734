//! 2D alternating-direction implicit stepper with Picard linearization
//!
//! # Splitting
//!
//! Each Picard pass freezes `D` at the current iterate θ⁽ᵏ⁾, evaluates the
//! face diffusivities once and performs two sweeps:
//!
//! ```text
//! X sweep:  (I − dt·Lx) θ½      = θⁿ + dt·Ly θ⁽ᵏ⁾
//! Y sweep:  (I − dt·Ly) θ⁽ᵏ⁺¹⁾  = θⁿ + dt·Lx θ½
//! ```
//!
//! with the conservative operators
//!
//! ```text
//! Lx θ|ᵢⱼ = [D_{i+½,j}(θᵢ₊₁ⱼ − θᵢⱼ) − D_{i−½,j}(θᵢⱼ − θᵢ₋₁ⱼ)] / dx²
//! Ly θ|ᵢⱼ = [D_{i,j+½}(θᵢⱼ₊₁ − θᵢⱼ) − D_{i,j−½}(θᵢⱼ − θᵢⱼ₋₁)] / dy²
//! ```
//!
//! At the Picard fixed point `θ⁽ᵏ⁺¹⁾ = θ½ = θ⁽ᵏ⁾` both sweeps reduce to the
//! backward Euler system `θ − dt(Lx + Ly)θ = θⁿ`.
//!
//! # Line Systems
//!
//! Every X sweep is `Ny` independent tridiagonal systems of size `Nx` (one
//! per grid line `j`), every Y sweep `Nx` systems of size `Ny`. The lines of
//! a sweep share no unknowns, so they are solved in parallel once the sweep
//! exceeds [`parallel_threshold()`](crate::solver::parallel_threshold) and
//! written back in line order.
//!
//! Edge values enter each line system through its right-hand side. After
//! each sweep the Dirichlet edges are re-imposed: x-edges first, then
//! y-edges, so the four corners carry the south and north values.
//!
//! # Storage
//!
//! nalgebra is column-major, so with `(i, j) = (x, y)` the nodes of an
//! X line are contiguous and written back as a column slice.

use nalgebra::DMatrix;

use crate::physics::DiffusivityModel;
use crate::solver::methods::{run_picard, solve_lines};
use crate::solver::{
    x_face_average, y_face_average, DirichletBoundaries, Domain, Grid2D, PicardSettings, Scenario,
    SimulationResult, Solver, SolverConfiguration, SolverError, StepOutcome, Stepper,
    TimeIntegrator, TridiagonalSystem,
};

/// Face diffusivities of one Picard pass
struct Faces {
    /// `(Nx + 1, Ny + 2)`, entry `(i, j)` between nodes `(i, j)` and `(i + 1, j)`
    x: DMatrix<f64>,

    /// `(Nx + 2, Ny + 1)`, entry `(i, j)` between nodes `(i, j)` and `(i, j + 1)`
    y: DMatrix<f64>,
}

// =================================================================================================
// Stepper
// =================================================================================================

/// One-step ADI-Picard advance of a 2D field.
pub struct AdiPicardStepper<'a> {
    model: &'a dyn DiffusivityModel,
    grid: Grid2D,
    boundaries: DirichletBoundaries,
    dt: f64,
    settings: PicardSettings,
}

impl<'a> AdiPicardStepper<'a> {
    /// # Errors
    ///
    /// [`SolverError::InvalidConfiguration`] on a non-positive `dt`, invalid
    /// Picard settings or non-finite edge values.
    pub fn new(
        model: &'a dyn DiffusivityModel,
        grid: Grid2D,
        boundaries: DirichletBoundaries,
        dt: f64,
        settings: PicardSettings,
    ) -> Result<Self, SolverError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SolverError::InvalidConfiguration(format!(
                "time step must be positive, got {}",
                dt
            )));
        }
        settings.validate()?;
        boundaries.validate()?;

        Ok(Self { model, grid, boundaries, dt, settings })
    }

    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn settings(&self) -> &PicardSettings {
        &self.settings
    }

    fn faces(&self, iterate: &DMatrix<f64>) -> Faces {
        let nodal = self.model.evaluate_matrix(iterate);
        Faces {
            x: x_face_average(&nodal),
            y: y_face_average(&nodal),
        }
    }

    /// System of X line `j` (`1 ≤ j ≤ Ny`), explicit y-flux from `explicit`.
    fn x_line(
        &self,
        j: usize,
        old: &DMatrix<f64>,
        explicit: &DMatrix<f64>,
        faces: &Faces,
    ) -> TridiagonalSystem {
        let nx = self.grid.nx();
        let rx = self.dt / (self.grid.dx() * self.grid.dx());
        let ry = self.dt / (self.grid.dy() * self.grid.dy());
        let mut system = TridiagonalSystem::zeros(nx);

        for k in 0..nx {
            let i = k + 1;
            let west = faces.x[(i - 1, j)];
            let east = faces.x[(i, j)];

            let north_flux = faces.y[(i, j)] * (explicit[(i, j + 1)] - explicit[(i, j)]);
            let south_flux = faces.y[(i, j - 1)] * (explicit[(i, j)] - explicit[(i, j - 1)]);

            system.lower[k] = -rx * west;
            system.diagonal[k] = 1.0 + rx * (west + east);
            system.upper[k] = -rx * east;
            system.rhs[k] = old[(i, j)] + ry * (north_flux - south_flux);
        }

        system.rhs[0] += rx * faces.x[(0, j)] * self.boundaries.west;
        system.rhs[nx - 1] += rx * faces.x[(nx, j)] * self.boundaries.east;
        system.lower[0] = 0.0;
        system.upper[nx - 1] = 0.0;

        system
    }

    /// System of Y line `i` (`1 ≤ i ≤ Nx`), explicit x-flux from `explicit`.
    fn y_line(
        &self,
        i: usize,
        old: &DMatrix<f64>,
        explicit: &DMatrix<f64>,
        faces: &Faces,
    ) -> TridiagonalSystem {
        let ny = self.grid.ny();
        let rx = self.dt / (self.grid.dx() * self.grid.dx());
        let ry = self.dt / (self.grid.dy() * self.grid.dy());
        let mut system = TridiagonalSystem::zeros(ny);

        for k in 0..ny {
            let j = k + 1;
            let south = faces.y[(i, j - 1)];
            let north = faces.y[(i, j)];

            let east_flux = faces.x[(i, j)] * (explicit[(i + 1, j)] - explicit[(i, j)]);
            let west_flux = faces.x[(i - 1, j)] * (explicit[(i, j)] - explicit[(i - 1, j)]);

            system.lower[k] = -ry * south;
            system.diagonal[k] = 1.0 + ry * (south + north);
            system.upper[k] = -ry * north;
            system.rhs[k] = old[(i, j)] + rx * (east_flux - west_flux);
        }

        system.rhs[0] += ry * faces.y[(i, 0)] * self.boundaries.south;
        system.rhs[ny - 1] += ry * faces.y[(i, ny)] * self.boundaries.north;
        system.lower[0] = 0.0;
        system.upper[ny - 1] = 0.0;

        system
    }

    /// One Picard pass: X sweep then Y sweep with `D` frozen at `iterate`.
    pub fn picard_pass(
        &self,
        old: &DMatrix<f64>,
        iterate: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, SolverError> {
        let (nx, ny) = (self.grid.nx(), self.grid.ny());
        let work = self.grid.interior_points();
        let faces = self.faces(iterate);

        // ====== X sweep ======

        let lines = solve_lines(ny, work, |k| self.x_line(k + 1, old, iterate, &faces).solve())?;

        let mut half = iterate.clone();
        for (k, line) in lines.iter().enumerate() {
            half.column_mut(k + 1).rows_mut(1, nx).copy_from(line);
        }
        self.boundaries.impose_on_matrix(&mut half);

        // ====== Y sweep ======

        let lines = solve_lines(nx, work, |k| self.y_line(k + 1, old, &half, &faces).solve())?;

        let mut next = half;
        for (k, line) in lines.iter().enumerate() {
            for (m, value) in line.iter().enumerate() {
                next[(k + 1, m + 1)] = *value;
            }
        }
        self.boundaries.impose_on_matrix(&mut next);

        Ok(next)
    }
}

impl Stepper for AdiPicardStepper<'_> {
    type Field = DMatrix<f64>;

    /// # Panics
    ///
    /// Panics when `old` is not `(Nx + 2) × (Ny + 2)`.
    fn step(&self, old: &DMatrix<f64>) -> StepOutcome<DMatrix<f64>> {
        assert_eq!(old.shape(), self.grid.shape(), "field shape does not match the grid");
        run_picard(&self.settings, old, |iterate| self.picard_pass(old, iterate))
    }

    fn unknowns(&self) -> usize {
        self.grid.interior_points()
    }

    fn lines_per_pass(&self) -> usize {
        self.grid.nx() + self.grid.ny()
    }

    fn sweeps_per_pass(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "ADI Picard 2D"
    }
}

// =================================================================================================
// Solver
// =================================================================================================

/// ADI-Picard solver for 2D scenarios
///
/// Uses [`PicardSettings::two_dimensional`] unless the configuration
/// overrides it.
///
/// # Example
///
/// ```rust
/// use richards_rs::models::{BrooksCorey, DropShape, InitialSurface};
/// use richards_rs::solver::{
///     AdiPicardSolver, DirichletBoundaries, Grid2D, Scenario, Solver, SolverConfiguration,
/// };
///
/// let grid = Grid2D::square(1.0, 20).unwrap();
/// let scenario = Scenario::plane(
///     Box::new(BrooksCorey::default()),
///     grid,
///     DirichletBoundaries::uniform(1e-4),
///     &InitialSurface::drop(DropShape::centered_circle(&grid), 0.9, 1e-4),
/// );
///
/// let config = SolverConfiguration::time_evolution(0.01, 5);
/// let result = AdiPicardSolver::new().solve(&scenario, &config).unwrap();
///
/// assert_eq!(result.final_state.shape(), vec![22, 22]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AdiPicardSolver;

impl AdiPicardSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for AdiPicardSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, SolverError> {

        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let grid = match scenario.domain {
            Domain::Plane(grid) => grid,
            Domain::Line(_) => {
                return Err(SolverError::InvalidConfiguration(format!(
                    "{} only supports 2D domains",
                    self.name()
                )));
            }
        };

        // ====== Step 2: Setup ======

        let settings = config.picard_or(PicardSettings::two_dimensional());
        let stepper = AdiPicardStepper::new(
            scenario.model.as_ref(),
            grid,
            scenario.boundaries,
            config.dt(),
            settings,
        )?;
        let initial = scenario.initial_matrix()?;

        // ====== Step 3: Time Integration ======

        let integration = TimeIntegrator::from_configuration(config).run(&stepper, &initial)?;

        // ====== Step 4: Build Result ======

        let mut result = integration.into_result(scenario.domain);

        result.add_metadata("solver", self.name());
        result.add_metadata("model", scenario.get_model_name());
        result.add_metadata("grid", &format!("{}x{}", grid.nx(), grid.ny()));
        result.add_metadata("time steps", &config.time_steps.to_string());
        result.add_metadata("dt", &config.dt().to_string());
        result.add_metadata("total time", &config.total_time.to_string());
        result.add_metadata("picard tolerance", &settings.tolerance.to_string());
        result.add_metadata("picard max iterations", &settings.max_iterations.to_string());

        Ok(result)
    }

    fn name(&self) -> &str {
        "ADI Picard 2D"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
