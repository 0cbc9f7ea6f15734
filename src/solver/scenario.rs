//! Simulation scenario definition
//!
//! A scenario combines a diffusivity model with a domain, Dirichlet
//! boundaries and the field at `t = 0`.
use nalgebra::{DMatrix, DVector};

use crate::models::{InitialProfile, InitialSurface};
use crate::physics::{DiffusivityModel, FieldData};
use crate::solver::{DirichletBoundaries, Domain, Grid1D, Grid2D, SolverError};

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Diffusivity law `D(θ)`
/// - Domain (1D line or 2D plane)
/// - Dirichlet boundary values
/// - Initial field, boundary nodes included
///
/// The same scenario can be solved with different configurations; this is
/// the "WHAT to solve".
///
/// # Examples
///
/// ```rust
/// use richards_rs::models::{BrooksCorey, InitialProfile};
/// use richards_rs::solver::{DirichletBoundaries, Grid1D, Scenario};
///
/// let scenario = Scenario::line(
///     Box::new(BrooksCorey::default()),
///     Grid1D::new(0.5, 100).unwrap(),
///     DirichletBoundaries::zero(),
///     &InitialProfile::gaussian(0.25, 0.05, 0.8),
/// );
///
/// assert!(scenario.validate().is_ok());
/// assert_eq!(scenario.ndim(), 1);
/// ```
pub struct Scenario {
    pub model: Box<dyn DiffusivityModel>,

    pub domain: Domain,

    pub boundaries: DirichletBoundaries,

    /// Field at `t = 0`: vector for [`Domain::Line`], matrix for [`Domain::Plane`]
    pub initial: FieldData,
}

impl Scenario {
    /// Create a scenario from an already sampled initial field
    pub fn new(
        model: Box<dyn DiffusivityModel>,
        domain: Domain,
        boundaries: DirichletBoundaries,
        initial: FieldData,
    ) -> Self {
        Self { model, domain, boundaries, initial }
    }

    /// 1D scenario with `profile` sampled on every node of `grid`
    pub fn line(
        model: Box<dyn DiffusivityModel>,
        grid: Grid1D,
        boundaries: DirichletBoundaries,
        profile: &InitialProfile,
    ) -> Self {
        let initial = FieldData::Vector(profile.sample(&grid));
        Self::new(model, Domain::Line(grid), boundaries, initial)
    }

    /// 2D scenario with `surface` sampled on every node of `grid`
    pub fn plane(
        model: Box<dyn DiffusivityModel>,
        grid: Grid2D,
        boundaries: DirichletBoundaries,
        surface: &InitialSurface,
    ) -> Self {
        let initial = FieldData::Matrix(surface.sample(&grid));
        Self::new(model, Domain::Plane(grid), boundaries, initial)
    }

    /// Check boundaries and the shape and finiteness of the initial field
    pub fn validate(&self) -> Result<(), SolverError> {
        self.boundaries.validate()?;

        let expected = match self.domain {
            Domain::Line(grid) => vec![grid.nodes()],
            Domain::Plane(grid) => {
                let (rows, cols) = grid.shape();
                vec![rows, cols]
            }
        };
        let found = self.initial.shape();

        if found.len() != expected.len() {
            return Err(SolverError::InvalidGeometry(format!(
                "{}D domain needs a {}D initial field, got {}D",
                expected.len(),
                expected.len(),
                found.len()
            )));
        }
        if found != expected {
            return Err(SolverError::DimensionMismatch {
                expected: expected.iter().product(),
                found: found.iter().product(),
            });
        }
        if !self.initial.is_finite() {
            return Err(SolverError::NumericalInstability { step: 0 });
        }

        Ok(())
    }

    /// Initial 1D field with the Dirichlet values written into the end nodes
    pub fn initial_vector(&self) -> Result<DVector<f64>, SolverError> {
        let grid = match self.domain {
            Domain::Line(grid) => grid,
            Domain::Plane(_) => {
                return Err(SolverError::InvalidGeometry(
                    "initial vector requested on a 2D domain".to_string(),
                ));
            }
        };
        let mut field = self
            .initial
            .try_as_vector()
            .cloned()
            .ok_or_else(|| SolverError::InvalidGeometry("initial field is not a vector".to_string()))?;

        self.boundaries.impose_on_vector(&mut field, grid.coordinates());
        Ok(field)
    }

    /// Initial 2D field with the Dirichlet values written into the edges
    pub fn initial_matrix(&self) -> Result<DMatrix<f64>, SolverError> {
        if let Domain::Line(_) = self.domain {
            return Err(SolverError::InvalidGeometry(
                "initial matrix requested on a 1D domain".to_string(),
            ));
        }
        let mut field = self
            .initial
            .try_as_matrix()
            .cloned()
            .ok_or_else(|| SolverError::InvalidGeometry("initial field is not a matrix".to_string()))?;

        self.boundaries.impose_on_matrix(&mut field);
        Ok(field)
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }

    /// Spatial dimension
    pub fn ndim(&self) -> usize {
        self.domain.ndim()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("model", &self.get_model_name())
            .field("domain", &self.domain)
            .field("boundaries", &self.boundaries)
            .field("initial shape", &self.initial.shape())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstantDiffusivity, DropShape};
    use crate::solver::CoordinateSystem;

    fn constant() -> Box<dyn DiffusivityModel> {
        Box::new(ConstantDiffusivity::new(1.0))
    }

    #[test]
    fn test_line_scenario_imposes_ends() {
        let scenario = Scenario::line(
            constant(),
            Grid1D::new(1.0, 4).unwrap(),
            DirichletBoundaries::line(0.2, 0.7),
            &InitialProfile::uniform(0.5),
        );

        let field = scenario.initial_vector().unwrap();
        assert_eq!(field.len(), 6);
        assert_eq!(field[0], 0.2);
        assert_eq!(field[3], 0.5);
        assert_eq!(field[5], 0.7);
        // the stored initial field is left as sampled
        assert_eq!(scenario.initial.as_vector()[0], 0.5);
    }

    #[test]
    fn test_cylindrical_scenario_keeps_axis_value() {
        let grid = Grid1D::with_coordinates(1.0, 4, CoordinateSystem::Cylindrical).unwrap();
        let scenario = Scenario::line(
            constant(),
            grid,
            DirichletBoundaries::line(0.0, 1e-4),
            &InitialProfile::uniform(0.9),
        );

        let field = scenario.initial_vector().unwrap();
        assert_eq!(field[0], 0.9);
        assert_eq!(field[5], 1e-4);
    }

    #[test]
    fn test_plane_scenario_imposes_edges() {
        let grid = Grid2D::square(1.0, 5).unwrap();
        let scenario = Scenario::plane(
            constant(),
            grid,
            DirichletBoundaries::uniform(1e-4),
            &InitialSurface::drop(DropShape::centered_circle(&grid), 0.9, 1e-4),
        );

        assert!(scenario.validate().is_ok());
        let field = scenario.initial_matrix().unwrap();
        assert_eq!(field.shape(), (7, 7));
        assert_eq!(field[(3, 3)], 0.9);
        assert_eq!(field[(0, 3)], 1e-4);
        assert!(scenario.initial_vector().is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_shape() {
        let scenario = Scenario::new(
            constant(),
            Domain::Line(Grid1D::new(1.0, 4).unwrap()),
            DirichletBoundaries::zero(),
            FieldData::uniform_vector(5, 0.0),
        );
        assert_eq!(
            scenario.validate(),
            Err(SolverError::DimensionMismatch { expected: 6, found: 5 })
        );

        let scenario = Scenario::new(
            constant(),
            Domain::Line(Grid1D::new(1.0, 4).unwrap()),
            DirichletBoundaries::zero(),
            FieldData::uniform_matrix(6, 1, 0.0),
        );
        assert!(matches!(scenario.validate(), Err(SolverError::InvalidGeometry(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite_initial_field() {
        let scenario = Scenario::line(
            constant(),
            Grid1D::new(1.0, 3).unwrap(),
            DirichletBoundaries::zero(),
            &InitialProfile::custom(|x| if x > 0.4 && x < 0.6 { f64::NAN } else { 0.0 }),
        );
        assert_eq!(scenario.validate(), Err(SolverError::NumericalInstability { step: 0 }));
    }

    #[test]
    fn test_debug_lists_model() {
        let scenario = Scenario::line(
            constant(),
            Grid1D::new(1.0, 3).unwrap(),
            DirichletBoundaries::zero(),
            &InitialProfile::uniform(0.0),
        );
        assert!(format!("{:?}", scenario).contains("Constant"));
    }
}
