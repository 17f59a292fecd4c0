//! Validated, immutable model description consumed by the integrator.

use crate::equations::ShallowWater2D;
use crate::error::SetupError;
use crate::mesh::Grid2D;
use crate::solver::GridState;
use crate::source::{CoriolisField, ForcingField};

/// Grid, equation constants and the optional source terms of one run.
///
/// Built once before stepping. Disabled terms are `None`, so the step never
/// branches on a runtime flag inside its loops.
///
/// # Example
///
/// ```
/// use swe_fd::config::ModelSetup;
/// use swe_fd::equations::ShallowWater2D;
/// use swe_fd::mesh::Grid2D;
/// use swe_fd::source::CoriolisField;
/// use swe_fd::types::{Depth, Resolution2D};
///
/// let swe = ShallowWater2D::standard(Depth::new(100.0)).unwrap();
/// let grid = Grid2D::with_cfl_fraction(Resolution2D::new(16, 16), 1e6, 1e6, 0.1, &swe).unwrap();
/// let coriolis = CoriolisField::f_plane(1.0e-4, &grid);
///
/// let model = ModelSetup::new(grid, swe).unwrap().with_coriolis(coriolis).unwrap();
/// assert!(model.coriolis().is_some());
/// assert!(model.forcing().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ModelSetup {
    grid: Grid2D,
    equation: ShallowWater2D,
    coriolis: Option<CoriolisField>,
    forcing: Option<ForcingField>,
}

impl ModelSetup {
    /// Pair a grid with the equation constants.
    ///
    /// The grid's time step is re-checked against this equation's wave
    /// speed, since the grid may have been built for different constants.
    pub fn new(grid: Grid2D, equation: ShallowWater2D) -> Result<Self, SetupError> {
        Grid2D::check_cfl(grid.dt(), grid.min_spacing(), &equation)?;
        Ok(Self {
            grid,
            equation,
            coriolis: None,
            forcing: None,
        })
    }

    /// Enable the Coriolis corrector.
    pub fn with_coriolis(mut self, coriolis: CoriolisField) -> Result<Self, SetupError> {
        if coriolis.len() != self.grid.ny() {
            return Err(SetupError::LengthMismatch {
                field: "coriolis",
                expected: self.grid.ny(),
                actual: coriolis.len(),
            });
        }
        self.coriolis = Some(coriolis);
        Ok(self)
    }

    /// Enable mass source and/or sink.
    pub fn with_forcing(mut self, forcing: ForcingField) -> Result<Self, SetupError> {
        let expected = self.grid.resolution();
        if let Some(source) = forcing.source() {
            source.ensure_shape("source", expected)?;
        }
        if let Some(sink) = forcing.sink() {
            sink.ensure_shape("sink", expected)?;
        }
        self.forcing = Some(forcing);
        Ok(self)
    }

    /// Grid geometry and time step.
    #[inline]
    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    /// Equation constants.
    #[inline]
    pub fn equation(&self) -> &ShallowWater2D {
        &self.equation
    }

    /// Coriolis parameter, if enabled.
    #[inline]
    pub fn coriolis(&self) -> Option<&CoriolisField> {
        self.coriolis.as_ref()
    }

    /// Mass forcing, if enabled.
    #[inline]
    pub fn forcing(&self) -> Option<&ForcingField> {
        self.forcing.as_ref()
    }

    /// Courant number dt·√(gH)/min(dx, dy).
    pub fn courant_number(&self) -> f64 {
        self.grid.courant_number(&self.equation)
    }

    /// Check an initial state against the grid.
    pub fn check_state(&self, state: &GridState) -> Result<(), SetupError> {
        state.ensure_shape(self.grid.resolution())
    }
}
