//! Mass source and sink fields for the continuity equation.
//!
//! ∂η/∂t + ∇·((η + H)u) = source - sink
//!
//! Both fields are rates (m/s) on the η grid, fixed for the whole run.

use crate::error::SetupError;
use crate::initial::gaussian;
use crate::mesh::Grid2D;
use crate::solver::Field2D;

/// Optional source and sink rate fields.
///
/// At least one of the two is present; a run without mass forcing simply
/// has no `ForcingField`.
///
/// # Example
///
/// ```
/// use swe_fd::equations::ShallowWater2D;
/// use swe_fd::mesh::Grid2D;
/// use swe_fd::source::ForcingField;
/// use swe_fd::types::{Depth, Resolution2D};
///
/// let swe = ShallowWater2D::standard(Depth::new(100.0)).unwrap();
/// let grid = Grid2D::with_cfl_fraction(Resolution2D::new(32, 32), 1e6, 1e6, 0.1, &swe).unwrap();
///
/// // Source in the north-east corner, drained uniformly everywhere
/// let forcing = ForcingField::reference_balanced(&grid);
/// assert!(forcing.net_rate().abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ForcingField {
    source: Option<Field2D>,
    sink: Option<Field2D>,
}

impl ForcingField {
    /// Source and/or sink, shape-checked against the grid.
    ///
    /// # Errors
    ///
    /// - [`SetupError::MissingForcing`] if both are `None`
    /// - [`SetupError::ShapeMismatch`] if a field does not match the grid
    pub fn new(
        source: Option<Field2D>,
        sink: Option<Field2D>,
        grid: &Grid2D,
    ) -> Result<Self, SetupError> {
        if source.is_none() && sink.is_none() {
            return Err(SetupError::MissingForcing(
                "mass forcing needs a source or a sink field",
            ));
        }
        if let Some(source) = &source {
            source.ensure_shape("source", grid.resolution())?;
        }
        if let Some(sink) = &sink {
            sink.ensure_shape("sink", grid.resolution())?;
        }
        Ok(Self { source, sink })
    }

    /// Source only.
    pub fn source_only(source: Field2D, grid: &Grid2D) -> Result<Self, SetupError> {
        Self::new(Some(source), None, grid)
    }

    /// Sink only.
    pub fn sink_only(sink: Field2D, grid: &Grid2D) -> Result<Self, SetupError> {
        Self::new(None, Some(sink), grid)
    }

    /// Gaussian source of peak 1e-4 m/s and width 100 km centred at
    /// (L_x/2, L_y/2), i.e. on the north-east corner of the domain.
    pub fn reference_source(grid: &Grid2D) -> Field2D {
        gaussian(grid, 1.0e-4, (grid.lx() / 2.0, grid.ly() / 2.0), (1.0e5, 1.0e5))
    }

    /// Uniform sink removing exactly what `source` adds, per unit time.
    pub fn balancing_sink(source: &Field2D) -> Field2D {
        let n = source.resolution().total_points() as f64;
        Field2D::filled(source.resolution(), source.sum() / n)
    }

    /// Reference source together with its balancing sink.
    pub fn reference_balanced(grid: &Grid2D) -> Self {
        let source = Self::reference_source(grid);
        let sink = Self::balancing_sink(&source);
        Self {
            source: Some(source),
            sink: Some(sink),
        }
    }

    /// Source rate field, if enabled.
    #[inline]
    pub fn source(&self) -> Option<&Field2D> {
        self.source.as_ref()
    }

    /// Sink rate field, if enabled.
    #[inline]
    pub fn sink(&self) -> Option<&Field2D> {
        self.sink.as_ref()
    }

    /// Σ source - Σ sink, the change of Σ η per unit time from forcing alone.
    pub fn net_rate(&self) -> f64 {
        self.source.as_ref().map_or(0.0, Field2D::sum) - self.sink.as_ref().map_or(0.0, Field2D::sum)
    }
}
