//! Uniform 2D grid.
//!
//! All three fields (u, v, η) share one N_x × N_y index space. The grid
//! points span the domain edge to edge, so dx = L_x / (N_x - 1) and the
//! point coordinates are x_i = -L_x/2 + i·dx.
//!
//! The time step is part of the grid: it is fixed for the whole run and is
//! validated against the CFL bound exactly once, here.

use std::fmt;

use crate::equations::ShallowWater2D;
use crate::error::{SetupError, ensure_positive};
use crate::types::{Bounds2D, Resolution2D};

/// Immutable grid geometry plus the time step.
///
/// # Example
///
/// ```
/// use swe_fd::equations::ShallowWater2D;
/// use swe_fd::mesh::Grid2D;
/// use swe_fd::types::{Depth, Resolution2D};
///
/// let swe = ShallowWater2D::new(10.0, Depth::new(1.0)).unwrap();
/// let grid = Grid2D::new(Resolution2D::new(4, 4), 3.0, 3.0, 0.03, &swe).unwrap();
///
/// assert_eq!(grid.dx(), 1.0);
/// assert_eq!(grid.x(0), -1.5);
/// assert!(grid.courant_number(&swe) < 0.1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2D {
    resolution: Resolution2D,
    bounds: Bounds2D,
    dx: f64,
    dy: f64,
    dt: f64,
}

impl Grid2D {
    /// Create a grid with a caller-supplied time step.
    ///
    /// # Errors
    ///
    /// - [`SetupError::GridTooSmall`] if either direction has fewer than 2 points
    /// - [`SetupError::NonPositive`] for non-positive lengths or time step
    /// - [`SetupError::CflViolation`] if dt·√(gH) > min(dx, dy)
    pub fn new(
        resolution: Resolution2D,
        lx: f64,
        ly: f64,
        dt: f64,
        equation: &ShallowWater2D,
    ) -> Result<Self, SetupError> {
        let (dx, dy) = Self::spacing(resolution, lx, ly)?;
        ensure_positive("dt", dt)?;

        Self::check_cfl(dt, dx.min(dy), equation)?;

        Ok(Self {
            resolution,
            bounds: Bounds2D::centered(lx, ly),
            dx,
            dy,
            dt,
        })
    }

    /// Create a grid whose time step is a fraction of the CFL limit:
    /// dt = fraction · min(dx, dy) / √(gH).
    ///
    /// The reference configuration uses `fraction = 0.1`.
    pub fn with_cfl_fraction(
        resolution: Resolution2D,
        lx: f64,
        ly: f64,
        fraction: f64,
        equation: &ShallowWater2D,
    ) -> Result<Self, SetupError> {
        let (dx, dy) = Self::spacing(resolution, lx, ly)?;
        ensure_positive("cfl_fraction", fraction)?;
        let dt = fraction * equation.max_stable_dt(dx.min(dy));
        Self::new(resolution, lx, ly, dt, equation)
    }

    /// Reject dt above min_spacing / √(gH); dt equal to the limit passes.
    pub(crate) fn check_cfl(
        dt: f64,
        min_spacing: f64,
        equation: &ShallowWater2D,
    ) -> Result<(), SetupError> {
        let limit = equation.max_stable_dt(min_spacing);
        if dt > limit {
            return Err(SetupError::CflViolation {
                courant: equation.courant_number(dt, min_spacing),
                dt,
                limit,
            });
        }
        Ok(())
    }

    fn spacing(resolution: Resolution2D, lx: f64, ly: f64) -> Result<(f64, f64), SetupError> {
        let (nx, ny) = resolution.as_tuple();
        if nx < 2 || ny < 2 {
            return Err(SetupError::GridTooSmall { nx, ny });
        }
        let lx = ensure_positive("L_x", lx)?;
        let ly = ensure_positive("L_y", ly)?;
        Ok((lx / (nx - 1) as f64, ly / (ny - 1) as f64))
    }

    /// Grid shape.
    #[inline]
    pub fn resolution(&self) -> Resolution2D {
        self.resolution
    }

    /// Number of points in x.
    #[inline]
    pub fn nx(&self) -> usize {
        self.resolution.nx()
    }

    /// Number of points in y.
    #[inline]
    pub fn ny(&self) -> usize {
        self.resolution.ny()
    }

    /// Grid spacing in x (m).
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Grid spacing in y (m).
    #[inline]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Time step (s).
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Smallest grid spacing.
    #[inline]
    pub fn min_spacing(&self) -> f64 {
        self.dx.min(self.dy)
    }

    /// Cell area dx·dy.
    #[inline]
    pub fn cell_area(&self) -> f64 {
        self.dx * self.dy
    }

    /// Physical extent of the domain.
    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    /// Domain length in x.
    #[inline]
    pub fn lx(&self) -> f64 {
        self.bounds.width()
    }

    /// Domain length in y.
    #[inline]
    pub fn ly(&self) -> f64 {
        self.bounds.height()
    }

    /// x-coordinate of column `i`.
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        self.bounds.x_min + i as f64 * self.dx
    }

    /// y-coordinate of row `j`.
    #[inline]
    pub fn y(&self, j: usize) -> f64 {
        self.bounds.y_min + j as f64 * self.dy
    }

    /// All x-coordinates.
    pub fn x_coords(&self) -> Vec<f64> {
        (0..self.nx()).map(|i| self.x(i)).collect()
    }

    /// All y-coordinates.
    pub fn y_coords(&self) -> Vec<f64> {
        (0..self.ny()).map(|j| self.y(j)).collect()
    }

    /// Courant number of this grid for the given equation set.
    pub fn courant_number(&self, equation: &ShallowWater2D) -> f64 {
        equation.courant_number(self.dt, self.min_spacing())
    }

    /// Simulated time after `step` steps.
    #[inline]
    pub fn time_at(&self, step: usize) -> f64 {
        step as f64 * self.dt
    }
}

impl fmt::Display for Grid2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points, dx = {:.2} km, dy = {:.2} km, dt = {:.2} s",
            self.resolution,
            self.dx / 1000.0,
            self.dy / 1000.0,
            self.dt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Depth;

    const TOL: f64 = 1e-12;

    fn swe() -> ShallowWater2D {
        ShallowWater2D::new(10.0, Depth::new(1.0)).unwrap()
    }

    #[test]
    fn test_spacing_and_coordinates() {
        let grid = Grid2D::new(Resolution2D::new(5, 3), 4.0, 2.0, 0.01, &swe()).unwrap();
        assert!((grid.dx() - 1.0).abs() < TOL);
        assert!((grid.dy() - 1.0).abs() < TOL);
        assert_eq!(grid.x_coords(), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(grid.y_coords(), vec![-1.0, 0.0, 1.0]);
        assert!((grid.cell_area() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_cfl_fraction() {
        let grid =
            Grid2D::with_cfl_fraction(Resolution2D::new(4, 4), 3.0, 3.0, 0.1, &swe()).unwrap();
        assert!((grid.dt() - 0.1 / 10.0_f64.sqrt()).abs() < TOL);
        assert!((grid.courant_number(&swe()) - 0.1).abs() < TOL);
    }

    #[test]
    fn test_cfl_violation() {
        let dt = 2.0 * 1.0 / 10.0_f64.sqrt();
        let err = Grid2D::new(Resolution2D::new(4, 4), 3.0, 3.0, dt, &swe()).unwrap_err();
        match err {
            SetupError::CflViolation { courant, limit, .. } => {
                assert!((courant - 2.0).abs() < 1e-9);
                assert!((limit - dt / 2.0).abs() < 1e-12);
            }
            other => panic!("expected CFL violation, got {other:?}"),
        }
    }

    #[test]
    fn test_cfl_limit_is_inclusive() {
        for (g, h) in [(9.81, 100.0), (9.81, 4000.0), (1.0, 1.0), (3.7, 55.5)] {
            let swe = ShallowWater2D::new(g, Depth::new(h)).unwrap();
            for n in 2..400 {
                let res = Resolution2D::new(n, n);
                let grid = Grid2D::with_cfl_fraction(res, 1.0e6, 1.0e6, 1.0, &swe);
                assert!(grid.is_ok(), "limit rejected at n = {n}, g = {g}, H = {h}");

                let limit = swe.max_stable_dt(grid.unwrap().min_spacing());
                let over = Grid2D::new(res, 1.0e6, 1.0e6, limit.next_up(), &swe);
                assert!(matches!(over, Err(SetupError::CflViolation { .. })));
            }
        }
    }

    #[test]
    fn test_too_small() {
        let err = Grid2D::new(Resolution2D::new(1, 4), 1.0, 1.0, 0.01, &swe()).unwrap_err();
        assert_eq!(err, SetupError::GridTooSmall { nx: 1, ny: 4 });
    }

    #[test]
    fn test_non_positive_inputs() {
        let res = Resolution2D::new(4, 4);
        assert!(matches!(
            Grid2D::new(res, -1.0, 1.0, 0.01, &swe()),
            Err(SetupError::NonPositive { name: "L_x", .. })
        ));
        assert!(matches!(
            Grid2D::new(res, 1.0, 1.0, 0.0, &swe()),
            Err(SetupError::NonPositive { name: "dt", .. })
        ));
    }
}
