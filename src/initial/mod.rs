//! Initial conditions and static fields.
//!
//! Everything here is evaluated on grid coordinates (x, y) with the domain
//! centred on the origin. These helpers only build arrays; the integrator
//! never calls them.

use crate::mesh::Grid2D;
use crate::solver::{Field2D, GridState};

/// Gaussian `amplitude · exp(-((x-x0)²/(2σx²) + (y-y0)²/(2σy²)))`.
pub fn gaussian(grid: &Grid2D, amplitude: f64, center: (f64, f64), sigma: (f64, f64)) -> Field2D {
    let (x0, y0) = center;
    let (sx, sy) = sigma;
    Field2D::from_fn(grid.resolution(), |i, j| {
        let dx = grid.x(i) - x0;
        let dy = grid.y(j) - y0;
        amplitude * (-(dx * dx / (2.0 * sx * sx) + dy * dy / (2.0 * sy * sy))).exp()
    })
}

/// Unit surface bump of width 50 km at (L_x/2.7, L_y/4).
pub fn reference_bump(grid: &Grid2D) -> Field2D {
    gaussian(
        grid,
        1.0,
        (grid.lx() / 2.7, grid.ly() / 4.0),
        (0.05e6, 0.05e6),
    )
}

/// Bowl-shaped bed `-(x² + y²) / scale`.
///
/// Only used for visualising the surface over a bed; the integrator
/// assumes a flat bed at depth H.
pub fn paraboloid_bed(grid: &Grid2D, scale: f64) -> Field2D {
    Field2D::from_fn(grid.resolution(), |i, j| {
        let x = grid.x(i);
        let y = grid.y(j);
        -(x * x + y * y) / scale
    })
}

/// Bed with the reference curvature scale 5·10¹¹ m.
pub fn reference_bed(grid: &Grid2D) -> Field2D {
    paraboloid_bed(grid, 50.0e10)
}

/// Fluid at rest with the reference bump.
pub fn reference_state(grid: &Grid2D) -> GridState {
    GridState::at_rest(reference_bump(grid))
}
