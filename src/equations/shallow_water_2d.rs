//! 2D Shallow Water Equations with linear momentum and nonlinear continuity.
//!
//! du/dt - f·v = -g ∂η/∂x                                   (x-momentum)
//! dv/dt + f·u = -g ∂η/∂y                                   (y-momentum)
//! ∂η/∂t + ∂((η + H)u)/∂x + ∂((η + H)v)/∂y = source - sink  (continuity)
//!
//! where:
//! - u, v = depth-averaged velocities in x and y directions
//! - η = free surface elevation about the resting level
//! - H = resting depth (flat bed)
//! - g = gravitational acceleration
//! - f = Coriolis parameter (f-plane: constant, β-plane: f = f₀ + βy)
//!
//! The Coriolis parameter and the mass forcing live in [`crate::source`];
//! this type only carries the constants every step needs.
//!
//! # Stability
//!
//! Gravity waves travel at c = √(gH). The explicit scheme is stable for
//! dt·c ≤ min(dx, dy).

use crate::error::{SetupError, ensure_positive};
use crate::types::Depth;

/// Standard gravitational acceleration (m/s²).
pub const G_STANDARD: f64 = 9.81;

/// Constants of the shallow water system.
///
/// # Example
///
/// ```
/// use swe_fd::equations::ShallowWater2D;
/// use swe_fd::types::Depth;
///
/// let swe = ShallowWater2D::new(10.0, Depth::new(1.0)).unwrap();
/// assert!((swe.wave_speed() - 10.0_f64.sqrt()).abs() < 1e-14);
///
/// // Courant number of a 0.01 s step on a unit grid
/// assert!(swe.courant_number(0.01, 1.0) < 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShallowWater2D {
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Resting depth H
    pub depth: Depth,
}

impl ShallowWater2D {
    /// Create the equation set, rejecting non-positive constants.
    pub fn new(g: f64, depth: Depth) -> Result<Self, SetupError> {
        ensure_positive("g", g)?;
        ensure_positive("H", depth.meters())?;
        Ok(Self { g, depth })
    }

    /// Standard gravity with the given resting depth.
    pub fn standard(depth: Depth) -> Result<Self, SetupError> {
        Self::new(G_STANDARD, depth)
    }

    /// Gravity wave speed c = √(gH).
    #[inline]
    pub fn wave_speed(&self) -> f64 {
        (self.g * self.depth.meters()).sqrt()
    }

    /// Courant number dt·√(gH)/spacing.
    #[inline]
    pub fn courant_number(&self, dt: f64, min_spacing: f64) -> f64 {
        dt * self.wave_speed() / min_spacing
    }

    /// Largest time step satisfying the CFL bound on the given spacing.
    #[inline]
    pub fn max_stable_dt(&self, min_spacing: f64) -> f64 {
        min_spacing / self.wave_speed()
    }

    /// Rossby deformation radius √(gH)/|f|.
    ///
    /// Returns infinity for f = 0.
    pub fn deformation_radius(&self, f: f64) -> f64 {
        if f == 0.0 {
            f64::INFINITY
        } else {
            self.wave_speed() / f.abs()
        }
    }
}
