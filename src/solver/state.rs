//! Prognostic state: velocities and free surface elevation.
//!
//! u is the x-velocity with its last x-line (`i = N_x - 1`) on the eastern
//! wall; v is the y-velocity with its last y-line (`j = N_y - 1`) on the
//! northern wall; η sits at cell centres.

use crate::error::SetupError;
use crate::mesh::Grid2D;
use crate::types::Resolution2D;

use super::Field2D;

/// The triple (u, v, η) at one instant.
///
/// A simulation owns two of these and swaps them after every step.
#[derive(Clone, Debug, PartialEq)]
pub struct GridState {
    /// x-velocity (m/s)
    pub u: Field2D,
    /// y-velocity (m/s)
    pub v: Field2D,
    /// Surface elevation (m)
    pub eta: Field2D,
}

impl GridState {
    /// Fluid at rest with a flat surface.
    pub fn zeros(resolution: Resolution2D) -> Self {
        Self {
            u: Field2D::zeros(resolution),
            v: Field2D::zeros(resolution),
            eta: Field2D::zeros(resolution),
        }
    }

    /// Fluid at rest with the given surface elevation.
    pub fn at_rest(eta: Field2D) -> Self {
        let resolution = eta.resolution();
        Self {
            u: Field2D::zeros(resolution),
            v: Field2D::zeros(resolution),
            eta,
        }
    }

    /// Build a state from caller-supplied fields, checking every shape
    /// against the grid.
    pub fn from_fields(
        u: Field2D,
        v: Field2D,
        eta: Field2D,
        grid: &Grid2D,
    ) -> Result<Self, SetupError> {
        let state = Self { u, v, eta };
        state.ensure_shape(grid.resolution())?;
        Ok(state)
    }

    /// Check all three fields against `expected`.
    pub fn ensure_shape(&self, expected: Resolution2D) -> Result<(), SetupError> {
        self.u.ensure_shape("u", expected)?;
        self.v.ensure_shape("v", expected)?;
        self.eta.ensure_shape("eta", expected)
    }

    /// Shape of the state.
    #[inline]
    pub fn resolution(&self) -> Resolution2D {
        self.eta.resolution()
    }

    /// Zero the wall-normal velocities: u on the eastern line and v on the
    /// northern line.
    pub fn apply_wall_conditions(&mut self) {
        let nx = self.u.nx();
        let ny = self.v.ny();
        self.u.row_mut(nx - 1).fill(0.0);
        for row in self.v.rows_mut() {
            row[ny - 1] = 0.0;
        }
    }

    /// Σ η over all grid points.
    pub fn total_mass(&self) -> f64 {
        self.eta.sum()
    }

    /// Whether every value in every field is finite.
    pub fn is_finite(&self) -> bool {
        self.u.is_finite() && self.v.is_finite() && self.eta.is_finite()
    }

    /// Overwrite this state with `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.u.copy_from(&other.u);
        self.v.copy_from(&other.v);
        self.eta.copy_from(&other.eta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::ShallowWater2D;
    use crate::types::Depth;

    fn grid(nx: usize, ny: usize) -> Grid2D {
        let swe = ShallowWater2D::new(10.0, Depth::new(1.0)).unwrap();
        Grid2D::new(Resolution2D::new(nx, ny), 1.0, 1.0, 1e-3, &swe).unwrap()
    }

    #[test]
    fn test_from_fields_checks_shapes() {
        let g = grid(3, 4);
        let ok = Resolution2D::new(3, 4);
        let bad = Resolution2D::new(4, 3);

        assert!(
            GridState::from_fields(Field2D::zeros(ok), Field2D::zeros(ok), Field2D::zeros(ok), &g)
                .is_ok()
        );

        let err = GridState::from_fields(
            Field2D::zeros(ok),
            Field2D::zeros(bad),
            Field2D::zeros(ok),
            &g,
        )
        .unwrap_err();
        assert_eq!(err, SetupError::shape_mismatch("v", ok, bad));
    }

    #[test]
    fn test_wall_conditions() {
        let res = Resolution2D::new(3, 4);
        let mut state = GridState {
            u: Field2D::filled(res, 1.0),
            v: Field2D::filled(res, 1.0),
            eta: Field2D::zeros(res),
        };
        state.apply_wall_conditions();

        assert!(state.u.row(2).iter().all(|&x| x == 0.0));
        assert!(state.u.row(1).iter().all(|&x| x == 1.0));
        assert!(state.v.column(3).iter().all(|&x| x == 0.0));
        assert!(state.v.column(2).iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_total_mass() {
        let res = Resolution2D::new(2, 2);
        let state = GridState::at_rest(Field2D::filled(res, 0.25));
        assert_eq!(state.total_mass(), 1.0);
        assert!(state.is_finite());
    }
}
