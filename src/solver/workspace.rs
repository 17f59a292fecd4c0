//! Scratch buffers for the upwind mass flux.

use crate::types::Resolution2D;

use super::Field2D;

/// Per-step scratch storage for the continuity update.
///
/// Allocated once next to the two state buffers; every step overwrites all
/// of it. After a step the contents describe that step's fluxes, which is
/// what the tests inspect.
#[derive(Clone, Debug)]
pub struct FluxWorkspace {
    /// Donor-cell total depth on the east face of each cell
    pub h_e: Field2D,
    /// Donor-cell total depth on the west face of each cell
    pub h_w: Field2D,
    /// Donor-cell total depth on the north face of each cell
    pub h_n: Field2D,
    /// Donor-cell total depth on the south face of each cell
    pub h_s: Field2D,
    /// Net x volume flux out of each cell (east minus west)
    pub uhwe: Field2D,
    /// Net y volume flux out of each cell (north minus south)
    pub vhns: Field2D,
}

impl FluxWorkspace {
    /// Allocate zeroed buffers.
    pub fn new(resolution: Resolution2D) -> Self {
        Self {
            h_e: Field2D::zeros(resolution),
            h_w: Field2D::zeros(resolution),
            h_n: Field2D::zeros(resolution),
            h_s: Field2D::zeros(resolution),
            uhwe: Field2D::zeros(resolution),
            vhns: Field2D::zeros(resolution),
        }
    }

    /// Shape of the buffers.
    #[inline]
    pub fn resolution(&self) -> Resolution2D {
        self.uhwe.resolution()
    }
}
