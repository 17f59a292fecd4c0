//! Grid storage used by the integrator.
//!
//! - [`Field2D`]: one scalar on the grid, x-major
//! - [`GridState`]: u, v and η at one time level
//! - [`FluxWorkspace`]: per-step scratch arrays for face depths and fluxes

mod field;
mod state;
mod workspace;

pub use field::Field2D;
pub use state::GridState;
pub use workspace::FluxWorkspace;
