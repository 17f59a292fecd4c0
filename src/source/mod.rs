//! Precomputed source terms.
//!
//! - [`CoriolisField`]: Coriolis parameter per grid row (f-plane or β-plane)
//! - [`ForcingField`]: mass source/sink rates added to the continuity update
//!
//! Both are plain data built once at setup; the integrator receives them as
//! `Option`s so a disabled term costs nothing in the step.

mod coriolis;
mod forcing;

pub use coriolis::{CoriolisField, F0_HALF_DAY};
pub use forcing::ForcingField;
