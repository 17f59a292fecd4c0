//! Time integration.

mod step_integrator;

pub use step_integrator::{Execution, StepIntegrator, advance};
