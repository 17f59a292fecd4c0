//! Configuration and model assembly.
//!
//! - [`ModelConfig`]: serde-friendly parameters with builder methods
//! - [`ModelSetup`]: the validated grid, constants and source terms

mod model_config;
mod setup;

pub use model_config::{GridConfig, ModelConfig, PhysicsConfig, TermsConfig, TimeConfig};
pub use setup::ModelSetup;
