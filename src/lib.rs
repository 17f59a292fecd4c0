//! # swe-fd
//!
//! An explicit finite-difference solver for the 2D shallow water equations
//! on a uniform rectangular grid with rigid walls.
//!
//! This crate provides:
//! - Grid geometry with a CFL check at construction ([`mesh::Grid2D`])
//! - Dense x-major field storage and the (u, v, η) state ([`solver`])
//! - A five-stage explicit step: FTCS momentum, Coriolis corrector,
//!   wall boundaries, first-order upwind mass flux, continuity with
//!   optional source/sink ([`time::StepIntegrator`])
//! - A double-buffered simulation loop with per-step observers
//!   ([`simulation::Simulation`])
//! - Serde-friendly configuration ([`config::ModelConfig`])
//! - Diagnostics, samplers and stability monitoring ([`analysis`])
//!
//! The library performs no I/O apart from `log` records.
//!
//! # Example
//!
//! ```
//! use swe_fd::{ModelConfig, Simulation, initial};
//!
//! let config = ModelConfig::reference().with_resolution(48, 48).with_max_steps(25);
//! let mut sim = Simulation::from_config(&config, initial::reference_state)?;
//!
//! let mass = sim.current().total_mass();
//! sim.run();
//! assert!((sim.current().total_mass() - mass).abs() < 1e-9);
//! # Ok::<(), swe_fd::SetupError>(())
//! ```
//!
//! # Features
//!
//! - `parallel`: run each stage over x-lines on the rayon thread pool
//!   ([`time::StepIntegrator::parallel`]); results are bit-identical to the
//!   serial path.

pub mod analysis;
pub mod config;
pub mod equations;
pub mod error;
pub mod initial;
pub mod mesh;
pub mod simulation;
pub mod solver;
pub mod source;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use analysis::{
    DiagnosticsTracker, GridDiagnostics, HovmollerSampler, PointSeriesSampler, ProgressLogger,
    SnapshotRecorder, StabilityMonitor, StabilityThresholds,
};
pub use config::{ModelConfig, ModelSetup};
pub use equations::{G_STANDARD, ShallowWater2D};
pub use error::SetupError;
pub use mesh::Grid2D;
pub use simulation::{Simulation, SimulationResult, StepInfo, StepObserver};
pub use solver::{Field2D, FluxWorkspace, GridState};
pub use source::{CoriolisField, ForcingField};
pub use time::{Execution, StepIntegrator, advance};
pub use types::{Bounds2D, Depth, Resolution2D};
