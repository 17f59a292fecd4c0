//! Simulation loop.
//!
//! [`Simulation`] owns two state buffers and a flux workspace, advances
//! them with a [`StepIntegrator`](crate::time::StepIntegrator) and hands
//! every new state to a list of [`StepObserver`]s.
//!
//! # Example
//! ```
//! use swe_fd::analysis::{HovmollerSampler, ProgressLogger};
//! use swe_fd::config::ModelConfig;
//! use swe_fd::initial;
//! use swe_fd::simulation::Simulation;
//!
//! let config = ModelConfig::reference().with_resolution(40, 40).with_max_steps(30);
//! let mut sim = Simulation::from_config(&config, initial::reference_state).unwrap();
//!
//! let mut hovmoller = HovmollerSampler::new(10);
//! let mut progress = ProgressLogger::new(10, config.time.max_steps);
//! let result = sim.run_with_observers(&mut [&mut hovmoller, &mut progress]);
//!
//! assert_eq!(result.n_steps, 30);
//! assert_eq!(hovmoller.len(), 4); // t = 0 plus every 10 steps
//! ```

mod observer;
mod runner;

pub use observer::{StepInfo, StepObserver};
pub use runner::{DEFAULT_MAX_STEPS, Simulation, SimulationResult};
