//! Per-step hooks for the simulation loop.

use std::ops::ControlFlow;

use crate::config::ModelSetup;
use crate::mesh::Grid2D;
use crate::solver::GridState;

/// What an observer sees after each step.
#[derive(Clone, Copy, Debug)]
pub struct StepInfo<'a> {
    /// Number of steps taken so far; 0 for the initial state
    pub step: usize,
    /// Simulated time, `step · dt` (s)
    pub time: f64,
    /// State at `time`
    pub state: &'a GridState,
    /// Model being integrated
    pub model: &'a ModelSetup,
}

impl<'a> StepInfo<'a> {
    /// Grid the state lives on.
    pub fn grid(&self) -> &'a Grid2D {
        self.model.grid()
    }

    /// Σ η over the grid.
    ///
    /// Computed on demand; observers that do not need it pay nothing.
    pub fn total_mass(&self) -> f64 {
        self.state.total_mass()
    }

    /// Simulated time in hours.
    pub fn time_hours(&self) -> f64 {
        self.time / 3600.0
    }
}

/// Receives the state after every step of [`Simulation::run_with_observers`].
///
/// Returning [`ControlFlow::Break`] ends the run after the current step.
/// Plain closures taking `&StepInfo` implement this trait and never stop
/// the run.
///
/// [`Simulation::run_with_observers`]: super::Simulation::run_with_observers
pub trait StepObserver {
    /// Called at the start of every run with the state before its first step.
    ///
    /// A resumed run calls this again with the state it resumes from.
    fn start(&mut self, _info: &StepInfo<'_>) {}

    /// Called after every step.
    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()>;

    /// Called once after the last step, including after an early stop.
    fn finish(&mut self, _info: &StepInfo<'_>) {}
}

impl<F> StepObserver for F
where
    F: FnMut(&StepInfo<'_>),
{
    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
        self(info);
        ControlFlow::Continue(())
    }
}
