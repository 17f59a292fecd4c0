//! Simulation runner implementation.
//!
//! Owns the double-buffered state and drives [`StepIntegrator`] for a fixed
//! number of steps.

use std::ops::ControlFlow;
use std::time::Instant;

use super::{StepInfo, StepObserver};
use crate::config::{ModelConfig, ModelSetup};
use crate::error::SetupError;
use crate::mesh::Grid2D;
use crate::solver::{FluxWorkspace, GridState};
use crate::time::StepIntegrator;

/// Step count used when none is given.
pub const DEFAULT_MAX_STEPS: usize = 500;

// =============================================================================
// Simulation Result
// =============================================================================

/// Result of a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    /// Steps taken during this run.
    pub n_steps: usize,
    /// Simulated time at the end of the run (s).
    pub final_time: f64,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
    /// Whether an observer ended the run before `max_steps`.
    pub stopped_early: bool,
}

impl SimulationResult {
    /// Throughput of the run.
    pub fn steps_per_second(&self) -> f64 {
        if self.wall_time > 0.0 {
            self.n_steps as f64 / self.wall_time
        } else {
            0.0
        }
    }
}

// =============================================================================
// Simulation Runner
// =============================================================================

/// Fixed-step simulation loop.
///
/// Holds the model, two [`GridState`] buffers and the flux workspace. Each
/// step writes the next state into the spare buffer and swaps, so no state
/// is ever copied.
///
/// # Example
///
/// ```
/// use swe_fd::config::ModelConfig;
/// use swe_fd::initial;
/// use swe_fd::simulation::{Simulation, StepInfo};
///
/// let config = ModelConfig::reference().with_resolution(32, 32).with_max_steps(20);
/// let mut sim = Simulation::from_config(&config, initial::reference_state).unwrap();
///
/// let initial_mass = sim.current().total_mass();
/// let mut last_step = 0;
/// let result = sim.run_with_callback(|info: &StepInfo| last_step = info.step);
///
/// assert_eq!(result.n_steps, 20);
/// assert_eq!(last_step, 20);
/// assert!((sim.current().total_mass() - initial_mass).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Simulation {
    model: ModelSetup,
    integrator: StepIntegrator,
    current: GridState,
    next: GridState,
    workspace: FluxWorkspace,
    step_count: usize,
    max_steps: usize,
}

impl Simulation {
    /// Create a simulation starting from `initial`.
    ///
    /// # Errors
    ///
    /// [`SetupError::ShapeMismatch`] if any field of `initial` does not
    /// match the grid.
    pub fn new(model: ModelSetup, initial: GridState) -> Result<Self, SetupError> {
        model.check_state(&initial)?;
        let resolution = model.grid().resolution();
        Ok(Self {
            next: GridState::zeros(resolution),
            workspace: FluxWorkspace::new(resolution),
            current: initial,
            model,
            integrator: StepIntegrator::default(),
            step_count: 0,
            max_steps: DEFAULT_MAX_STEPS,
        })
    }

    /// Build the model from `config` and the initial state from `initial`.
    ///
    /// `max_steps` is taken from the configuration.
    pub fn from_config<F>(config: &ModelConfig, initial: F) -> Result<Self, SetupError>
    where
        F: FnOnce(&Grid2D) -> GridState,
    {
        let model = config.build()?;
        let state = initial(model.grid());
        Ok(Self::new(model, state)?.with_max_steps(config.time.max_steps))
    }

    /// Set the step count at which [`Self::run`] stops.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Use a different integrator, e.g. [`StepIntegrator::parallel`].
    pub fn with_integrator(mut self, integrator: StepIntegrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Model being integrated.
    pub fn model(&self) -> &ModelSetup {
        &self.model
    }

    /// Grid of the model.
    pub fn grid(&self) -> &Grid2D {
        self.model.grid()
    }

    /// Integrator in use.
    pub fn integrator(&self) -> &StepIntegrator {
        &self.integrator
    }

    /// Steps each call to [`Self::run`] performs.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// State after the last completed step.
    pub fn current(&self) -> &GridState {
        &self.current
    }

    /// Flux buffers of the last completed step.
    pub fn workspace(&self) -> &FluxWorkspace {
        &self.workspace
    }

    /// Steps taken since construction.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Simulated time of [`Self::current`].
    pub fn time(&self) -> f64 {
        self.grid().time_at(self.step_count)
    }

    /// Consume the simulation, returning the current state.
    pub fn into_state(self) -> GridState {
        self.current
    }

    /// Advance one step and return the new step count.
    pub fn step(&mut self) -> usize {
        self.integrator
            .advance(&self.model, &self.current, &mut self.next, &mut self.workspace);
        std::mem::swap(&mut self.current, &mut self.next);
        self.step_count += 1;
        self.step_count
    }

    fn info(&self) -> StepInfo<'_> {
        StepInfo {
            step: self.step_count,
            time: self.time(),
            state: &self.current,
            model: &self.model,
        }
    }

    /// Step until the step count reaches `max_steps`.
    ///
    /// A run that an observer stopped early resumes from its last step;
    /// once the maximum is reached further calls take no steps.
    pub fn run(&mut self) -> SimulationResult {
        self.run_with_observers(&mut [])
    }

    /// Like [`Self::run`], calling `callback` after each step.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> SimulationResult
    where
        F: FnMut(&StepInfo<'_>),
    {
        self.run_with_observers(&mut [&mut callback])
    }

    /// Like [`Self::run`], notifying every observer after each step.
    ///
    /// All observers see every step; the run ends after the step on which
    /// any of them returns [`ControlFlow::Break`].
    pub fn run_with_observers(&mut self, observers: &mut [&mut dyn StepObserver]) -> SimulationResult {
        let start_wall = Instant::now();
        let start_step = self.step_count;

        log::info!(
            "Starting simulation: {} of {} steps on {} grid with {} integrator",
            self.max_steps.saturating_sub(start_step),
            self.max_steps,
            self.grid().resolution(),
            self.integrator.name()
        );
        log::debug!(
            "  t_start = {:.1} s, dt = {:.3} s, courant = {:.3}",
            self.time(),
            self.grid().dt(),
            self.model.courant_number()
        );

        {
            let info = self.info();
            for observer in observers.iter_mut() {
                observer.start(&info);
            }
        }

        let mut stopped_early = false;
        while self.step_count < self.max_steps {
            self.step();

            let info = self.info();
            let mut flow = ControlFlow::Continue(());
            for observer in observers.iter_mut() {
                if observer.observe(&info).is_break() {
                    flow = ControlFlow::Break(());
                }
            }
            if flow.is_break() {
                log::warn!("Simulation stopped by observer at step {}", info.step);
                stopped_early = true;
                break;
            }
        }

        {
            let info = self.info();
            for observer in observers.iter_mut() {
                observer.finish(&info);
            }
        }

        let result = SimulationResult {
            n_steps: self.step_count - start_step,
            final_time: self.time(),
            wall_time: start_wall.elapsed().as_secs_f64(),
            stopped_early,
        };

        log::info!(
            "Simulation complete: {} steps, t = {:.2} h, wall time {:.2} s ({:.0} steps/s)",
            result.n_steps,
            result.final_time / 3600.0,
            result.wall_time,
            result.steps_per_second()
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::HovmollerSampler;
    use crate::equations::ShallowWater2D;
    use crate::initial;
    use crate::source::CoriolisField;
    use crate::types::{Depth, Resolution2D};

    fn small_model() -> ModelSetup {
        let swe = ShallowWater2D::standard(Depth::new(100.0)).unwrap();
        let grid =
            Grid2D::with_cfl_fraction(Resolution2D::new(24, 20), 1.0e6, 1.0e6, 0.1, &swe).unwrap();
        let coriolis = CoriolisField::f_plane(1.0e-4, &grid);
        ModelSetup::new(grid, swe).unwrap().with_coriolis(coriolis).unwrap()
    }

    fn small_simulation(max_steps: usize) -> Simulation {
        let model = small_model();
        let state = initial::reference_state(model.grid());
        Simulation::new(model, state).unwrap().with_max_steps(max_steps)
    }

    struct StopAt(usize);

    impl StepObserver for StopAt {
        fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
            if info.step >= self.0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Option<usize>,
        steps: Vec<usize>,
        finished: Option<usize>,
    }

    impl StepObserver for Recorder {
        fn start(&mut self, info: &StepInfo<'_>) {
            self.started = Some(info.step);
        }

        fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
            self.steps.push(info.step);
            ControlFlow::Continue(())
        }

        fn finish(&mut self, info: &StepInfo<'_>) {
            self.finished = Some(info.step);
        }
    }

    #[test]
    fn test_runs_exactly_max_steps() {
        let mut sim = small_simulation(7);
        let dt = sim.grid().dt();

        let mut seen = Vec::new();
        let result = sim.run_with_callback(|info: &StepInfo| seen.push((info.step, info.time)));

        assert_eq!(result.n_steps, 7);
        assert!(!result.stopped_early);
        assert_eq!(sim.step_count(), 7);
        assert!((result.final_time - 7.0 * dt).abs() < 1e-9);
        assert_eq!(seen.len(), 7);
        for (k, &(step, time)) in seen.iter().enumerate() {
            assert_eq!(step, k + 1);
            assert!((time - step as f64 * dt).abs() < 1e-9);
        }
    }

    #[test]
    fn test_observer_lifecycle() {
        let mut sim = small_simulation(4);
        let mut recorder = Recorder::default();
        sim.run_with_observers(&mut [&mut recorder]);

        assert_eq!(recorder.started, Some(0));
        assert_eq!(recorder.steps, vec![1, 2, 3, 4]);
        assert_eq!(recorder.finished, Some(4));
    }

    #[test]
    fn test_observer_can_stop_run() {
        let mut sim = small_simulation(50);
        let mut stop = StopAt(3);
        let mut recorder = Recorder::default();
        let result = sim.run_with_observers(&mut [&mut stop, &mut recorder]);

        assert!(result.stopped_early);
        assert_eq!(result.n_steps, 3);
        // Every observer still sees the final step
        assert_eq!(recorder.steps, vec![1, 2, 3]);
        assert_eq!(recorder.finished, Some(3));
    }

    #[test]
    fn test_manual_steps_match_run() {
        let mut run = small_simulation(10);
        run.run();

        let mut manual = small_simulation(10);
        for _ in 0..10 {
            manual.step();
        }

        assert_eq!(run.current(), manual.current());
        assert_eq!(run.step_count(), manual.step_count());
    }

    #[test]
    fn test_run_stops_at_max_steps() {
        let mut sim = small_simulation(5);
        sim.run();
        let before = sim.current().clone();

        for _ in 0..2 {
            let result = sim.run();
            assert_eq!(result.n_steps, 0);
            assert!(!result.stopped_early);
        }
        assert_eq!(sim.step_count(), 5);
        assert_eq!(sim.current(), &before);
        assert!((sim.time() - 5.0 * sim.grid().dt()).abs() < 1e-9);
    }

    #[test]
    fn test_raised_limit_continues_from_last_step() {
        let mut sim = small_simulation(5);
        sim.run();
        let mut sim = sim.with_max_steps(8);
        let result = sim.run();

        assert_eq!(result.n_steps, 3);
        assert_eq!(sim.step_count(), 8);

        let mut straight = small_simulation(8);
        straight.run();
        assert_eq!(sim.current(), straight.current());
    }

    #[test]
    fn test_stopped_run_resumes_to_max_steps() {
        let mut sim = small_simulation(6);
        let mut stop = StopAt(2);
        let first = sim.run_with_observers(&mut [&mut stop]);
        assert!(first.stopped_early);
        assert_eq!(first.n_steps, 2);

        let mut recorder = Recorder::default();
        let second = sim.run_with_observers(&mut [&mut recorder]);
        assert!(!second.stopped_early);
        assert_eq!(second.n_steps, 4);
        assert_eq!(recorder.started, Some(2));
        assert_eq!(recorder.steps, vec![3, 4, 5, 6]);
        assert_eq!(recorder.finished, Some(6));
    }

    #[test]
    fn test_resumed_sampler_sees_each_step_once() {
        let mut sim = small_simulation(6);
        let mut hovmoller = HovmollerSampler::new(1);
        let mut stop = StopAt(3);
        sim.run_with_observers(&mut [&mut hovmoller, &mut stop]);
        sim.run_with_observers(&mut [&mut hovmoller]);

        // t = 0 plus steps 1..=6
        assert_eq!(hovmoller.len(), 7);
        let dt = sim.grid().dt();
        for (k, &time) in hovmoller.times().iter().enumerate() {
            assert!((time - k as f64 * dt).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_mismatched_initial_state() {
        let model = small_model();
        let state = GridState::zeros(Resolution2D::new(20, 24));
        let err = Simulation::new(model, state).unwrap_err();
        assert!(matches!(err, SetupError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_config() {
        let config = ModelConfig::reference()
            .with_resolution(16, 16)
            .with_max_steps(3);
        let sim = Simulation::from_config(&config, initial::reference_state).unwrap();
        assert_eq!(sim.max_steps(), 3);
        assert_eq!(sim.step_count(), 0);
        assert_eq!(sim.time(), 0.0);
        assert!(sim.model().coriolis().is_some());
    }

    #[test]
    fn test_result_throughput() {
        let result = SimulationResult {
            n_steps: 100,
            final_time: 10.0,
            wall_time: 2.0,
            stopped_early: false,
        };
        assert!((result.steps_per_second() - 50.0).abs() < 1e-12);

        let instant = SimulationResult {
            wall_time: 0.0,
            ..result
        };
        assert_eq!(instant.steps_per_second(), 0.0);
    }
}
