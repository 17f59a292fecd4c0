//! Observers that record time series and frames during a run.
//!
//! All samplers fire on steps that are multiples of their interval and,
//! except [`ProgressLogger`], also record the state a run starts from.
//! A sampler reused for a resumed run does not record the resume step twice.

use std::ops::ControlFlow;

use crate::simulation::{StepInfo, StepObserver};
use crate::solver::GridState;

/// Surface profile along x at a fixed y-line, sampled over time.
///
/// Stacking the rows gives a Hovmöller (x, t) diagram of η. The line
/// defaults to `j = N_y / 2`.
#[derive(Clone, Debug)]
pub struct HovmollerSampler {
    interval: usize,
    line: Option<usize>,
    times: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl HovmollerSampler {
    /// Sample every `interval` steps (at least 1).
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            line: None,
            times: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Sample the line `j` instead of the middle one.
    pub fn with_line(mut self, j: usize) -> Self {
        self.line = Some(j);
        self
    }

    /// Sample times (s).
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// One η profile of length N_x per sample.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether nothing has been sampled yet.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn record(&mut self, info: &StepInfo<'_>) {
        let eta = &info.state.eta;
        let j = self.line.unwrap_or(eta.ny() / 2).min(eta.ny() - 1);
        self.times.push(info.time);
        self.rows.push(eta.column(j));
    }
}

impl StepObserver for HovmollerSampler {
    fn start(&mut self, info: &StepInfo<'_>) {
        if self.times.last() != Some(&info.time) {
            self.record(info);
        }
    }

    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
        if info.step % self.interval == 0 {
            self.record(info);
        }
        ControlFlow::Continue(())
    }
}

/// η at a single grid point over time.
#[derive(Clone, Debug)]
pub struct PointSeriesSampler {
    interval: usize,
    point: Option<(usize, usize)>,
    times: Vec<f64>,
    values: Vec<f64>,
}

impl PointSeriesSampler {
    /// Sample the grid centre every `interval` steps (at least 1).
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            point: None,
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Sample point `(i, j)` instead of the centre.
    pub fn at(mut self, i: usize, j: usize) -> Self {
        self.point = Some((i, j));
        self
    }

    /// Sample times (s).
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// η values (m).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been sampled yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn record(&mut self, info: &StepInfo<'_>) {
        let eta = &info.state.eta;
        let (i, j) = self.point.unwrap_or((eta.nx() / 2, eta.ny() / 2));
        let (i, j) = (i.min(eta.nx() - 1), j.min(eta.ny() - 1));
        self.times.push(info.time);
        self.values.push(eta[(i, j)]);
    }
}

impl StepObserver for PointSeriesSampler {
    fn start(&mut self, info: &StepInfo<'_>) {
        if self.times.last() != Some(&info.time) {
            self.record(info);
        }
    }

    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
        if info.step % self.interval == 0 {
            self.record(info);
        }
        ControlFlow::Continue(())
    }
}

/// Full copy of the state at one step.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Step index
    pub step: usize,
    /// Simulated time (s)
    pub time: f64,
    /// (u, v, η) at `time`
    pub state: GridState,
}

/// Records full-state snapshots, e.g. as animation frames.
///
/// Each frame is a clone of three N_x × N_y arrays; choose the interval
/// accordingly.
#[derive(Clone, Debug)]
pub struct SnapshotRecorder {
    interval: usize,
    frames: Vec<Snapshot>,
}

impl SnapshotRecorder {
    /// Frame interval of the reference animation.
    pub const REFERENCE_INTERVAL: usize = 20;

    /// Record every `interval` steps (at least 1).
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            frames: Vec::new(),
        }
    }

    /// Recorded frames, oldest first.
    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    /// Take ownership of the frames.
    pub fn into_frames(self) -> Vec<Snapshot> {
        self.frames
    }

    fn record(&mut self, info: &StepInfo<'_>) {
        self.frames.push(Snapshot {
            step: info.step,
            time: info.time,
            state: info.state.clone(),
        });
    }
}

impl StepObserver for SnapshotRecorder {
    fn start(&mut self, info: &StepInfo<'_>) {
        if self.frames.last().is_none_or(|frame| frame.step != info.step) {
            self.record(info);
        }
    }

    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
        if info.step % self.interval == 0 {
            self.record(info);
        }
        ControlFlow::Continue(())
    }
}

/// Logs simulated time, progress and mass every `interval` steps.
#[derive(Clone, Debug)]
pub struct ProgressLogger {
    interval: usize,
    max_steps: usize,
    level: log::Level,
}

impl ProgressLogger {
    /// Report every `interval` steps of a run of `max_steps`.
    pub fn new(interval: usize, max_steps: usize) -> Self {
        Self {
            interval: interval.max(1),
            max_steps,
            level: log::Level::Debug,
        }
    }

    /// Log at `level` instead of `Debug`.
    pub fn with_level(mut self, level: log::Level) -> Self {
        self.level = level;
        self
    }
}

impl StepObserver for ProgressLogger {
    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
        if info.step % self.interval == 0 {
            let pct = if self.max_steps > 0 {
                100.0 * info.step as f64 / self.max_steps as f64
            } else {
                100.0
            };
            log::log!(
                self.level,
                "Time: {:.2} hours ({:.1}%), step {}/{}, mass {:.6e}",
                info.time_hours(),
                pct,
                info.step,
                self.max_steps,
                info.total_mass()
            );
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSetup;
    use crate::equations::ShallowWater2D;
    use crate::mesh::Grid2D;
    use crate::solver::Field2D;
    use crate::types::{Depth, Resolution2D};

    fn model() -> ModelSetup {
        let swe = ShallowWater2D::new(10.0, Depth::new(1.0)).unwrap();
        let grid = Grid2D::new(Resolution2D::new(5, 4), 4.0, 3.0, 0.1, &swe).unwrap();
        ModelSetup::new(grid, swe).unwrap()
    }

    fn ramp(model: &ModelSetup, offset: f64) -> GridState {
        GridState::at_rest(Field2D::from_fn(model.grid().resolution(), |i, j| {
            offset + (10 * i + j) as f64
        }))
    }

    fn feed(observer: &mut dyn StepObserver, model: &ModelSetup, steps: usize) {
        let state = ramp(model, 0.0);
        observer.start(&StepInfo {
            step: 0,
            time: 0.0,
            state: &state,
            model,
        });
        for step in 1..=steps {
            let state = ramp(model, step as f64 * 100.0);
            let _ = observer.observe(&StepInfo {
                step,
                time: model.grid().time_at(step),
                state: &state,
                model,
            });
        }
    }

    #[test]
    fn test_hovmoller_rows() {
        let model = model();
        let mut sampler = HovmollerSampler::new(3);
        feed(&mut sampler, &model, 7);

        // t = 0, steps 3 and 6
        assert_eq!(sampler.len(), 3);
        assert_eq!(sampler.rows()[0], vec![2.0, 12.0, 22.0, 32.0, 42.0]);
        assert_eq!(sampler.rows()[1][0], 302.0);
        assert!((sampler.times()[2] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_hovmoller_custom_line() {
        let model = model();
        let mut sampler = HovmollerSampler::new(1).with_line(0);
        feed(&mut sampler, &model, 1);
        assert_eq!(sampler.rows()[0], vec![0.0, 10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_point_series() {
        let model = model();
        let mut centre = PointSeriesSampler::new(2);
        let mut corner = PointSeriesSampler::new(2).at(4, 3);
        feed(&mut centre, &model, 4);
        feed(&mut corner, &model, 4);

        assert_eq!(centre.values(), &[22.0, 222.0, 422.0]);
        assert_eq!(corner.values(), &[43.0, 243.0, 443.0]);
        assert_eq!(centre.times().len(), 3);
    }

    #[test]
    fn test_snapshots() {
        let model = model();
        let mut recorder = SnapshotRecorder::new(SnapshotRecorder::REFERENCE_INTERVAL);
        feed(&mut recorder, &model, 45);

        let steps: Vec<usize> = recorder.frames().iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![0, 20, 40]);
        assert_eq!(recorder.frames()[1].state.eta[(0, 0)], 2000.0);
    }

    fn resume(observer: &mut dyn StepObserver, model: &ModelSetup, step: usize) {
        let state = ramp(model, step as f64 * 100.0);
        observer.start(&StepInfo {
            step,
            time: model.grid().time_at(step),
            state: &state,
            model,
        });
    }

    #[test]
    fn test_resume_does_not_repeat_last_sample() {
        let model = model();
        let mut hovmoller = HovmollerSampler::new(2);
        let mut series = PointSeriesSampler::new(2);
        let mut frames = SnapshotRecorder::new(2);
        for observer in [
            &mut hovmoller as &mut dyn StepObserver,
            &mut series,
            &mut frames,
        ] {
            feed(observer, &model, 4);
            resume(observer, &model, 4);
        }

        assert_eq!(hovmoller.len(), 3);
        assert_eq!(series.values(), &[22.0, 222.0, 422.0]);
        let steps: Vec<usize> = frames.frames().iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![0, 2, 4]);

        // Resuming from an unsampled step records it as the new start
        resume(&mut frames, &model, 5);
        assert_eq!(frames.frames().len(), 4);
        assert_eq!(frames.frames()[3].step, 5);
    }

    #[test]
    fn test_progress_logger_never_stops() {
        let model = model();
        let state = ramp(&model, 0.0);
        let mut logger = ProgressLogger::new(1, 0).with_level(log::Level::Info);
        let flow = logger.observe(&StepInfo {
            step: 1,
            time: 0.1,
            state: &state,
            model: &model,
        });
        assert!(flow.is_continue());
    }
}
