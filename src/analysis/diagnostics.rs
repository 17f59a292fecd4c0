//! Conservation and bounds diagnostics for a grid state.
//!
//! # Example
//!
//! ```
//! use swe_fd::analysis::GridDiagnostics;
//! use swe_fd::config::ModelConfig;
//! use swe_fd::initial;
//!
//! let model = ModelConfig::reference().with_resolution(32, 32).build().unwrap();
//! let state = initial::reference_state(model.grid());
//!
//! let diag = GridDiagnostics::compute(&state, &model);
//! assert_eq!(diag.kinetic_energy, 0.0);
//! assert!(diag.potential_energy > 0.0);
//! println!("{}", diag.summary_line());
//! ```

use std::ops::ControlFlow;

use crate::config::ModelSetup;
use crate::simulation::{StepInfo, StepObserver};
use crate::solver::GridState;

/// Diagnostic quantities of one state.
///
/// Energies are per unit density and use the linearised forms
/// KE = Σ ½·H·(u² + v²)·dx·dy and PE = Σ ½·g·η²·dx·dy.
#[derive(Clone, Debug, PartialEq)]
pub struct GridDiagnostics {
    /// Σ η, the quantity the scheme conserves exactly
    pub total_mass: f64,
    /// Σ η·dx·dy (m³)
    pub volume: f64,
    /// Kinetic energy
    pub kinetic_energy: f64,
    /// Potential energy
    pub potential_energy: f64,
    /// Kinetic plus potential energy
    pub total_energy: f64,
    /// Maximum √(u² + v²) (m/s)
    pub max_speed: f64,
    /// Range of η (m)
    pub eta_range: (f64, f64),
    /// Courant number dt·√(gH)/min(dx, dy) of the model
    pub courant_number: f64,
}

impl GridDiagnostics {
    /// Compute all diagnostics from `state`.
    pub fn compute(state: &GridState, model: &ModelSetup) -> Self {
        let grid = model.grid();
        let equation = model.equation();
        let area = grid.cell_area();
        let h0 = equation.depth.meters();

        let mut kinetic = 0.0;
        let mut max_speed_sq: f64 = 0.0;
        for (&u, &v) in state.u.as_slice().iter().zip(state.v.as_slice()) {
            let speed_sq = u * u + v * v;
            kinetic += speed_sq;
            max_speed_sq = max_speed_sq.max(speed_sq);
        }
        let kinetic_energy = 0.5 * h0 * kinetic * area;

        let potential: f64 = state.eta.as_slice().iter().map(|e| e * e).sum();
        let potential_energy = 0.5 * equation.g * potential * area;

        let total_mass = state.eta.sum();

        Self {
            total_mass,
            volume: total_mass * area,
            kinetic_energy,
            potential_energy,
            total_energy: kinetic_energy + potential_energy,
            max_speed: max_speed_sq.sqrt(),
            eta_range: state.eta.min_max(),
            courant_number: model.courant_number(),
        }
    }

    /// Largest |η|.
    pub fn max_abs_eta(&self) -> f64 {
        self.eta_range.0.abs().max(self.eta_range.1.abs())
    }

    /// Format diagnostics as a single-line summary.
    pub fn summary_line(&self) -> String {
        format!(
            "M={:.6e} E={:.4e} |u|_max={:.4} eta=[{:.4},{:.4}] CFL={:.3}",
            self.total_mass,
            self.total_energy,
            self.max_speed,
            self.eta_range.0,
            self.eta_range.1,
            self.courant_number
        )
    }

    /// Format diagnostics as detailed multi-line output.
    pub fn detailed(&self) -> String {
        format!(
            "Conservation:\n  Mass:      {:.6e} (volume {:.6e} m³)\n  Energy:    {:.6e} (KE={:.6e}, PE={:.6e})\n\
             Bounds:\n  Surface:   [{:.4}, {:.4}] m\n  Speed:     {:.4} m/s\n\
             Stability:\n  CFL:       {:.4}",
            self.total_mass,
            self.volume,
            self.total_energy,
            self.kinetic_energy,
            self.potential_energy,
            self.eta_range.0,
            self.eta_range.1,
            self.max_speed,
            self.courant_number
        )
    }
}

/// Track diagnostics over a run for monitoring conservation.
///
/// As a [`StepObserver`] it samples every `interval` steps and logs a
/// summary when the run finishes.
#[derive(Clone, Debug)]
pub struct DiagnosticsTracker {
    interval: usize,
    initial: Option<GridDiagnostics>,
    current: Option<GridDiagnostics>,
    current_time: f64,
    n_updates: usize,
    max_speed_seen: f64,
    max_abs_eta_seen: f64,
}

impl DiagnosticsTracker {
    /// Sample every `interval` steps (at least 1).
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            initial: None,
            current: None,
            current_time: 0.0,
            n_updates: 0,
            max_speed_seen: 0.0,
            max_abs_eta_seen: 0.0,
        }
    }

    /// Record diagnostics at `time`. The first update becomes the baseline.
    pub fn update(&mut self, time: f64, diag: GridDiagnostics) {
        self.current_time = time;
        self.n_updates += 1;
        self.max_speed_seen = self.max_speed_seen.max(diag.max_speed);
        self.max_abs_eta_seen = self.max_abs_eta_seen.max(diag.max_abs_eta());
        if self.initial.is_none() {
            self.initial = Some(diag.clone());
        }
        self.current = Some(diag);
    }

    /// Baseline diagnostics.
    pub fn initial(&self) -> Option<&GridDiagnostics> {
        self.initial.as_ref()
    }

    /// Most recent diagnostics.
    pub fn current(&self) -> Option<&GridDiagnostics> {
        self.current.as_ref()
    }

    /// Number of updates recorded.
    pub fn n_updates(&self) -> usize {
        self.n_updates
    }

    /// Largest speed seen so far.
    pub fn max_speed_seen(&self) -> f64 {
        self.max_speed_seen
    }

    /// Mass conservation error.
    ///
    /// Relative to the initial mass, or absolute when the initial mass is
    /// zero (a surface that starts flat).
    pub fn mass_error(&self) -> f64 {
        match (&self.initial, &self.current) {
            (Some(initial), Some(current)) => {
                let diff = (current.total_mass - initial.total_mass).abs();
                if initial.total_mass.abs() > 1e-14 {
                    diff / initial.total_mass.abs()
                } else {
                    diff
                }
            }
            _ => 0.0,
        }
    }

    /// Relative energy change (negative when the scheme dissipates).
    pub fn energy_change(&self) -> f64 {
        match (&self.initial, &self.current) {
            (Some(initial), Some(current)) if initial.total_energy.abs() > 1e-14 => {
                (current.total_energy - initial.total_energy) / initial.total_energy.abs()
            }
            _ => 0.0,
        }
    }

    /// Log a summary of the tracked run.
    pub fn log_summary(&self) {
        log::info!(
            "Diagnostics at t = {:.2} h ({} updates): mass error {:.2e}, energy change {:.2e}",
            self.current_time / 3600.0,
            self.n_updates,
            self.mass_error(),
            self.energy_change()
        );
        log::info!(
            "  Extrema: max |u| = {:.4} m/s, max |eta| = {:.4} m",
            self.max_speed_seen,
            self.max_abs_eta_seen
        );
        if let Some(current) = &self.current {
            log::debug!("{}", current.detailed());
        }
    }
}

impl StepObserver for DiagnosticsTracker {
    fn start(&mut self, info: &StepInfo<'_>) {
        if self.initial.is_none() {
            self.update(info.time, GridDiagnostics::compute(info.state, info.model));
        }
    }

    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
        if info.step % self.interval == 0 {
            let diag = GridDiagnostics::compute(info.state, info.model);
            log::debug!("step {}: {}", info.step, diag.summary_line());
            self.update(info.time, diag);
        }
        ControlFlow::Continue(())
    }

    fn finish(&mut self, _info: &StepInfo<'_>) {
        self.log_summary();
    }
}
