//! Stability monitoring for the explicit stepper.
//!
//! The scheme has no runtime error path: a run that violates the CFL
//! condition in practice, or starts from an amplitude comparable to the
//! depth, simply blows up. [`StabilityMonitor`] scans the state for
//! non-finite or out-of-range values and can stop the loop when it
//! finds them. It is opt-in; nothing installs it by default.
//!
//! # Example
//!
//! ```
//! use swe_fd::analysis::{StabilityMonitor, StabilityThresholds};
//! use swe_fd::config::ModelConfig;
//! use swe_fd::initial;
//! use swe_fd::simulation::Simulation;
//!
//! let config = ModelConfig::reference().with_resolution(32, 32).with_max_steps(50);
//! let mut sim = Simulation::from_config(&config, initial::reference_state).unwrap();
//!
//! let mut monitor = StabilityMonitor::new(StabilityThresholds::default()).with_interval(10);
//! let result = sim.run_with_observers(&mut [&mut monitor]);
//!
//! assert!(!result.stopped_early);
//! assert_eq!(monitor.total_checks(), 5);
//! ```

use std::fmt;
use std::ops::ControlFlow;

use crate::simulation::{StepInfo, StepObserver};
use crate::solver::{Field2D, GridState};

/// Values above this are treated as blow-up regardless of thresholds.
const BLOW_UP: f64 = 1e6;

/// Thresholds for stability monitoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityThresholds {
    /// Maximum allowed |η| (m).
    pub max_abs_eta: f64,
    /// Maximum allowed √(u² + v²) (m/s).
    pub max_speed: f64,
    /// Consecutive unstable checks before recommending a stop.
    pub max_consecutive_warnings: usize,
}

impl Default for StabilityThresholds {
    fn default() -> Self {
        Self {
            max_abs_eta: 50.0,
            max_speed: 50.0,
            max_consecutive_warnings: 10,
        }
    }
}

impl StabilityThresholds {
    /// Strict thresholds for detecting issues early.
    ///
    /// - max_abs_eta: 10 m
    /// - max_speed: 10 m/s
    /// - max_consecutive_warnings: 3
    pub fn strict() -> Self {
        Self {
            max_abs_eta: 10.0,
            max_speed: 10.0,
            max_consecutive_warnings: 3,
        }
    }

    /// Relaxed thresholds that only catch catastrophic blow-up.
    pub fn relaxed() -> Self {
        Self {
            max_abs_eta: 1.0e4,
            max_speed: 1.0e3,
            max_consecutive_warnings: 100,
        }
    }

    /// Set the |η| threshold.
    pub fn with_max_abs_eta(mut self, max_abs_eta: f64) -> Self {
        self.max_abs_eta = max_abs_eta;
        self
    }

    /// Set the speed threshold.
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set how many consecutive warnings are tolerated.
    pub fn with_max_consecutive_warnings(mut self, n: usize) -> Self {
        self.max_consecutive_warnings = n;
        self
    }
}

/// Types of stability warnings.
///
/// Out-of-range warnings report the worst point only.
#[derive(Debug, Clone, PartialEq)]
pub enum StabilityWarning {
    /// |η| above threshold.
    EtaExceedsMax {
        i: usize,
        j: usize,
        value: f64,
        threshold: f64,
    },
    /// Speed above threshold.
    SpeedExceedsMax {
        i: usize,
        j: usize,
        value: f64,
        threshold: f64,
    },
    /// NaN or infinity in a field.
    NonFiniteValue { field: &'static str, i: usize, j: usize },
    /// Solution has blown up catastrophically.
    SolutionBlowUp,
}

impl fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EtaExceedsMax {
                i,
                j,
                value,
                threshold,
            } => write!(
                f,
                "Surface exceeds max: |eta|={:.3}m > {:.3}m at ({}, {})",
                value, threshold, i, j
            ),
            Self::SpeedExceedsMax {
                i,
                j,
                value,
                threshold,
            } => write!(
                f,
                "Speed exceeds max: |u|={:.3}m/s > {:.3}m/s at ({}, {})",
                value, threshold, i, j
            ),
            Self::NonFiniteValue { field, i, j } => {
                write!(f, "Non-finite {} at ({}, {})", field, i, j)
            }
            Self::SolutionBlowUp => write!(f, "SOLUTION BLOW-UP DETECTED"),
        }
    }
}

/// Result of one stability check.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityStatus {
    /// Range of η over finite values.
    pub eta_range: (f64, f64),
    /// Maximum speed over finite values.
    pub max_speed: f64,
    /// Whether no warning was raised.
    pub is_stable: bool,
    /// Warnings raised by this check.
    pub warnings: Vec<StabilityWarning>,
}

impl StabilityStatus {
    /// Check if any warnings were generated.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if any critical warnings (blow-up, non-finite) were detected.
    pub fn has_critical_warnings(&self) -> bool {
        self.warnings.iter().any(|w| {
            matches!(
                w,
                StabilityWarning::SolutionBlowUp | StabilityWarning::NonFiniteValue { .. }
            )
        })
    }
}

/// Monitor for tracking solution stability.
///
/// Call [`Self::check`] directly, or install it as a [`StepObserver`] to
/// check every `interval` steps and stop the run when
/// [`Self::should_stop`] says so.
#[derive(Debug, Clone)]
pub struct StabilityMonitor {
    thresholds: StabilityThresholds,
    interval: usize,
    consecutive_warnings: usize,
    total_checks: usize,
    total_warnings: usize,
    last_status: Option<StabilityStatus>,
}

impl StabilityMonitor {
    /// Create a monitor checking every step.
    pub fn new(thresholds: StabilityThresholds) -> Self {
        Self {
            thresholds,
            interval: 1,
            consecutive_warnings: 0,
            total_checks: 0,
            total_warnings: 0,
            last_status: None,
        }
    }

    /// Check only every `interval` steps when used as an observer.
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Get the thresholds being used.
    pub fn thresholds(&self) -> &StabilityThresholds {
        &self.thresholds
    }

    /// Get the number of consecutive unstable checks.
    pub fn consecutive_warnings(&self) -> usize {
        self.consecutive_warnings
    }

    /// Get the total number of checks performed.
    pub fn total_checks(&self) -> usize {
        self.total_checks
    }

    /// Get the total number of warnings generated.
    pub fn total_warnings(&self) -> usize {
        self.total_warnings
    }

    /// Get the last stability status.
    pub fn last_status(&self) -> Option<&StabilityStatus> {
        self.last_status.as_ref()
    }

    /// Check the state for stability issues.
    pub fn check(&mut self, state: &GridState) -> StabilityStatus {
        self.total_checks += 1;

        let mut warnings = Vec::new();
        let mut found_blow_up = false;

        for (name, field) in [("u", &state.u), ("v", &state.v), ("eta", &state.eta)] {
            if let Some((i, j)) = field.first_non_finite() {
                warnings.push(StabilityWarning::NonFiniteValue { field: name, i, j });
                found_blow_up = true;
            }
        }

        let (eta_range, worst_eta) = scan_eta(&state.eta);
        let (max_speed, worst_speed) = scan_speed(state);

        if let Some((i, j, value)) = worst_eta
            && value > self.thresholds.max_abs_eta
        {
            warnings.push(StabilityWarning::EtaExceedsMax {
                i,
                j,
                value,
                threshold: self.thresholds.max_abs_eta,
            });
        }
        if let Some((i, j, value)) = worst_speed
            && value > self.thresholds.max_speed
        {
            warnings.push(StabilityWarning::SpeedExceedsMax {
                i,
                j,
                value,
                threshold: self.thresholds.max_speed,
            });
        }

        let max_abs_eta = eta_range.0.abs().max(eta_range.1.abs());
        if found_blow_up || max_abs_eta > BLOW_UP || max_speed > BLOW_UP {
            warnings.push(StabilityWarning::SolutionBlowUp);
        }

        let is_stable = warnings.is_empty();
        if is_stable {
            self.consecutive_warnings = 0;
        } else {
            self.consecutive_warnings += 1;
            self.total_warnings += warnings.len();
        }

        let status = StabilityStatus {
            eta_range,
            max_speed,
            is_stable,
            warnings,
        };

        self.last_status = Some(status.clone());
        status
    }

    /// Check if the simulation should be stopped based on warning history.
    pub fn should_stop(&self) -> bool {
        if self.consecutive_warnings >= self.thresholds.max_consecutive_warnings {
            return true;
        }
        self.last_status
            .as_ref()
            .is_some_and(StabilityStatus::has_critical_warnings)
    }

    /// Get suggested remediation actions based on warnings.
    pub fn suggest_remediation(&self) -> Vec<String> {
        let mut suggestions = Vec::new();

        if let Some(status) = &self.last_status {
            for warning in &status.warnings {
                match warning {
                    StabilityWarning::EtaExceedsMax { .. } => {
                        suggestions.push(
                            "Surface exceeds threshold: check the initial amplitude against the depth H".to_string(),
                        );
                    }
                    StabilityWarning::SpeedExceedsMax { .. } => {
                        suggestions.push(
                            "Speed exceeds threshold: reduce dt or cfl_fraction".to_string(),
                        );
                    }
                    StabilityWarning::NonFiniteValue { .. } | StabilityWarning::SolutionBlowUp => {
                        suggestions.push(
                            "Solution blow-up: reduce dt or cfl_fraction".to_string(),
                        );
                        suggestions.push(
                            "Check that source and sink rates are small compared to H/dt".to_string(),
                        );
                    }
                }
            }
        }

        suggestions.sort();
        suggestions.dedup();
        suggestions
    }

    /// Log a stability report for the last check, if it was unstable.
    pub fn log_report(&self, time: f64, step: usize) {
        let Some(status) = &self.last_status else {
            return;
        };
        if status.is_stable {
            return;
        }

        log::warn!(
            "Stability warning at t={:.2}h, step {}: eta=[{:.3}, {:.3}] m, max |u|={:.3} m/s",
            time / 3600.0,
            step,
            status.eta_range.0,
            status.eta_range.1,
            status.max_speed
        );
        for warning in &status.warnings {
            log::warn!("  - {}", warning);
        }
        if self.should_stop() {
            log::warn!("  Recommendation: stop simulation");
            for suggestion in self.suggest_remediation() {
                log::warn!("    * {}", suggestion);
            }
        }
    }
}

impl StepObserver for StabilityMonitor {
    fn observe(&mut self, info: &StepInfo<'_>) -> ControlFlow<()> {
        if info.step % self.interval != 0 {
            return ControlFlow::Continue(());
        }
        self.check(info.state);
        self.log_report(info.time, info.step);
        if self.should_stop() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// η range over finite values and the point of largest |η|.
fn scan_eta(eta: &Field2D) -> ((f64, f64), Option<(usize, usize, f64)>) {
    let ny = eta.ny();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut worst: Option<(usize, usize, f64)> = None;

    for (k, &e) in eta.as_slice().iter().enumerate() {
        if !e.is_finite() {
            continue;
        }
        min = min.min(e);
        max = max.max(e);
        if worst.is_none_or(|(_, _, w)| e.abs() > w) {
            worst = Some((k / ny, k % ny, e.abs()));
        }
    }
    ((min, max), worst)
}

/// Largest finite speed and where it occurs.
fn scan_speed(state: &GridState) -> (f64, Option<(usize, usize, f64)>) {
    let ny = state.u.ny();
    let mut worst: Option<(usize, usize, f64)> = None;

    for (k, (&u, &v)) in state.u.as_slice().iter().zip(state.v.as_slice()).enumerate() {
        let speed = (u * u + v * v).sqrt();
        if !speed.is_finite() {
            continue;
        }
        if worst.is_none_or(|(_, _, w)| speed > w) {
            worst = Some((k / ny, k % ny, speed));
        }
    }
    (worst.map_or(0.0, |(_, _, s)| s), worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Resolution2D;

    fn make_state(eta: f64, u: f64, v: f64) -> GridState {
        let res = Resolution2D::new(6, 5);
        GridState {
            u: Field2D::filled(res, u),
            v: Field2D::filled(res, v),
            eta: Field2D::filled(res, eta),
        }
    }

    #[test]
    fn test_default_thresholds() {
        let t = StabilityThresholds::default();
        assert!((t.max_abs_eta - 50.0).abs() < 1e-10);
        assert!((t.max_speed - 50.0).abs() < 1e-10);
        assert_eq!(t.max_consecutive_warnings, 10);
    }

    #[test]
    fn test_stable_solution() {
        let state = make_state(0.5, 0.1, -0.1);
        let mut monitor = StabilityMonitor::new(StabilityThresholds::default());

        let status = monitor.check(&state);
        assert!(status.is_stable);
        assert!(status.warnings.is_empty());
        assert_eq!(status.eta_range, (0.5, 0.5));
        assert!(!monitor.should_stop());
    }

    #[test]
    fn test_detect_speed() {
        let mut state = make_state(0.0, 0.0, 0.0);
        state.u[(2, 3)] = 60.0;
        state.v[(2, 3)] = 80.0;
        let mut monitor = StabilityMonitor::new(StabilityThresholds::default());

        let status = monitor.check(&state);
        assert!(!status.is_stable);
        assert_eq!(
            status.warnings,
            vec![StabilityWarning::SpeedExceedsMax {
                i: 2,
                j: 3,
                value: 100.0,
                threshold: 50.0,
            }]
        );
        assert!(!status.has_critical_warnings());
    }

    #[test]
    fn test_detect_eta() {
        let mut state = make_state(0.0, 0.0, 0.0);
        state.eta[(4, 1)] = -75.0;
        let mut monitor = StabilityMonitor::new(StabilityThresholds::default());

        let status = monitor.check(&state);
        assert!(
            status
                .warnings
                .iter()
                .any(|w| matches!(w, StabilityWarning::EtaExceedsMax { i: 4, j: 1, .. }))
        );
    }

    #[test]
    fn test_non_finite_is_critical() {
        let mut state = make_state(0.0, 0.0, 0.0);
        state.eta[(1, 2)] = f64::NAN;
        let mut monitor = StabilityMonitor::new(StabilityThresholds::relaxed());

        let status = monitor.check(&state);
        assert!(status.has_critical_warnings());
        assert!(status.warnings.contains(&StabilityWarning::NonFiniteValue {
            field: "eta",
            i: 1,
            j: 2
        }));
        assert!(status.warnings.contains(&StabilityWarning::SolutionBlowUp));
        assert!(monitor.should_stop());
        assert!(monitor.suggest_remediation().iter().any(|s| s.contains("cfl_fraction")));
    }

    #[test]
    fn test_consecutive_warnings() {
        let bad = make_state(0.0, 20.0, 0.0);
        let good = make_state(0.0, 1.0, 0.0);
        let mut monitor = StabilityMonitor::new(StabilityThresholds::strict());

        monitor.check(&bad);
        monitor.check(&bad);
        assert_eq!(monitor.consecutive_warnings(), 2);
        assert!(!monitor.should_stop());

        monitor.check(&good);
        assert_eq!(monitor.consecutive_warnings(), 0);

        for _ in 0..3 {
            monitor.check(&bad);
        }
        assert!(monitor.should_stop());
        assert_eq!(monitor.total_checks(), 6);
        assert_eq!(monitor.total_warnings(), 5);
    }
}
