//! Diagnostics, samplers and stability monitoring.
//!
//! Everything here observes a run without influencing it, except that a
//! [`StabilityMonitor`] may end a run early.
//!
//! - [`GridDiagnostics`], [`DiagnosticsTracker`]: mass, energy and bounds
//! - [`HovmollerSampler`], [`PointSeriesSampler`]: η time series
//! - [`SnapshotRecorder`]: full-state frames
//! - [`ProgressLogger`]: periodic progress through `log`
//! - [`StabilityMonitor`]: blow-up detection
//!
//! All observers implement [`StepObserver`](crate::simulation::StepObserver).

mod diagnostics;
mod samplers;
mod stability;

pub use diagnostics::{DiagnosticsTracker, GridDiagnostics};
pub use samplers::{
    HovmollerSampler, PointSeriesSampler, ProgressLogger, Snapshot, SnapshotRecorder,
};
pub use stability::{StabilityMonitor, StabilityStatus, StabilityThresholds, StabilityWarning};
