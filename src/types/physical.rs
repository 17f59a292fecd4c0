//! Physical quantity newtypes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resting water depth (H), always positive.
///
/// Distance from the undisturbed free surface to the bed. The total
/// water column at a cell is `eta + H`.
///
/// # Example
///
/// ```
/// use swe_fd::types::Depth;
///
/// let h = Depth::new(100.0);
/// assert_eq!(h.meters(), 100.0);
/// assert_eq!(h.total_depth(0.5), 100.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Depth(f64);

impl Depth {
    /// Create a new depth value.
    ///
    /// # Panics
    ///
    /// Debug-panics if depth is negative.
    #[inline]
    pub fn new(meters: f64) -> Self {
        debug_assert!(meters >= 0.0, "Depth must be non-negative, got {}", meters);
        Self(meters)
    }

    /// Create depth without validation.
    #[inline]
    pub const fn new_unchecked(meters: f64) -> Self {
        Self(meters)
    }

    /// Get the depth in meters.
    #[inline]
    pub fn meters(self) -> f64 {
        self.0
    }

    /// Total water column height for a surface elevation `eta`.
    #[inline(always)]
    pub fn total_depth(self, eta: f64) -> f64 {
        eta + self.0
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}m", self.0)
    }
}

impl From<Depth> for f64 {
    #[inline]
    fn from(d: Depth) -> f64 {
        d.0
    }
}
