//! Error types for model setup.
//!
//! Every error here is raised while building a [`ModelSetup`](crate::config::ModelSetup)
//! or a [`Simulation`](crate::simulation::Simulation). Once the time loop is
//! running, stepping is total and cannot fail.

use thiserror::Error;

use crate::types::Resolution2D;

/// Errors detected before the first time step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    /// Fewer than two grid points in a direction.
    #[error("Configuration error: grid needs at least 2 points per direction, got {nx}×{ny}")]
    GridTooSmall { nx: usize, ny: usize },

    /// A physical or numerical constant that must be strictly positive is not.
    #[error("Configuration error: {name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A constant that must be finite is NaN or infinite.
    #[error("Configuration error: {name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    /// A constant outside its admissible interval.
    #[error("Configuration error: {name} = {value} outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The time step breaks the CFL bound dt·√(gH) ≤ min(dx, dy).
    #[error(
        "Configuration error: CFL condition violated, Courant number {courant:.3} > 1 \
         (dt = {dt:.4e} s, largest stable dt = {limit:.4e} s)"
    )]
    CflViolation { courant: f64, dt: f64, limit: f64 },

    /// A forcing term was requested without the data it needs.
    #[error("Configuration error: {0}")]
    MissingForcing(&'static str),

    /// An input array does not match the configured grid.
    #[error("Shape mismatch for {field}: expected {expected}, got {actual}")]
    ShapeMismatch {
        field: &'static str,
        expected: Resolution2D,
        actual: Resolution2D,
    },

    /// A flat buffer whose length cannot be reshaped onto the grid.
    #[error("Length mismatch for {field}: expected {expected} values, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl SetupError {
    /// Create a shape mismatch error.
    pub fn shape_mismatch(
        field: &'static str,
        expected: impl Into<Resolution2D>,
        actual: impl Into<Resolution2D>,
    ) -> Self {
        Self::ShapeMismatch {
            field,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether this is a configuration error (as opposed to an input shape error).
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            Self::ShapeMismatch { .. } | Self::LengthMismatch { .. }
        )
    }
}

/// Check that a constant is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64, SetupError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SetupError::NonPositive { name, value })
    }
}

/// Check that a constant is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64, SetupError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SetupError::NotFinite { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SetupError::GridTooSmall { nx: 1, ny: 4 };
        assert_eq!(
            err.to_string(),
            "Configuration error: grid needs at least 2 points per direction, got 1×4"
        );

        let err = SetupError::shape_mismatch("eta", (4, 4), (3, 4));
        assert_eq!(err.to_string(), "Shape mismatch for eta: expected 4×4, got 3×4");
    }

    #[test]
    fn test_classification() {
        assert!(SetupError::NonPositive { name: "g", value: 0.0 }.is_configuration());
        assert!(
            SetupError::CflViolation {
                courant: 2.0,
                dt: 1.0,
                limit: 0.5
            }
            .is_configuration()
        );
        assert!(!SetupError::shape_mismatch("u", (2, 2), (3, 3)).is_configuration());
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("beta", -2.0e-11), Ok(-2.0e-11));
        assert_eq!(ensure_finite("f0", 0.0), Ok(0.0));
        assert!(matches!(
            ensure_finite("f0", f64::INFINITY),
            Err(SetupError::NotFinite { name: "f0", .. })
        ));
        assert!(ensure_finite("f0", f64::NAN).is_err());
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("g", 9.81), Ok(9.81));
        assert!(ensure_positive("g", 0.0).is_err());
        assert!(ensure_positive("g", -1.0).is_err());
        assert!(ensure_positive("g", f64::NAN).is_err());
        assert!(ensure_positive("g", f64::INFINITY).is_err());
    }
}
