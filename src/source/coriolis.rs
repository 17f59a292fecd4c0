//! Coriolis parameter sampled on the grid rows.
//!
//! The Coriolis effect arises from Earth's rotation and deflects moving
//! water to the right in the Northern Hemisphere. The parameter f depends
//! only on y, so it is stored once per row index j:
//! - f-plane: f = f₀·sin(φ) (constant)
//! - β-plane: f(y) = f₀ + β·y
//!
//! The field is built once at setup and never changes.

use crate::error::SetupError;
use crate::mesh::Grid2D;

/// Angular frequency of a 12 hour rotation period, 2π / 12 h (rad/s).
pub const F0_HALF_DAY: f64 = (2.0 * std::f64::consts::PI / 12.0) / 3600.0;

/// Coriolis parameter f[j] for every grid row.
///
/// # Example
///
/// ```
/// use swe_fd::equations::ShallowWater2D;
/// use swe_fd::mesh::Grid2D;
/// use swe_fd::source::CoriolisField;
/// use swe_fd::types::{Depth, Resolution2D};
///
/// let swe = ShallowWater2D::standard(Depth::new(100.0)).unwrap();
/// let grid = Grid2D::with_cfl_fraction(Resolution2D::new(8, 8), 1e6, 1e6, 0.1, &swe).unwrap();
///
/// let coriolis = CoriolisField::from_latitude(1.0e-4, std::f64::consts::FRAC_PI_2, &grid);
/// assert!(coriolis.is_f_plane());
/// assert!((coriolis.at(3) - 1.0e-4).abs() < 1e-18);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CoriolisField {
    values: Vec<f64>,
}

impl CoriolisField {
    /// Constant f on every row.
    pub fn f_plane(f: f64, grid: &Grid2D) -> Self {
        Self {
            values: vec![f; grid.ny()],
        }
    }

    /// Constant f = f₀·sin(latitude), latitude in radians.
    pub fn from_latitude(f0: f64, latitude: f64, grid: &Grid2D) -> Self {
        Self::f_plane(f0 * latitude.sin(), grid)
    }

    /// Latitude-varying f(y) = f₀ + β·y on the grid's y-coordinates.
    pub fn beta_plane(f0: f64, beta: f64, grid: &Grid2D) -> Self {
        Self {
            values: (0..grid.ny()).map(|j| f0 + beta * grid.y(j)).collect(),
        }
    }

    /// Caller-supplied per-row values.
    ///
    /// # Errors
    ///
    /// [`SetupError::LengthMismatch`] unless there is exactly one value per row.
    pub fn from_values(values: Vec<f64>, grid: &Grid2D) -> Result<Self, SetupError> {
        if values.len() != grid.ny() {
            return Err(SetupError::LengthMismatch {
                field: "coriolis",
                expected: grid.ny(),
                actual: values.len(),
            });
        }
        Ok(Self { values })
    }

    /// All per-row values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Coriolis parameter on row `j`.
    #[inline]
    pub fn at(&self, j: usize) -> f64 {
        self.values[j]
    }

    /// Number of rows covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field is empty (never true for a field built on a grid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if f is the same on every row.
    pub fn is_f_plane(&self) -> bool {
        self.values.windows(2).all(|w| w[0] == w[1])
    }

    /// Largest |f| over the rows.
    pub fn max_abs(&self) -> f64 {
        self.values.iter().map(|f| f.abs()).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::ShallowWater2D;
    use crate::types::{Depth, Resolution2D};

    const TOL: f64 = 1e-18;

    fn grid() -> Grid2D {
        let swe = ShallowWater2D::new(10.0, Depth::new(1.0)).unwrap();
        // y = -1e6, 0, 1e6
        Grid2D::new(Resolution2D::new(3, 3), 2.0e6, 2.0e6, 1.0, &swe).unwrap()
    }

    #[test]
    fn test_f_plane_from_latitude() {
        let g = grid();
        let c = CoriolisField::from_latitude(F0_HALF_DAY, std::f64::consts::FRAC_PI_4, &g);
        let expected = F0_HALF_DAY * std::f64::consts::FRAC_PI_4.sin();

        assert_eq!(c.len(), 3);
        assert!(c.is_f_plane());
        for &f in c.values() {
            assert!((f - expected).abs() < TOL);
        }
    }

    #[test]
    fn test_half_day_frequency() {
        // 2π / 43200 s
        assert!((F0_HALF_DAY - 1.454441043328608e-4).abs() < 1e-15);
    }

    #[test]
    fn test_beta_plane_variation() {
        let g = grid();
        let c = CoriolisField::beta_plane(1.0e-4, 1.0e-11, &g);

        assert!(!c.is_f_plane());
        assert!((c.at(0) - 0.9e-4).abs() < TOL);
        assert!((c.at(1) - 1.0e-4).abs() < TOL);
        assert!((c.at(2) - 1.1e-4).abs() < TOL);
        assert!((c.max_abs() - 1.1e-4).abs() < TOL);
    }

    #[test]
    fn test_from_values_length() {
        let g = grid();
        assert!(CoriolisField::from_values(vec![0.0; 3], &g).is_ok());
        assert!(matches!(
            CoriolisField::from_values(vec![0.0; 2], &g),
            Err(SetupError::LengthMismatch {
                field: "coriolis",
                expected: 3,
                actual: 2
            })
        ));
    }
}
