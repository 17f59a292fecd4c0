//! Dense 2D scalar field storage.
//!
//! Values are stored x-major: `data[i * ny + j]` for grid point (i, j).
//! Each fixed-`i` line (one "row" in x) is therefore a contiguous slice of
//! length `ny`, which is the unit of work for the step kernels.

use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, ChunksExactMut};

use crate::error::SetupError;
use crate::types::Resolution2D;

/// A dense N_x × N_y array of `f64`.
///
/// # Example
///
/// ```
/// use swe_fd::solver::Field2D;
/// use swe_fd::types::Resolution2D;
///
/// let mut eta = Field2D::zeros(Resolution2D::new(4, 4));
/// eta[(1, 1)] = 1.0;
/// assert_eq!(eta.sum(), 1.0);
/// assert_eq!(eta.row(1), &[0.0, 1.0, 0.0, 0.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Field2D {
    resolution: Resolution2D,
    data: Vec<f64>,
}

impl Field2D {
    /// Field of zeros.
    pub fn zeros(resolution: Resolution2D) -> Self {
        Self::filled(resolution, 0.0)
    }

    /// Field with every value set to `value`.
    pub fn filled(resolution: Resolution2D, value: f64) -> Self {
        Self {
            resolution,
            data: vec![value; resolution.total_points()],
        }
    }

    /// Field evaluated point-wise from `f(i, j)`.
    pub fn from_fn(resolution: Resolution2D, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let (nx, ny) = resolution.as_tuple();
        let mut data = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                data.push(f(i, j));
            }
        }
        Self { resolution, data }
    }

    /// Wrap an x-major buffer.
    ///
    /// # Errors
    ///
    /// [`SetupError::LengthMismatch`] if `data.len() != nx * ny`.
    pub fn from_vec(
        field: &'static str,
        resolution: Resolution2D,
        data: Vec<f64>,
    ) -> Result<Self, SetupError> {
        if data.len() != resolution.total_points() {
            return Err(SetupError::LengthMismatch {
                field,
                expected: resolution.total_points(),
                actual: data.len(),
            });
        }
        Ok(Self { resolution, data })
    }

    /// Shape of the field.
    #[inline]
    pub fn resolution(&self) -> Resolution2D {
        self.resolution
    }

    /// Number of points in x.
    #[inline]
    pub fn nx(&self) -> usize {
        self.resolution.nx()
    }

    /// Number of points in y.
    #[inline]
    pub fn ny(&self) -> usize {
        self.resolution.ny()
    }

    /// Check that this field has the expected shape.
    pub fn ensure_shape(
        &self,
        field: &'static str,
        expected: Resolution2D,
    ) -> Result<(), SetupError> {
        if self.resolution == expected {
            Ok(())
        } else {
            Err(SetupError::shape_mismatch(field, expected, self.resolution))
        }
    }

    /// Raw x-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable raw x-major values.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the field, returning the x-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Values at fixed `i`, indexed by `j`.
    #[inline(always)]
    pub fn row(&self, i: usize) -> &[f64] {
        let ny = self.ny();
        &self.data[i * ny..(i + 1) * ny]
    }

    /// Mutable values at fixed `i`, indexed by `j`.
    #[inline(always)]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let ny = self.ny();
        &mut self.data[i * ny..(i + 1) * ny]
    }

    /// Iterate over rows in order of increasing `i`.
    #[inline]
    pub fn rows(&self) -> ChunksExact<'_, f64> {
        let ny = self.ny();
        self.data.chunks_exact(ny)
    }

    /// Mutably iterate over rows in order of increasing `i`.
    #[inline]
    pub fn rows_mut(&mut self) -> ChunksExactMut<'_, f64> {
        let ny = self.ny();
        self.data.chunks_exact_mut(ny)
    }

    /// Values along fixed `j`, indexed by `i` (a strided copy).
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.rows().map(|row| row[j]).collect()
    }

    /// Set every value to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copy values from another field of the same shape.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.resolution, other.resolution, "field shape mismatch");
        self.data.copy_from_slice(&other.data);
    }

    /// Sum of all values.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Maximum absolute value (0 for an all-zero field).
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|&x| x.abs()).fold(0.0, f64::max)
    }

    /// Minimum and maximum value.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    }

    /// Position of the first NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        let ny = self.ny();
        self.data
            .iter()
            .position(|x| !x.is_finite())
            .map(|k| (k / ny, k % ny))
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

impl Index<(usize, usize)> for Field2D {
    type Output = f64;

    #[inline(always)]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[self.resolution.offset(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Field2D {
    #[inline(always)]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        let k = self.resolution.offset(i, j);
        &mut self.data[k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(nx: usize, ny: usize) -> Resolution2D {
        Resolution2D::new(nx, ny)
    }

    #[test]
    fn test_from_fn_layout() {
        let f = Field2D::from_fn(res(2, 3), |i, j| (10 * i + j) as f64);
        assert_eq!(f.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(f[(1, 2)], 12.0);
        assert_eq!(f.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(f.column(1), vec![1.0, 11.0]);
    }

    #[test]
    fn test_from_vec_length_check() {
        let err = Field2D::from_vec("eta", res(2, 2), vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            SetupError::LengthMismatch {
                field: "eta",
                expected: 4,
                actual: 3
            }
        );
        assert!(Field2D::from_vec("eta", res(2, 2), vec![0.0; 4]).is_ok());
    }

    #[test]
    fn test_ensure_shape() {
        let f = Field2D::zeros(res(3, 2));
        assert!(f.ensure_shape("u", res(3, 2)).is_ok());
        assert_eq!(
            f.ensure_shape("u", res(2, 3)),
            Err(SetupError::shape_mismatch("u", (2, 3), (3, 2)))
        );
    }

    #[test]
    fn test_reductions() {
        let mut f = Field2D::zeros(res(3, 3));
        f[(0, 0)] = -2.0;
        f[(2, 1)] = 1.5;
        assert_eq!(f.sum(), -0.5);
        assert_eq!(f.max_abs(), 2.0);
        assert_eq!(f.min_max(), (-2.0, 1.5));
        assert!(f.is_finite());
        assert_eq!(f.first_non_finite(), None);

        f[(1, 2)] = f64::NAN;
        assert!(!f.is_finite());
        assert_eq!(f.first_non_finite(), Some((1, 2)));
    }

    #[test]
    fn test_rows_mut_and_fill() {
        let mut f = Field2D::zeros(res(2, 2));
        for (i, row) in f.rows_mut().enumerate() {
            row[0] = i as f64;
        }
        assert_eq!(f.column(0), vec![0.0, 1.0]);

        f.fill(3.0);
        assert_eq!(f.sum(), 12.0);

        let mut g = Field2D::zeros(res(2, 2));
        g.copy_from(&f);
        assert_eq!(g, f);
    }
}
