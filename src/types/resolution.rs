//! 2D grid resolution types.

use std::fmt;

/// 2D grid resolution (number of grid points in each direction).
///
/// Provides a strongly-typed way to specify grid shape,
/// preventing mix-ups between nx/ny and other integer parameters.
///
/// # Example
///
/// ```
/// use swe_fd::types::Resolution2D;
///
/// let res = Resolution2D::new(150, 100);
/// assert_eq!(res.nx(), 150);
/// assert_eq!(res.ny(), 100);
/// assert_eq!(res.total_points(), 15000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution2D {
    /// Number of grid points in x-direction
    nx: usize,
    /// Number of grid points in y-direction
    ny: usize,
}

impl Resolution2D {
    /// Create a new grid resolution.
    ///
    /// # Panics
    ///
    /// Panics if either `nx` or `ny` is zero.
    pub fn new(nx: usize, ny: usize) -> Self {
        assert!(nx > 0, "nx must be positive, got {}", nx);
        assert!(ny > 0, "ny must be positive, got {}", ny);
        Self { nx, ny }
    }

    /// Create a square resolution (same in both directions).
    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// Number of grid points in x-direction.
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of grid points in y-direction.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of grid points.
    #[inline]
    pub fn total_points(&self) -> usize {
        self.nx * self.ny
    }

    /// Flat offset of point (i, j) in x-major storage.
    #[inline(always)]
    pub fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny, "({}, {}) outside {}", i, j, self);
        i * self.ny + j
    }

    /// Return as tuple (nx, ny).
    #[inline]
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }
}

impl fmt::Display for Resolution2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.nx, self.ny)
    }
}

impl From<(usize, usize)> for Resolution2D {
    fn from((nx, ny): (usize, usize)) -> Self {
        Self::new(nx, ny)
    }
}

impl From<Resolution2D> for (usize, usize) {
    fn from(res: Resolution2D) -> Self {
        (res.nx, res.ny)
    }
}
