//! 2D domain bounds.

use std::fmt;

/// 2D rectangular domain bounds.
///
/// # Example
///
/// ```
/// use swe_fd::types::Bounds2D;
///
/// // 1000 km square basin centred on the origin
/// let bounds = Bounds2D::centered(1.0e6, 1.0e6);
///
/// assert_eq!(bounds.width(), 1.0e6);
/// assert_eq!(bounds.x_min, -0.5e6);
/// assert_eq!(bounds.center(), (0.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2D {
    /// Minimum x-coordinate (western boundary)
    pub x_min: f64,
    /// Maximum x-coordinate (eastern boundary)
    pub x_max: f64,
    /// Minimum y-coordinate (southern boundary)
    pub y_min: f64,
    /// Maximum y-coordinate (northern boundary)
    pub y_max: f64,
}

impl Bounds2D {
    /// Create new domain bounds.
    ///
    /// # Panics
    ///
    /// Panics if `x_max <= x_min` or `y_max <= y_min`.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        assert!(
            x_max > x_min,
            "x_max ({}) must be greater than x_min ({})",
            x_max,
            x_min
        );
        assert!(
            y_max > y_min,
            "y_max ({}) must be greater than y_min ({})",
            y_max,
            y_min
        );

        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Domain of size `lx` × `ly` centred on the origin.
    pub fn centered(lx: f64, ly: f64) -> Self {
        Self::new(-lx / 2.0, lx / 2.0, -ly / 2.0, ly / 2.0)
    }

    /// Domain width (x_max - x_min).
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Domain height (y_max - y_min).
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Domain area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Domain center point.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Check if a point is inside the domain (inclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}] × [{:.2}, {:.2}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let b = Bounds2D::new(0.0, 100.0, 0.0, 50.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 50.0);
        assert_eq!(b.area(), 5000.0);
        assert_eq!(b.center(), (50.0, 25.0));
    }

    #[test]
    fn test_centered() {
        let b = Bounds2D::centered(4.0, 2.0);
        assert_eq!((b.x_min, b.x_max, b.y_min, b.y_max), (-2.0, 2.0, -1.0, 1.0));
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(2.0, -1.0));
        assert!(!b.contains(2.1, 0.0));
    }

    #[test]
    #[should_panic(expected = "x_max")]
    fn test_invalid_x() {
        Bounds2D::new(1.0, 0.0, 0.0, 1.0);
    }
}
