//! Strongly-typed domain types for safer APIs.
//!
//! - **Newtypes prevent mix-ups**: a resting [`Depth`] is not an elevation
//! - **Named fields over positional**: [`Bounds2D`] names each wall
//! - **Zero-cost abstractions**: newtypes are `#[repr(transparent)]`
//!
//! # Example
//!
//! ```
//! use swe_fd::types::{Bounds2D, Depth, Resolution2D};
//!
//! let bounds = Bounds2D::centered(1.0e6, 5.0e5);
//! assert_eq!(bounds.height(), 5.0e5);
//!
//! let res = Resolution2D::new(150, 75);
//! assert_eq!(res.total_points(), 11250);
//!
//! let h = Depth::new(100.0);
//! assert_eq!(h.total_depth(1.0), 101.0);
//! ```

mod bounds;
mod physical;
mod resolution;

pub use bounds::Bounds2D;
pub use physical::Depth;
pub use resolution::Resolution2D;
