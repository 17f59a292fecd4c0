//! Grid representation.
//!
//! The model runs on a single uniform rectangular grid, see [`Grid2D`].

mod grid2d;

pub use grid2d::Grid2D;
