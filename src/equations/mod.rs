//! Governing equations.
//!
//! The model solves a linearised-momentum, nonlinear-continuity form of the
//! 2D shallow water equations; see [`ShallowWater2D`].

mod shallow_water_2d;

pub use shallow_water_2d::{G_STANDARD, ShallowWater2D};
