//! Mathematical utilities: straight-line least squares.

pub mod ols;

pub use ols::*;
