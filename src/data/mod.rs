//! Input data.

pub mod sample;

pub use sample::{SAMPLE, builtin_sample};
