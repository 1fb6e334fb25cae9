//! Domain types used throughout the program.
//!
//! This module defines:
//!
//! - the input sample set (`SampleSet`)
//! - fit outputs (`LinearFit`, `PointResidual`)
//! - run configuration (`RunConfig`, `GnuplotConfig`)
//! - the JSON export schema (`FitFile`)

pub mod types;

pub use types::*;
