//! `fitplot` library crate.
//!
//! The binary (`fitplot`) is a thin wrapper around this library so that:
//!
//! - the fit and the gnuplot protocol are testable without spawning processes
//! - the console/report text can be checked as plain strings

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
