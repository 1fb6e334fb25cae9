//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and plotting
//! - exported to JSON/CSV

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Number of points in the built-in sample set.
pub const SAMPLE_LEN: usize = 11;

/// Two parallel, fixed-length sequences of observations.
///
/// Equal length and "no missing values" are guaranteed by the array types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub x: [f64; SAMPLE_LEN],
    pub y: [f64; SAMPLE_LEN],
}

impl SampleSet {
    /// Iterate `(x, y)` pairs in input order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Smallest and largest x value.
    pub fn x_range(&self) -> (f64, f64) {
        min_max(&self.x)
    }

    /// Smallest and largest y value.
    pub fn y_range(&self) -> (f64, f64) {
        min_max(&self.y)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Result of an unweighted straight-line fit `Y = c0 + c1 X`.
///
/// `cov00`, `cov01`, `cov11` are the independent entries of the symmetric 2x2
/// covariance matrix of `(c0, c1)`. `sumsq` is the residual sum of squares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub c0: f64,
    pub c1: f64,
    pub cov00: f64,
    pub cov01: f64,
    pub cov11: f64,
    pub sumsq: f64,
    pub n: usize,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.c0 + self.c1 * x
    }

    /// Full covariance matrix, row-major. `cov01` fills both off-diagonal slots.
    pub fn covariance_matrix(&self) -> [[f64; 2]; 2] {
        [[self.cov00, self.cov01], [self.cov01, self.cov11]]
    }
}

/// Observed vs fitted value for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointResidual {
    pub x: f64,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// How to launch and drive gnuplot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnuplotConfig {
    /// Program to spawn (looked up on `PATH`).
    pub program: String,
    /// Pass `-persist` so the plot window outlives the process.
    pub persist: bool,
    /// Argument of the `set term` command.
    pub terminal: String,
}

impl Default for GnuplotConfig {
    fn default() -> Self {
        Self {
            program: "gnuplot".to_string(),
            persist: true,
            terminal: "wx".to_string(),
        }
    }
}

/// Everything a single run needs, resolved from CLI/env.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub gnuplot: GnuplotConfig,
    /// Drive gnuplot at all.
    pub plot: bool,
    /// Render the terminal plot.
    pub ascii: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Print the per-point residual table.
    pub residuals: bool,
    pub export_results: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,
    pub export_script: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gnuplot: GnuplotConfig::default(),
            plot: true,
            ascii: false,
            plot_width: 60,
            plot_height: 20,
            residuals: false,
            export_results: None,
            export_fit: None,
            export_script: None,
        }
    }
}

/// Schema of the `--export-fit` JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated: chrono::DateTime<chrono::Utc>,
    pub fit: LinearFit,
    pub covariance: [[f64; 2]; 2],
    pub points: Vec<PointResidual>,
}
