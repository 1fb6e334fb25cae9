//! Command-line parsing.
//!
//! The dataset is fixed; the options only control where the results go
//! (console, gnuplot, files).

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "fitplot",
    version,
    about = "Least-squares line fit of a built-in dataset, plotted with gnuplot"
)]
pub struct Cli {
    /// gnuplot executable to launch.
    #[arg(long, env = "FITPLOT_GNUPLOT", default_value = "gnuplot")]
    pub gnuplot: String,

    /// gnuplot terminal (`set term ...`).
    #[arg(long, env = "FITPLOT_TERM", default_value = "wx")]
    pub terminal: String,

    /// Do not pass `-persist` to gnuplot.
    #[arg(long)]
    pub no_persist: bool,

    /// Skip gnuplot entirely.
    #[arg(long)]
    pub no_plot: bool,

    /// Also draw an ASCII plot in the terminal.
    #[arg(long)]
    pub ascii: bool,

    /// ASCII plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// ASCII plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Print the per-point residual table.
    #[arg(long)]
    pub residuals: bool,

    /// Export per-point results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fit (coefficients, covariance, points) to JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,

    /// Write the gnuplot command stream to a file.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// More log output (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
