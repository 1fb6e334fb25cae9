//! Plotting: gnuplot pipe driver and a terminal fallback.

pub mod ascii;
pub mod gnuplot;

pub use ascii::render_ascii_plot;
pub use gnuplot::{GnuplotPipe, PlotOutcome, plot_with_gnuplot, render_script};
