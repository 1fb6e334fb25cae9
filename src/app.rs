//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - fits the built-in sample set and prints the summary
//! - writes optional exports
//! - streams the plot to gnuplot

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::{GnuplotConfig, RunConfig};
use crate::error::{AppError, EXIT_IO};
use crate::plot::PlotOutcome;

pub mod pipeline;

/// Entry point for the `fitplot` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = run_config_from_cli(&cli);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(&config, &mut out).map(|_| ())
}

/// Run the whole program against `out` as the console.
///
/// A gnuplot that cannot be launched is not an error; the outcome is returned
/// so callers can tell what happened.
pub fn run_with<W: Write>(config: &RunConfig, out: &mut W) -> Result<Option<PlotOutcome>, AppError> {
    let run = pipeline::run_fit(&crate::data::builtin_sample())?;

    print(out, &crate::report::format_fit_summary(&run.fit))?;
    if config.residuals {
        print(out, &crate::report::format_residual_table(&run.residuals))?;
    }
    if config.ascii {
        let plot = crate::plot::render_ascii_plot(&run.samples, &run.fit, config.plot_width, config.plot_height);
        print(out, &plot)?;
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, &run.residuals)?;
        tracing::info!("wrote results CSV to {}", path.display());
    }
    if let Some(path) = &config.export_fit {
        crate::io::write_fit_json(path, &run.fit, &run.residuals)?;
        tracing::info!("wrote fit JSON to {}", path.display());
    }
    if let Some(path) = &config.export_script {
        crate::io::write_script(path, &run.samples, &run.fit, &config.gnuplot.terminal)?;
        tracing::info!("wrote gnuplot script to {}", path.display());
    }

    if !config.plot {
        return Ok(None);
    }
    let outcome = crate::plot::plot_with_gnuplot(&config.gnuplot, &run.samples, &run.fit);
    tracing::debug!(?outcome, "plot step finished");
    Ok(Some(outcome))
}

pub fn run_config_from_cli(cli: &Cli) -> RunConfig {
    RunConfig {
        gnuplot: GnuplotConfig {
            program: cli.gnuplot.clone(),
            persist: !cli.no_persist,
            terminal: cli.terminal.clone(),
        },
        plot: !cli.no_plot,
        ascii: cli.ascii,
        plot_width: cli.width,
        plot_height: cli.height,
        residuals: cli.residuals,
        export_results: cli.export.clone(),
        export_fit: cli.export_fit.clone(),
        export_script: cli.script.clone(),
    }
}

fn print<W: Write>(out: &mut W, text: &str) -> Result<(), AppError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write to stdout: {e}")))
}

/// Logs go to stderr so stdout stays the fit report.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
    // An embedding host (or a second `run`) may already own the global subscriber.
    if let Err(err) = installed {
        tracing::debug!("keeping existing tracing subscriber: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(program: &str) -> RunConfig {
        RunConfig {
            gnuplot: GnuplotConfig {
                program: program.to_string(),
                persist: true,
                terminal: "wx".to_string(),
            },
            ..RunConfig::default()
        }
    }

    #[test]
    fn unlaunchable_gnuplot_still_prints_and_succeeds() {
        let mut out = Vec::new();
        let outcome = run_with(&config_with("fitplot-missing-gnuplot"), &mut out).unwrap();

        assert!(matches!(outcome, Some(PlotOutcome::Skipped { .. })));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("best fit: Y = 2.97645 + 0.503727 X\n"));
        assert!(text.contains("sumsq = 13.3861"));
    }

    #[test]
    fn no_plot_skips_gnuplot_and_prints_extras() {
        let config = RunConfig {
            plot: false,
            ascii: true,
            residuals: true,
            ..config_with("fitplot-missing-gnuplot")
        };
        let mut out = Vec::new();
        let outcome = run_with(&config, &mut out).unwrap();

        assert!(outcome.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("residual"));
        assert!(text.contains("Plot: x=[4.000, 14.000]"));
    }

    #[test]
    fn tracing_init_twice_is_harmless() {
        init_tracing(0);
        init_tracing(2);
    }

    #[test]
    fn cli_flags_map_onto_config() {
        let cli = Cli::try_parse_from(["fitplot", "--no-plot", "--no-persist", "--script", "s.gp"]).unwrap();
        let config = run_config_from_cli(&cli);
        assert!(!config.plot);
        assert!(!config.gnuplot.persist);
        assert_eq!(config.export_script.as_deref(), Some(std::path::Path::new("s.gp")));
    }
}
