//! Plain-text exports: per-point results CSV and the gnuplot script.
//!
//! The CSV is meant to be easy to consume in spreadsheets or downstream scripts.
//! The script can be replayed later with `gnuplot -persist <file>`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{LinearFit, PointResidual, SampleSet};
use crate::error::{AppError, EXIT_IO};
use crate::plot::render_script;

/// Write per-point results to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    // Header
    writeln!(file, "x,y_obs,y_fit,residual")
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writeln!(file, "{},{},{:.10},{:.10}", r.x, r.y_obs, r.y_fit, r.residual)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the complete gnuplot session to a file.
pub fn write_script(path: &Path, samples: &SampleSet, fit: &LinearFit, terminal: &str) -> Result<(), AppError> {
    std::fs::write(path, render_script(samples, fit, terminal))
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write gnuplot script '{}': {e}", path.display())))
}
