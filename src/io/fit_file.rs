//! Write fit JSON files.
//!
//! The fit JSON is the portable representation of a run:
//! - coefficients, covariance terms and sumsq
//! - the full covariance matrix
//! - every input point with its fitted value and residual
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitFile, LinearFit, PointResidual};
use crate::error::{AppError, EXIT_IO};

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit: &LinearFit, residuals: &[PointResidual]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create fit JSON '{}': {e}", path.display())))?;

    let doc = FitFile {
        tool: env!("CARGO_PKG_NAME").to_string(),
        generated: Utc::now(),
        fit: *fit,
        covariance: fit.covariance_matrix(),
        points: residuals.to_vec(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write fit JSON: {e}")))?;

    Ok(())
}
