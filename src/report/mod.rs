//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{LinearFit, PointResidual, SAMPLE_LEN, SampleSet};
use crate::error::AppError;

/// Compute fitted values and residuals for each sample.
pub fn compute_residuals(samples: &SampleSet, fit: &LinearFit) -> Result<Vec<PointResidual>, AppError> {
    let mut out = Vec::with_capacity(SAMPLE_LEN);
    for (x, y_obs) in samples.points() {
        let y_fit = fit.predict(x);
        if !y_fit.is_finite() {
            return Err(AppError::fit("Non-finite prediction during residual computation."));
        }
        out.push(PointResidual {
            x,
            y_obs,
            y_fit,
            residual: y_obs - y_fit,
        });
    }
    Ok(out)
}
