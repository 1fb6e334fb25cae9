//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place keeps the workflow in one readable spot:
//! samples -> fit -> residuals
//!
//! The front-end can then focus on presentation (printing, plotting, exports).

use crate::domain::{LinearFit, PointResidual, SampleSet};
use crate::error::AppError;
use crate::math::fit_linear;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub samples: SampleSet,
    pub fit: LinearFit,
    pub residuals: Vec<PointResidual>,
}

/// Fit the samples and compute per-point residuals.
pub fn run_fit(samples: &SampleSet) -> Result<RunOutput, AppError> {
    let fit = fit_linear(&samples.x, &samples.y)?;
    tracing::debug!(c0 = fit.c0, c1 = fit.c1, sumsq = fit.sumsq, n = fit.n, "fit complete");

    let residuals = crate::report::compute_residuals(samples, &fit)?;

    Ok(RunOutput {
        samples: *samples,
        fit,
        residuals,
    })
}
