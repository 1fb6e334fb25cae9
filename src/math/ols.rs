//! Ordinary least squares for a straight line.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i - c0 - c1 x_i)^2
//! ```
//!
//! with unit weights and report, besides the coefficients, the covariance
//! matrix `s² (XᵀX)⁻¹` where `X = [1, x]` is the design matrix and
//! `s² = sumsq / (n - 2)`.
//!
//! Implementation choices:
//! - The coefficients come from an SVD least-squares solve of the design matrix.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Inputs may be strided, so a column of an interleaved buffer can be fitted
//!   without copying it out first.

use nalgebra::{DMatrix, DVector, Matrix2};

use crate::domain::LinearFit;
use crate::error::AppError;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `Y = c0 + c1 X` over two equal-length slices.
pub fn fit_linear(x: &[f64], y: &[f64]) -> Result<LinearFit, AppError> {
    if x.len() != y.len() {
        return Err(AppError::fit(format!(
            "x and y must have the same length (got {} and {}).",
            x.len(),
            y.len()
        )));
    }
    fit_linear_strided(x, 1, y, 1, x.len())
}

/// Fit `Y = c0 + c1 X` over `n` points taken every `xstride` / `ystride` elements.
pub fn fit_linear_strided(
    x: &[f64],
    xstride: usize,
    y: &[f64],
    ystride: usize,
    n: usize,
) -> Result<LinearFit, AppError> {
    if xstride == 0 || ystride == 0 {
        return Err(AppError::fit("Strides must be >= 1."));
    }
    if n < 3 {
        return Err(AppError::fit(format!(
            "A line fit with error estimates needs at least 3 points (got {n})."
        )));
    }
    let covers = |len: usize, stride: usize| {
        (n - 1)
            .checked_mul(stride)
            .and_then(|last| last.checked_add(1))
            .is_some_and(|span| span <= len)
    };
    if !covers(x.len(), xstride) || !covers(y.len(), ystride) {
        return Err(AppError::fit(format!(
            "{n} points with strides ({xstride}, {ystride}) overrun inputs of length ({}, {}).",
            x.len(),
            y.len()
        )));
    }

    let xs: Vec<f64> = x.iter().step_by(xstride).take(n).copied().collect();
    let ys: Vec<f64> = y.iter().step_by(ystride).take(n).copied().collect();
    if !xs.iter().chain(ys.iter()).all(|v| v.is_finite()) {
        return Err(AppError::fit("Non-finite value in fit input."));
    }

    let nf = n as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_xx: f64 = xs.iter().map(|v| v * v).sum();
    let mean_x = sum_x / nf;
    let sxx: f64 = xs.iter().map(|v| (v - mean_x) * (v - mean_x)).sum();
    // Constant x that is not exactly representable leaves rounding noise in `sxx`.
    if sxx <= f64::EPSILON * sum_xx {
        return Err(AppError::fit("All x values are equal; the slope is undefined."));
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { xs[i] });
    let target = DVector::from_column_slice(&ys);
    let beta = solve_least_squares(&design, &target)
        .ok_or_else(|| AppError::fit("Least-squares solve failed (ill-conditioned design)."))?;
    let (c0, c1) = (beta[0], beta[1]);

    let sumsq: f64 = xs
        .iter()
        .zip(&ys)
        .map(|(&xi, &yi)| {
            let r = yi - (c0 + c1 * xi);
            r * r
        })
        .sum();
    let s2 = sumsq / (nf - 2.0);

    let xtx = Matrix2::new(nf, sum_x, sum_x, sum_xx);
    let cov = xtx
        .try_inverse()
        .ok_or_else(|| AppError::fit("Normal matrix is singular."))?
        * s2;

    Ok(LinearFit {
        c0,
        c1,
        cov00: cov[(0, 0)],
        cov01: cov[(0, 1)],
        cov11: cov[(1, 1)],
        sumsq,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SAMPLE;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn builtin_sample_matches_reference_fit() {
        let fit = fit_linear(&SAMPLE.x, &SAMPLE.y).unwrap();
        assert_eq!(fit.n, 11);
        assert!(close(fit.c0, 2.976454545454546, 1e-9), "c0={}", fit.c0);
        assert!(close(fit.c1, 0.5037272727272728, 1e-9), "c1={}", fit.c1);
        assert!(close(fit.sumsq, 13.38607181818182, 1e-9), "sumsq={}", fit.sumsq);
        assert!(close(fit.cov00, 1.2304369044995411, 1e-9), "cov00={}", fit.cov00);
        assert!(close(fit.cov01, -0.1216915619834711, 1e-9), "cov01={}", fit.cov01);
        assert!(close(fit.cov11, 0.013521284664830121, 1e-9), "cov11={}", fit.cov11);
    }

    #[test]
    fn exact_line_has_zero_residual() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = fit_linear(&x, &y).unwrap();
        assert!((fit.c0 - 1.0).abs() < 1e-10);
        assert!((fit.c1 - 2.0).abs() < 1e-10);
        assert!(fit.sumsq < 1e-18);
        assert!(fit.cov00.abs() < 1e-15 && fit.cov11.abs() < 1e-15);
    }

    #[test]
    fn strided_input_matches_contiguous() {
        let mut xbuf = Vec::new();
        for &v in &SAMPLE.x {
            xbuf.extend_from_slice(&[v, -1.0]);
        }
        let mut ybuf = Vec::new();
        for &v in &SAMPLE.y {
            ybuf.extend_from_slice(&[v, 99.0, 99.0]);
        }
        let strided = fit_linear_strided(&xbuf, 2, &ybuf, 3, 11).unwrap();
        let plain = fit_linear(&SAMPLE.x, &SAMPLE.y).unwrap();
        assert!(close(strided.c0, plain.c0, 1e-12));
        assert!(close(strided.c1, plain.c1, 1e-12));
        assert!(close(strided.sumsq, plain.sumsq, 1e-12));
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert_eq!(fit_linear(&[1.0, 2.0], &[1.0, 2.0]).unwrap_err().exit_code(), 3);
        assert!(fit_linear(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_err());
        assert!(fit_linear(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(fit_linear(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(fit_linear_strided(&[1.0, 2.0, 3.0], 0, &[1.0, 2.0, 3.0], 1, 3).is_err());
        assert!(fit_linear_strided(&[1.0, 2.0, 3.0, 4.0], 2, &[1.0, 2.0, 3.0], 1, 3).is_err());
    }

    #[test]
    fn constant_x_with_rounding_noise_is_rejected() {
        let y: Vec<f64> = (1..=11).map(f64::from).collect();
        let err = fit_linear(&[0.1; 11], &y).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(fit_linear(&[0.3; 3], &[1.0, 2.0, 3.0]).is_err());
        assert!(fit_linear(&[0.0; 5], &[1.0, 2.0, 3.0, 4.0, 5.0]).is_err());
    }

    #[test]
    fn small_spread_around_large_offset_still_fits() {
        let x = [1e6, 1e6 + 1.0, 1e6 + 2.0, 1e6 + 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let fit = fit_linear(&x, &y).unwrap();
        assert!((fit.c1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn huge_stride_is_an_overrun_not_a_panic() {
        let v = [1.0, 2.0, 3.0];
        let err = fit_linear_strided(&v, usize::MAX, &v, 1, 3).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(fit_linear_strided(&v, 1, &v, usize::MAX / 2 + 1, 3).is_err());
    }
}
