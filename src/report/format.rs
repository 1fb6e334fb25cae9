//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math code stays clean and testable
//! - output changes are localized (the tests below are golden snapshots)

use crate::domain::{LinearFit, PointResidual};

/// Significant digits used by `fmt_g` (C's default `%g` precision).
const G_PRECISION: i32 = 6;

/// Format the fit summary: coefficients, covariance matrix and sumsq.
///
/// The off-diagonal of the covariance matrix prints `cov01` twice.
pub fn format_fit_summary(fit: &LinearFit) -> String {
    let mut out = String::new();

    out.push_str(&format!("best fit: Y = {} + {} X\n", fmt_g(fit.c0), fmt_g(fit.c1)));
    out.push_str("covariance matrix:\n");
    out.push_str(&format!(
        "[ {}, {}\n  {}, {}]\n",
        fmt_g(fit.cov00),
        fmt_g(fit.cov01),
        fmt_g(fit.cov01),
        fmt_g(fit.cov11)
    ));
    out.push_str(&format!("sumsq = {}\n", fmt_g(fit.sumsq)));
    out.push('\n');

    out
}

/// Format the per-point residual table.
pub fn format_residual_table(residuals: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>4} {:>10} {:>10} {:>10} {:>10}\n",
        "#", "x", "y_obs", "y_fit", "residual"
    ));
    for (i, r) in residuals.iter().enumerate() {
        out.push_str(&format!(
            "{:>4} {:>10.4} {:>10.4} {:>10.4} {:>+10.4}\n",
            i + 1,
            r.x,
            r.y_obs,
            r.y_fit,
            r.residual
        ));
    }
    out
}

/// Format a float the way C's `%g` does.
///
/// Six significant digits; fixed notation when the decimal exponent is in
/// `[-4, 6)`, scientific otherwise; trailing zeros are dropped.
pub fn fmt_g(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first; the exponent after rounding picks the style.
    let sci = format!("{:.*e}", (G_PRECISION - 1) as usize, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= G_PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let decimals = (G_PRECISION - 1 - exp) as usize;
        trim_fraction(&format!("{v:.decimals$}"))
    }
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
