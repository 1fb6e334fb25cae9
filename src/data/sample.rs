//! Built-in sample set.
//!
//! An Anscombe-style 11-point dataset. The third y value (7.68) differs from
//! Anscombe's first quartet, so the fit is close to, but not exactly,
//! `Y = 3 + 0.5 X`.

use crate::domain::SampleSet;

/// The fixed dataset the program fits and plots.
pub const SAMPLE: SampleSet = SampleSet {
    x: [10.0, 8.0, 13.0, 9.0, 11.0, 14.0, 6.0, 4.0, 12.0, 7.0, 5.0],
    y: [8.04, 6.95, 7.68, 8.81, 8.33, 9.96, 7.24, 4.26, 10.84, 4.82, 5.68],
};

/// Return the built-in sample set.
pub fn builtin_sample() -> SampleSet {
    SAMPLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_expected_shape() {
        let s = builtin_sample();
        assert_eq!(s.x.len(), 11);
        assert_eq!(s.points().count(), 11);
        assert_eq!(s.x_range(), (4.0, 14.0));
        assert_eq!(s.y_range(), (4.26, 10.84));
        assert!(s.points().all(|(x, y)| x.is_finite() && y.is_finite()));
    }
}
