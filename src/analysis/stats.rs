//! Scalar statistics used by the report: means, sample standard deviation,
//! Pearson correlation and ordinary least squares against sequence
//! positions, with two-sided p-values from the Student's t distribution.
//!
//! Every function here degrades to `None` when there is not enough data;
//! insufficiency is a result, not an error.

use statrs::distribution::{ContinuousCDF, StudentsT};

// Guards the t statistic when r is numerically at +-1.
const TINY: f64 = 1.0e-20;

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (divisor n-1), `None` for fewer than 2 values.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    Some(variance.sqrt())
}

/// Pearson correlation coefficient with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Correlation {
    pub r: f64,
    pub p_value: f64,
}

/// Pearson correlation over paired observations.
///
/// Returns `None` with fewer than 2 pairs or when either side has zero
/// variance (the coefficient is undefined there). With exactly 2 pairs the
/// coefficient is +-1 and the p-value is 1 by convention.
pub(crate) fn pearson(x: &[f64], y: &[f64]) -> Option<Correlation> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 {
        return None;
    }

    let mx = mean(x)?;
    let my = mean(y)?;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mx;
        let dy = b - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }

    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let p_value = if n == 2 {
        1.0
    } else {
        let df = (n - 2) as f64;
        let t = r * (df / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
        two_sided_p(t, df)
    };

    Some(Correlation { r, p_value })
}

/// Ordinary least squares fit of `y` against positions `0..n-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    pub std_err: f64,
}

/// Fit a least-squares line of the values against their sequence position.
///
/// Returns `None` with fewer than 2 values. With exactly 2 values the line
/// is exact: the p-value is 0 when the values differ (1 otherwise) and the
/// standard error is 0. A flat series yields an r-value of 0.
pub(crate) fn linear_fit_positions(values: &[f64]) -> Option<LinearFit> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let mx = mean(&x)?;
    let my = mean(values)?;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (a, b) in x.iter().zip(values.iter()) {
        let dx = a - mx;
        let dy = b - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let r_value = if syy > 0.0 {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    let (p_value, std_err) = if n == 2 {
        let p = if values[0] != values[1] { 0.0 } else { 1.0 };
        (p, 0.0)
    } else {
        let df = (n - 2) as f64;
        let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
        let p = two_sided_p(t, df);
        let std_err = ((1.0 - r_value * r_value) * syy / sxx / df).sqrt();
        (p, std_err)
    };

    Some(LinearFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    })
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
fn two_sided_p(t: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.cdf(-t.abs())).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[0.8, 1.0]), Some(0.9));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std_basic() {
        // Values 1..5: variance 10/4 = 2.5, std ~ 1.5811
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((std - 2.5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_sample_std_insufficient() {
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sample_std(&[]), None);
    }

    #[test]
    fn test_pearson_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let corr = pearson(&x, &y).unwrap();
        assert!((corr.r - 1.0).abs() < 1e-9);
        assert!(corr.p_value < 1e-6);
    }

    #[test]
    fn test_pearson_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 8.0, 6.5, 4.0, 2.0];
        let corr = pearson(&x, &y).unwrap();
        assert!(corr.r < -0.99);
        assert!((-1.0..=1.0).contains(&corr.r));
        assert!((0.0..=1.0).contains(&corr.p_value));
    }

    #[test]
    fn test_pearson_insufficient_pairs() {
        assert!(pearson(&[1.0], &[2.0]).is_none());
        assert!(pearson(&[], &[]).is_none());
    }

    #[test]
    fn test_pearson_two_pairs_p_is_one() {
        let corr = pearson(&[0.1, 0.2], &[0.9, 0.8]).unwrap();
        assert!((corr.r + 1.0).abs() < 1e-9);
        assert_eq!(corr.p_value, 1.0);
    }

    #[test]
    fn test_pearson_zero_variance_undefined() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_linear_fit_two_points() {
        // Dropout 0.1 -> 0.2 across positions 0 and 1: slope is exactly 0.1.
        let fit = linear_fit_positions(&[0.1, 0.2]).unwrap();
        assert!((fit.slope - 0.1).abs() < 1e-12);
        assert!((fit.intercept - 0.1).abs() < 1e-12);
        assert!((fit.r_value - 1.0).abs() < 1e-9);
        assert_eq!(fit.p_value, 0.0);
        assert_eq!(fit.std_err, 0.0);
    }

    #[test]
    fn test_linear_fit_two_equal_points() {
        let fit = linear_fit_positions(&[0.1, 0.1]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_value, 0.0);
        assert_eq!(fit.p_value, 1.0);
    }

    #[test]
    fn test_linear_fit_flat_series() {
        let fit = linear_fit_positions(&[0.5, 0.5, 0.5, 0.5]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_value, 0.0);
    }

    #[test]
    fn test_linear_fit_known_slope() {
        // y = 0.05 * x + 0.1, exact fit
        let values = [0.1, 0.15, 0.2, 0.25];
        let fit = linear_fit_positions(&values).unwrap();
        assert!((fit.slope - 0.05).abs() < 1e-12);
        assert!((fit.r_value - 1.0).abs() < 1e-9);
        assert!(fit.p_value < 1e-6);
    }

    #[test]
    fn test_linear_fit_insufficient() {
        assert!(linear_fit_positions(&[0.1]).is_none());
        assert!(linear_fit_positions(&[]).is_none());
    }
}
