//! Scalar statistics used to characterize simulated frames

use scilib::math::basic::erf;
use std::f64::consts::SQRT_2;

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator). NaN when fewer than two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation
pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Variance-to-mean ratio.
///
/// Close to 1.0 for Poisson-distributed counts, which is the fingerprint
/// used to check that simulated dark current has the right statistics.
pub fn dispersion_ratio(values: &[f64]) -> f64 {
    sample_variance(values) / mean(values)
}

/// Median, ignoring NaN values. None if nothing valid remains.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut valid: Vec<f64> = values.iter().filter(|v| !v.is_nan()).copied().collect();
    if valid.is_empty() {
        return None;
    }
    valid.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mid = valid.len() / 2;
    if valid.len() % 2 == 0 {
        Some((valid[mid - 1] + valid[mid]) / 2.0)
    } else {
        Some(valid[mid])
    }
}

/// Cumulative distribution function of the standard normal distribution
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Kolmogorov-Smirnov statistic against a normal distribution.
///
/// Samples are standardized with their own mean and standard deviation, so
/// this tests shape only. Smaller is a better fit; compare against
/// [`ks_critical_value`]. Returns 1.0 for empty or constant input.
pub fn ks_test_normal(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 1.0;
    }

    let m = mean(samples);
    let s = sample_std(samples);
    if !(s > 1e-10) {
        return 1.0;
    }

    let mut standardized: Vec<f64> = samples.iter().map(|v| (v - m) / s).collect();
    standardized.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut max_diff: f64 = 0.0;
    for (i, &z) in standardized.iter().enumerate() {
        let theoretical = normal_cdf(z);
        let empirical_lo = i as f64 / n as f64;
        let empirical_hi = (i + 1) as f64 / n as f64;
        max_diff = max_diff
            .max((empirical_lo - theoretical).abs())
            .max((empirical_hi - theoretical).abs());
    }

    max_diff
}

/// Critical value for the KS test at significance level `alpha`.
///
/// Asymptotic approximation, valid for large n.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    let c_alpha = match alpha {
        a if (a - 0.10).abs() < 1e-6 => 1.22,
        a if (a - 0.05).abs() < 1e-6 => 1.36,
        a if (a - 0.01).abs() < 1e-6 => 1.63,
        _ => 1.36,
    };
    c_alpha / (n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        // population variance of this set is 4.0; sample variance is 32/7
        assert_relative_eq!(sample_variance(&values), 32.0 / 7.0);
    }

    #[test]
    fn test_variance_needs_two_values() {
        assert!(sample_variance(&[1.0]).is_nan());
        assert!(sample_variance(&[]).is_nan());
    }

    #[test]
    fn test_dispersion_ratio_of_poisson_like_data() {
        // Counts hand-built with variance close to the mean
        let values = [3.0, 5.0, 4.0, 6.0, 4.0, 2.0, 5.0, 3.0, 4.0, 4.0];
        let ratio = dispersion_ratio(&values);
        assert!(ratio > 0.2 && ratio < 2.0, "ratio {ratio} out of range");
    }

    #[test]
    fn test_median_odd_even_and_nan() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(median(&[f64::NAN]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_normal_cdf_known_points() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-9);
        assert_relative_eq!(normal_cdf(1.0), 0.8413447461, epsilon = 1e-6);
        assert_relative_eq!(normal_cdf(-1.0), 0.1586552539, epsilon = 1e-6);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
    }

    #[test]
    fn test_ks_accepts_normal_scores() {
        // Deterministic normal sample via the inverse CDF at evenly spaced
        // probabilities
        let n = 1000;
        let mut samples = Vec::with_capacity(n);
        for i in 1..=n {
            let p = (i as f64 - 0.5) / n as f64;
            let z = if p < 0.5 {
                -(-2.0 * (2.0 * p).ln()).sqrt()
            } else {
                (-2.0 * (2.0 * (1.0 - p)).ln()).sqrt()
            };
            samples.push(z);
        }

        let stat = ks_test_normal(&samples);
        let critical = ks_critical_value(n, 0.05);
        assert!(
            stat < critical * 2.0,
            "KS statistic {stat} too large for normal data (critical {critical})"
        );
    }

    #[test]
    fn test_ks_rejects_bimodal() {
        let mut samples = vec![-2.0; 50];
        samples.extend(vec![2.0; 50]);
        // Small spread so the standard deviation is well defined
        for (i, v) in samples.iter_mut().enumerate() {
            *v += i as f64 * 1e-3;
        }

        assert!(ks_test_normal(&samples) > 0.1);
    }

    #[test]
    fn test_ks_degenerate_input() {
        assert_eq!(ks_test_normal(&[]), 1.0);
        assert_eq!(ks_test_normal(&[5.0; 20]), 1.0);
    }

    #[test]
    fn test_ks_critical_values() {
        assert!((ks_critical_value(100, 0.05) - 0.136).abs() < 1e-3);
        assert!((ks_critical_value(100, 0.01) - 0.163).abs() < 1e-3);
    }
}
