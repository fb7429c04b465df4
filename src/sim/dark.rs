//! Dark-current simulation.
//!
//! Thermal charge accumulates in every pixel at a rate independent of
//! incident light, so a shutter-closed exposure of duration t at rate r and
//! gain g carries Poisson-distributed counts with mean r * t / g. A small
//! outlier population of hot pixels can be injected at a much higher rate to
//! mimic real sensor defects.

use crate::error::SimError;
use crate::frame::FrameShape;
use crate::hot_pixels::HotPixelMap;
use crate::sensor::SensorSpec;
use crate::sim::readout::{bias, read_noise};
use crate::sim::sample::{poisson_field, sample_poisson};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use std::time::Duration;

/// Fraction of pixel sites injected as hot
pub const HOT_PIXEL_FRACTION: f64 = 1.0e-4;

/// Dark-current multiplier applied at hot sites
pub const HOT_PIXEL_RATE_FACTOR: f64 = 10_000.0;

fn check_rate_and_gain(rate: f64, gain: f64) -> Result<(), SimError> {
    if rate < 0.0 {
        return Err(SimError::NegativeRate { value: rate });
    }
    if gain <= 0.0 {
        return Err(SimError::NonPositiveGain { value: gain });
    }
    Ok(())
}

/// Simulate the dark-current contribution to a frame.
///
/// Each pixel draws a Poisson count with mean `rate * exposure / gain`. The
/// template is read only for its dimensions; a new array is returned.
///
/// # Arguments
/// * `base` - Template frame providing the output dimensions
/// * `rate` - Dark current in electrons/pixel/second
/// * `exposure` - Integration time
/// * `gain` - Gain in electrons/ADU
/// * `rng_seed` - Optional seed for reproducible output
pub fn dark_current(
    base: &Array2<f64>,
    rate: f64,
    exposure: &Duration,
    gain: f64,
    rng_seed: Option<u64>,
) -> Result<Array2<f64>, SimError> {
    check_rate_and_gain(rate, gain)?;

    let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
    let mean = rate * exposure.as_secs_f64() / gain;

    Ok(poisson_field(base.dim(), mean, seed))
}

/// Simulate dark current with a hot-pixel outlier population.
///
/// A fraction [`HOT_PIXEL_FRACTION`] of distinct pixel sites draws from a
/// Poisson population at [`HOT_PIXEL_RATE_FACTOR`] times the nominal rate;
/// the rest of the frame is identical in distribution to [`dark_current`].
/// The sites are drawn fresh on every call and returned alongside the frame.
pub fn dark_current_with_hot_pixels(
    base: &Array2<f64>,
    rate: f64,
    exposure: &Duration,
    gain: f64,
    rng_seed: Option<u64>,
) -> Result<(Array2<f64>, HotPixelMap), SimError> {
    check_rate_and_gain(rate, gain)?;

    let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
    let mut frame = dark_current(base, rate, exposure, gain, Some(seed))?;

    // Separate stream from the chunked field fill, whose chunk seeds count
    // upward from `seed`
    let mut rng = StdRng::seed_from_u64(seed.wrapping_sub(1));

    let shape = FrameShape::of(base);
    let map = HotPixelMap::random(shape, HOT_PIXEL_FRACTION, &mut rng);

    let hot_mean = HOT_PIXEL_RATE_FACTOR * rate * exposure.as_secs_f64() / gain;
    for &(x, y) in map.pixels() {
        frame[[y, x]] = sample_poisson(hot_mean, &mut rng);
    }

    Ok((frame, map))
}

/// Simulate a complete dark exposure for a sensor, in ADU.
///
/// Composes the bias pedestal, Poisson dark counts, and Gaussian read noise
/// from the sensor's parameters. This is what a real shutter-closed exposure
/// looks like before calibration.
pub fn dark_frame(
    sensor: &SensorSpec,
    exposure: &Duration,
    rng_seed: Option<u64>,
) -> Result<Array2<f64>, SimError> {
    let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
    let base = Array2::<f64>::zeros(sensor.shape.to_dim());

    // Decorrelate the dark and readout streams with an LCG step
    let read_seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);

    let dark = dark_current(
        &base,
        sensor.dark_current_e_per_s,
        exposure,
        sensor.gain_e_per_adu,
        Some(seed),
    )?;
    let readout = read_noise(&base, sensor.read_noise_e, sensor.gain_e_per_adu, Some(read_seed))?;

    Ok(bias(&base, sensor.bias_level_adu) + dark + readout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::models;
    use crate::stats;
    use approx::assert_relative_eq;

    fn template(width: usize, height: usize) -> Array2<f64> {
        Array2::zeros((height, width))
    }

    #[test]
    fn test_zero_rate_gives_zero_frame() {
        let base = template(64, 48);
        let frame = dark_current(&base, 0.0, &Duration::from_secs(100), 1.5, Some(1)).unwrap();

        assert_eq!(frame.dim(), base.dim());
        assert!(frame.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_shape_matches_template() {
        let base = template(123, 45);
        let frame = dark_current(&base, 0.1, &Duration::from_secs(10), 1.0, Some(2)).unwrap();
        assert_eq!(frame.dim(), (45, 123));
    }

    #[test]
    fn test_template_is_not_mutated() {
        let base = template(32, 32);
        let before = base.clone();
        let _ = dark_current(&base, 1.0, &Duration::from_secs(5), 1.0, Some(3)).unwrap();
        assert_eq!(base, before);
    }

    #[test]
    fn test_mean_converges_to_rate_time_over_gain() {
        // 40000 pixels at mean 0.1 * 150 / 3 = 5 ADU
        let base = template(200, 200);
        let frame = dark_current(&base, 0.1, &Duration::from_secs(150), 3.0, Some(4)).unwrap();

        let values: Vec<f64> = frame.iter().copied().collect();
        let mean = stats::mean(&values);
        assert!(
            (mean - 5.0).abs() / 5.0 < 0.05,
            "sample mean {mean} outside 5% of expected 5.0"
        );
    }

    #[test]
    fn test_variance_approximates_mean() {
        let base = template(200, 200);
        let frame = dark_current(&base, 0.1, &Duration::from_secs(100), 1.0, Some(5)).unwrap();

        let values: Vec<f64> = frame.iter().copied().collect();
        let ratio = stats::dispersion_ratio(&values);
        assert!(
            (ratio - 1.0).abs() < 0.05,
            "variance/mean ratio {ratio} not Poisson-like"
        );
    }

    #[test]
    fn test_seeded_calls_are_reproducible() {
        let base = template(96, 64);
        let exposure = Duration::from_secs(30);
        let a = dark_current(&base, 0.3, &exposure, 1.4, Some(77)).unwrap();
        let b = dark_current(&base, 0.3, &exposure, 1.4, Some(77)).unwrap();
        let c = dark_current(&base, 0.3, &exposure, 1.4, Some(78)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let base = template(8, 8);
        let exposure = Duration::from_secs(1);

        assert_eq!(
            dark_current(&base, -0.1, &exposure, 1.0, Some(1)),
            Err(SimError::NegativeRate { value: -0.1 })
        );
        assert_eq!(
            dark_current(&base, 0.1, &exposure, 0.0, Some(1)),
            Err(SimError::NonPositiveGain { value: 0.0 })
        );
        assert!(dark_current_with_hot_pixels(&base, 0.1, &exposure, -1.0, Some(1)).is_err());
    }

    #[test]
    fn test_hot_pixel_population_count_and_level() {
        // 256x256 = 65536 pixels, so round(65536 * 1e-4) = 7 hot sites.
        // Nominal mean is 10 ADU; hot sites sit near 1e5 ADU.
        let base = template(256, 256);
        let (frame, map) =
            dark_current_with_hot_pixels(&base, 0.1, &Duration::from_secs(100), 1.0, Some(6))
                .unwrap();

        assert_eq!(map.len(), 7);
        assert_relative_eq!(map.fraction(), 7.0 / 65536.0);

        let threshold = 1000.0;
        let above: Vec<(usize, usize)> = frame
            .indexed_iter()
            .filter(|(_, &v)| v > threshold)
            .map(|((y, x), _)| (x, y))
            .collect();

        assert_eq!(above.len(), map.len());
        for (x, y) in above {
            assert!(map.contains(x, y), "bright pixel ({x},{y}) not in map");
        }
    }

    #[test]
    fn test_hot_pixel_map_shape_matches_frame() {
        let base = template(120, 80);
        let (frame, map) =
            dark_current_with_hot_pixels(&base, 0.5, &Duration::from_secs(10), 2.0, Some(9))
                .unwrap();

        assert_eq!(map.shape().to_dim(), frame.dim());
        assert_eq!(map.as_mask().dim(), frame.dim());
    }

    #[test]
    fn test_hot_sites_vary_between_unseeded_calls() {
        let base = template(128, 128);
        let exposure = Duration::from_secs(100);
        let (_, a) = dark_current_with_hot_pixels(&base, 0.1, &exposure, 1.0, None).unwrap();
        let (_, b) = dark_current_with_hot_pixels(&base, 0.1, &exposure, 1.0, None).unwrap();

        // 2 sites over 16384 candidates; identical draws would be suspect
        assert_ne!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_dark_frame_sits_on_bias_pedestal() {
        let sensor = models::KAF1603.with_shape(FrameShape::new(200, 200));
        let exposure = Duration::from_secs(300);
        let frame = dark_frame(&sensor, &exposure, Some(21)).unwrap();

        assert_eq!(frame.dim(), (200, 200));

        let values: Vec<f64> = frame.iter().copied().collect();
        let expected = sensor.bias_level_adu + sensor.expected_dark_adu(&exposure);
        let mean = stats::mean(&values);
        assert!(
            (mean - expected).abs() / expected < 0.01,
            "mean {mean} far from expected {expected}"
        );
    }
}
