//! Readout and background contributions: read noise, bias, sky.

use crate::error::SimError;
use crate::sim::sample::{gaussian_field, poisson_field};
use ndarray::Array2;
use rand::{thread_rng, RngCore};

/// Simulate the read-noise contribution to a frame.
///
/// Each pixel draws a zero-mean Gaussian sample with standard deviation
/// `read_noise_e / gain`. Read noise comes from the readout electronics and
/// does not depend on exposure time.
///
/// # Arguments
/// * `base` - Template frame providing the output dimensions
/// * `read_noise_e` - Read noise RMS in electrons
/// * `gain` - Gain in electrons/ADU
/// * `rng_seed` - Optional seed for reproducible output
pub fn read_noise(
    base: &Array2<f64>,
    read_noise_e: f64,
    gain: f64,
    rng_seed: Option<u64>,
) -> Result<Array2<f64>, SimError> {
    if read_noise_e < 0.0 {
        return Err(SimError::NegativeReadNoise {
            value: read_noise_e,
        });
    }
    if gain <= 0.0 {
        return Err(SimError::NonPositiveGain { value: gain });
    }

    let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
    Ok(gaussian_field(base.dim(), read_noise_e / gain, seed))
}

/// Uniform bias pedestal at `level` ADU, shaped like the template.
pub fn bias(base: &Array2<f64>, level: f64) -> Array2<f64> {
    Array2::from_elem(base.dim(), level)
}

/// Simulate a Poisson sky background in ADU.
///
/// Counts are drawn in electrons at mean `sky_adu * gain` and scaled back to
/// ADU, so the returned frame has mean `sky_adu` and the reduced variance of
/// gain-scaled shot noise.
pub fn sky_background(
    base: &Array2<f64>,
    sky_adu: f64,
    gain: f64,
    rng_seed: Option<u64>,
) -> Result<Array2<f64>, SimError> {
    if sky_adu < 0.0 {
        return Err(SimError::NegativeSky { value: sky_adu });
    }
    if gain <= 0.0 {
        return Err(SimError::NonPositiveGain { value: gain });
    }

    let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
    let electrons = poisson_field(base.dim(), sky_adu * gain, seed);
    Ok(electrons / gain)
}
