//! Synthetic frame generation for detector noise sources.
//!
//! Each generator reads a template frame for its dimensions and returns a
//! freshly allocated array:
//! - **dark**: Poisson-distributed thermal counts, optional hot-pixel
//!   outlier population, and the combined sensor dark exposure
//! - **readout**: Gaussian read noise, bias pedestal, Poisson sky background
//!
//! All generators accept an optional seed; seeded calls are reproducible
//! across runs and thread counts.

pub mod dark;
pub mod readout;

mod sample;

pub use dark::{
    dark_current, dark_current_with_hot_pixels, dark_frame, HOT_PIXEL_FRACTION,
    HOT_PIXEL_RATE_FACTOR,
};
pub use readout::{bias, read_noise, sky_background};
