//! Synthetic CCD/CMOS detector noise simulation
//!
//! This crate generates statistically realistic dark-current, read-noise,
//! bias, and sky-background frames for detector characterization and
//! teaching, along with the temporal statistics needed to verify the
//! simulated populations: per-pixel mean/variance over a stack, hot-pixel
//! detection, and normality checks.

pub mod error;
pub mod frame;
pub mod hot_pixels;
pub mod sensor;
pub mod sim;
pub mod stack;
pub mod stats;

// Re-exports for easier access
pub use error::SimError;
pub use frame::FrameShape;
pub use hot_pixels::HotPixelMap;
pub use sensor::SensorSpec;
pub use sim::{
    bias, dark_current, dark_current_with_hot_pixels, dark_frame, read_noise, sky_background,
};
pub use stack::{FrameStack, StackSummary};
