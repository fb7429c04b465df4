//! Error types for frame simulation and stack analysis

use crate::frame::FrameShape;
use thiserror::Error;

/// Errors raised by the frame generators and stack statistics.
///
/// All variants are domain-check failures on caller-supplied parameters;
/// nothing here is retried or recovered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Dark current or hot-pixel rate below zero
    #[error("dark current rate {value} e-/pixel/s must be non-negative")]
    NegativeRate { value: f64 },

    /// Gain must be strictly positive to convert electrons to counts
    #[error("gain {value} e-/ADU must be positive")]
    NonPositiveGain { value: f64 },

    /// Read noise RMS below zero
    #[error("read noise {value} e- RMS must be non-negative")]
    NegativeReadNoise { value: f64 },

    /// Sky background level below zero
    #[error("sky background {value} ADU must be non-negative")]
    NegativeSky { value: f64 },

    /// Frame dimensions do not match the shape the container was built for
    #[error("frame shape {actual} does not match expected {expected}")]
    ShapeMismatch {
        expected: FrameShape,
        actual: FrameShape,
    },

    /// Temporal statistics need more frames than were provided
    #[error("need at least {required} frames for temporal statistics, have {count}")]
    InsufficientFrames { required: usize, count: usize },
}
