//! Frame dimensions and shape utilities

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of a frame.
///
/// Uses usize for direct compatibility with ndarray indexing. Arrays built
/// from a shape are row-major, so the ndarray dimension tuple is
/// (height, width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameShape {
    /// Frame width in pixels
    pub width: usize,
    /// Frame height in pixels
    pub height: usize,
}

impl FrameShape {
    /// Create a new FrameShape
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Shape of an existing frame
    pub fn of(frame: &Array2<f64>) -> Self {
        let (height, width) = frame.dim();
        Self { width, height }
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// ndarray dimension tuple, (height, width)
    pub fn to_dim(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Build from an ndarray dimension tuple, (height, width)
    pub fn from_dim(dim: (usize, usize)) -> Self {
        Self {
            width: dim.1,
            height: dim.0,
        }
    }

    /// Check if a pixel coordinate is within bounds
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
