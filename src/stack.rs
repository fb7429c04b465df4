//! Temporal statistics over a stack of frames.
//!
//! Stacking repeated exposures of the same scene and looking at each pixel's
//! behavior over time separates the noise sources: the temporal mean exposes
//! dark current and hot pixels, while the temporal standard deviation is
//! dominated by read noise for short exposures.

use crate::error::SimError;
use crate::frame::FrameShape;
use crate::hot_pixels::HotPixelMap;
use crate::stats;
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

/// Accumulates same-shaped frames and computes per-pixel temporal statistics.
pub struct FrameStack {
    shape: FrameShape,
    frames: Vec<Array2<f64>>,
}

/// Summary statistics for a frame stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackSummary {
    pub num_frames: usize,
    pub shape: FrameShape,
    /// Mean of all per-pixel temporal means
    pub global_mean: f64,
    /// Standard deviation of the per-pixel temporal means
    pub global_std_of_means: f64,
    /// Median per-pixel temporal standard deviation; a robust read-noise
    /// estimate for short exposures
    pub median_read_noise: f64,
}

impl FrameStack {
    /// Create an empty stack for frames of the given shape
    pub fn new(shape: FrameShape) -> Self {
        Self {
            shape,
            frames: Vec::new(),
        }
    }

    /// Add a frame to the stack.
    ///
    /// Fails if the frame's dimensions differ from the stack's shape.
    pub fn push(&mut self, frame: Array2<f64>) -> Result<(), SimError> {
        let actual = FrameShape::of(&frame);
        if actual != self.shape {
            return Err(SimError::ShapeMismatch {
                expected: self.shape,
                actual,
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Number of frames accumulated
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frames have been added
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Shape the stack was built for
    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    /// Per-pixel temporal mean
    pub fn mean(&self) -> Result<Array2<f64>, SimError> {
        if self.frames.is_empty() {
            return Err(SimError::InsufficientFrames {
                required: 1,
                count: 0,
            });
        }

        let mut mean = Array2::<f64>::zeros(self.shape.to_dim());
        for frame in &self.frames {
            mean.scaled_add(1.0, frame);
        }

        let n = self.frames.len() as f64;
        mean.mapv_inplace(|v| v / n);
        Ok(mean)
    }

    /// Per-pixel temporal sample variance (n - 1 denominator)
    pub fn variance(&self) -> Result<Array2<f64>, SimError> {
        if self.frames.len() < 2 {
            return Err(SimError::InsufficientFrames {
                required: 2,
                count: self.frames.len(),
            });
        }

        let mean = self.mean()?;
        let mut variance = Array2::<f64>::zeros(self.shape.to_dim());
        for frame in &self.frames {
            Zip::from(&mut variance)
                .and(frame)
                .and(&mean)
                .for_each(|v, &f, &m| {
                    let diff = f - m;
                    *v += diff * diff;
                });
        }

        let n = (self.frames.len() - 1) as f64;
        variance.mapv_inplace(|v| v / n);
        Ok(variance)
    }

    /// Per-pixel temporal standard deviation
    pub fn std_dev(&self) -> Result<Array2<f64>, SimError> {
        Ok(self.variance()?.mapv(f64::sqrt))
    }

    /// Mean of the per-pixel temporal means
    pub fn global_mean(&self) -> Result<f64, SimError> {
        let mean = self.mean()?;
        let values: Vec<f64> = mean.iter().copied().collect();
        Ok(stats::mean(&values))
    }

    /// Standard deviation of the per-pixel temporal means
    pub fn global_std_of_means(&self) -> Result<f64, SimError> {
        let mean = self.mean()?;
        let values: Vec<f64> = mean.iter().copied().collect();
        Ok(stats::sample_std(&values))
    }

    /// Median per-pixel temporal standard deviation.
    ///
    /// For short dark exposures the per-pixel temporal scatter is dominated
    /// by read noise, and the median is robust against hot pixels.
    pub fn median_read_noise(&self) -> Result<f64, SimError> {
        let std_dev = self.std_dev()?;
        let values: Vec<f64> = std_dev.iter().copied().collect();
        Ok(stats::median(&values).unwrap_or(0.0))
    }

    /// Detect hot pixels as sites whose temporal mean sits more than
    /// `threshold_sigma` population standard deviations above the population
    /// mean.
    pub fn detect_hot_pixels(&self, threshold_sigma: f64) -> Result<HotPixelMap, SimError> {
        let mean = self.mean()?;
        let values: Vec<f64> = mean.iter().copied().collect();
        let global_mean = stats::mean(&values);
        let global_std = stats::sample_std(&values);
        let threshold = global_mean + threshold_sigma * global_std;

        let mut map = HotPixelMap::new(self.shape);
        for ((y, x), &value) in mean.indexed_iter() {
            if value > threshold {
                map.add_pixel(x, y);
            }
        }

        Ok(map)
    }

    /// Summary statistics for reporting
    pub fn summary(&self) -> Result<StackSummary, SimError> {
        Ok(StackSummary {
            num_frames: self.frames.len(),
            shape: self.shape,
            global_mean: self.global_mean()?,
            global_std_of_means: self.global_std_of_means()?,
            median_read_noise: self.median_read_noise()?,
        })
    }
}
