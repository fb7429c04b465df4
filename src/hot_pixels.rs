//! Hot-pixel maps for simulated and measured sensor defects.
//!
//! A hot-pixel map records which pixel sites of a frame carry anomalously
//! high dark current. Maps are produced by the dark-frame generator when it
//! injects an outlier population, or by stack analysis when it detects one,
//! and can be saved to JSON for reuse.

use crate::frame::FrameShape;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Hot-pixel coordinates for a frame of a specific shape.
///
/// Coordinates are stored as (x, y) pairs. The shape the map was generated
/// for travels with it so masks and frames stay dimensionally consistent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotPixelMap {
    shape: FrameShape,
    pixels: Vec<(usize, usize)>,
}

impl HotPixelMap {
    /// Create an empty map for a frame of the given shape
    pub fn new(shape: FrameShape) -> Self {
        Self {
            shape,
            pixels: Vec::new(),
        }
    }

    /// Draw a random population of distinct hot-pixel sites.
    ///
    /// The number of sites is `fraction` of the pixel count, rounded to the
    /// nearest integer, so the injected population size is exact. Duplicate
    /// draws are rejected until the requested count is reached.
    pub fn random<R: Rng>(shape: FrameShape, fraction: f64, rng: &mut R) -> Self {
        let n_hot = (fraction * shape.pixel_count() as f64).round() as usize;

        let mut seen = HashSet::with_capacity(n_hot);
        let mut pixels = Vec::with_capacity(n_hot);
        while pixels.len() < n_hot {
            let x = rng.gen_range(0..shape.width);
            let y = rng.gen_range(0..shape.height);
            if seen.insert((x, y)) {
                pixels.push((x, y));
            }
        }

        Self { shape, pixels }
    }

    /// Add a pixel site to the map
    pub fn add_pixel(&mut self, x: usize, y: usize) {
        self.pixels.push((x, y));
    }

    /// Shape of the frame this map belongs to
    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    /// Hot-pixel coordinates as (x, y) pairs
    pub fn pixels(&self) -> &[(usize, usize)] {
        &self.pixels
    }

    /// Number of hot pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True when the map contains no hot pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Hot-pixel count as a fraction of the frame's pixel count
    pub fn fraction(&self) -> f64 {
        self.pixels.len() as f64 / self.shape.pixel_count() as f64
    }

    /// Check whether a pixel site is marked hot
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.pixels.contains(&(x, y))
    }

    /// Boolean mask with the map's shape, true at hot sites
    pub fn as_mask(&self) -> Array2<bool> {
        let mut mask = Array2::from_elem(self.shape.to_dim(), false);
        for &(x, y) in &self.pixels {
            mask[[y, x]] = true;
        }
        mask
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_add_and_query() {
        let mut map = HotPixelMap::new(FrameShape::new(100, 100));
        map.add_pixel(10, 20);
        map.add_pixel(30, 40);

        assert_eq!(map.len(), 2);
        assert!(map.contains(10, 20));
        assert!(!map.contains(20, 10));
        assert_eq!(map.fraction(), 2.0 / 10_000.0);
    }

    #[test]
    fn test_random_population_is_exact_and_distinct() {
        let shape = FrameShape::new(256, 256);
        let mut rng = StdRng::seed_from_u64(7);
        let map = HotPixelMap::random(shape, 1.0e-3, &mut rng);

        // 0.1% of 65536 pixels, rounded
        assert_eq!(map.len(), 66);

        let unique: HashSet<_> = map.pixels().iter().collect();
        assert_eq!(unique.len(), map.len());

        for &(x, y) in map.pixels() {
            assert!(shape.contains(x, y));
        }
    }

    #[test]
    fn test_random_is_seeded() {
        let shape = FrameShape::new(64, 64);
        let a = HotPixelMap::random(shape, 1.0e-2, &mut StdRng::seed_from_u64(3));
        let b = HotPixelMap::random(shape, 1.0e-2, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_mask_shape_and_sites() {
        let mut map = HotPixelMap::new(FrameShape::new(8, 4));
        map.add_pixel(7, 0);
        map.add_pixel(0, 3);

        let mask = map.as_mask();
        assert_eq!(mask.dim(), (4, 8));
        assert!(mask[[0, 7]]);
        assert!(mask[[3, 0]]);
        assert_eq!(mask.iter().filter(|&&v| v).count(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut map = HotPixelMap::new(FrameShape::new(32, 32));
        map.add_pixel(1, 2);
        map.add_pixel(3, 4);

        let file = tempfile::NamedTempFile::new().unwrap();
        map.save_to_file(file.path()).unwrap();
        let loaded = HotPixelMap::load_from_file(file.path()).unwrap();

        assert_eq!(map, loaded);
    }
}
