//! Parallel field sampling with deterministic seeding.
//!
//! Frames are filled in row chunks processed in parallel. Each chunk derives
//! its own RNG from the base seed plus the chunk index, so a seeded call
//! produces the same frame regardless of how rayon schedules the chunks.

use ndarray::{Array2, ArrayViewMut2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Poisson};
use rayon::prelude::*;

/// Rows per parallel chunk
const CHUNK_ROWS: usize = 64;

/// Poisson means at or above this are drawn from a clamped normal
/// approximation, which is numerically stable and much faster for large
/// means
pub(crate) const POISSON_NORMAL_APPROX_THRESHOLD: f64 = 20.0;

/// Fill a zeroed field in parallel row chunks.
///
/// `fill` is invoked once per chunk with a mutable view and a chunk-local
/// RNG seeded from `seed + chunk_index`.
pub(crate) fn fill_in_parallel_chunks<F>(dim: (usize, usize), seed: u64, fill: F) -> Array2<f64>
where
    F: Fn(&mut ArrayViewMut2<f64>, &mut StdRng) + Send + Sync,
{
    let mut field = Array2::<f64>::zeros(dim);

    field
        .axis_chunks_iter_mut(Axis(0), CHUNK_ROWS)
        .into_par_iter()
        .enumerate()
        .for_each(|(chunk_idx, mut chunk)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chunk_idx as u64));
            fill(&mut chunk, &mut rng);
        });

    field
}

/// Field of independent Poisson counts with a common mean.
///
/// A non-positive mean yields an all-zero field: zero thermal rate means
/// zero counts, with no distribution to sample.
pub(crate) fn poisson_field(dim: (usize, usize), mean: f64, seed: u64) -> Array2<f64> {
    if mean <= 0.0 {
        return Array2::zeros(dim);
    }

    if mean < POISSON_NORMAL_APPROX_THRESHOLD {
        fill_in_parallel_chunks(dim, seed, |chunk, rng| {
            let dist = Poisson::new(mean).expect("Poisson mean must be positive");
            chunk.iter_mut().for_each(|px| *px = dist.sample(rng));
        })
    } else {
        fill_in_parallel_chunks(dim, seed, |chunk, rng| {
            let dist =
                Normal::new(mean, mean.sqrt()).expect("normal approximation mean must be finite");
            chunk.iter_mut().for_each(|px| *px = dist.sample(rng).max(0.0));
        })
    }
}

/// Field of independent zero-mean Gaussian samples.
///
/// Zero sigma yields an all-zero field.
pub(crate) fn gaussian_field(dim: (usize, usize), std_dev: f64, seed: u64) -> Array2<f64> {
    if std_dev <= 0.0 {
        return Array2::zeros(dim);
    }

    fill_in_parallel_chunks(dim, seed, |chunk, rng| {
        let dist = Normal::new(0.0, std_dev).expect("Gaussian sigma must be non-negative");
        chunk.iter_mut().for_each(|px| *px = dist.sample(rng));
    })
}

/// Single Poisson draw, with the same normal-approximation switch as
/// [`poisson_field`]. Used for the sparse hot-pixel population where per-site
/// means are far beyond the exact sampler's comfortable range.
pub(crate) fn sample_poisson(mean: f64, rng: &mut StdRng) -> f64 {
    if mean <= 0.0 {
        0.0
    } else if mean < POISSON_NORMAL_APPROX_THRESHOLD {
        Poisson::new(mean)
            .expect("Poisson mean must be positive")
            .sample(rng)
    } else {
        Normal::new(mean, mean.sqrt())
            .expect("normal approximation mean must be finite")
            .sample(rng)
            .max(0.0)
    }
}
