//! Synthetic key-set generation
//!
//! Produces ordered sequences of distinct non-negative `i32` keys for
//! exercising trie intersections: uniform draws at a chosen density, sets
//! overlapping a base set by a chosen fraction, and clustered sets mixing
//! Gaussian and uniform sub-ranges. Everything is driven by one seeded
//! generator, so a given seed reproduces its key sets exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Upper bound of the global key range generators sample from.
pub const MAX_KEY_VALUE: i32 = 20_000_000;

/// Most sub-distributions a clustered set will mix.
const MAX_DISTRIBUTIONS: usize = 5;

/// Seeded source of synthetic key sets.
pub struct KeySetGenerator {
    rng: StdRng,
}

impl KeySetGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `size` keys drawn uniformly over a scope of `size / density`, so
    /// `density` is (approximately) the fraction of the scope that ends up
    /// populated.
    pub fn uniform(&mut self, size: usize, density: f64) -> Vec<i32> {
        assert!(density > 0.0 && density <= 1.0, "density must be in (0, 1]");
        let scope = (size as f64 / density) as i32;
        let keys = (0..size).map(|_| self.rng.gen_range(0..scope.max(1))).collect();
        sort_and_separate(keys)
    }

    /// `size` keys of which a fraction `overlap` is re-drawn from `base`
    /// and the rest is uniform over the global key range.
    pub fn overlapping(&mut self, size: usize, base: &[i32], overlap: f64) -> Vec<i32> {
        assert!((0.0..=1.0).contains(&overlap), "overlap must be in [0, 1]");
        assert!(!base.is_empty(), "base set must not be empty");

        let overlap_size = (size as f64 * overlap) as usize;
        let mut keys = Vec::with_capacity(size);
        for _ in 0..overlap_size {
            keys.push(base[self.rng.gen_range(0..base.len())]);
        }
        for _ in overlap_size..size {
            keys.push(self.rng.gen_range(0..MAX_KEY_VALUE));
        }
        sort_and_separate(keys)
    }

    /// `size` keys from a mixture of 1 to 5 sub-distributions, each either
    /// Gaussian or uniform over its own random sub-range of the key space.
    pub fn clustered(&mut self, size: usize) -> Vec<i32> {
        let mut keys = Vec::with_capacity(size);
        let distributions = self.rng.gen_range(1..=MAX_DISTRIBUTIONS);

        let mut remaining = size;
        for index in 0..distributions {
            let chunk = if index == distributions - 1 {
                remaining
            } else {
                // Leave at least one key for each distribution still to come.
                let left = distributions - index - 1;
                self.rng.gen_range(0..=remaining.saturating_sub(left))
            };
            self.sample_chunk(&mut keys, chunk);
            remaining -= chunk;
        }

        sort_and_separate(keys)
    }

    fn sample_chunk(&mut self, keys: &mut Vec<i32>, count: usize) {
        if count == 0 {
            return;
        }
        let span = MAX_KEY_VALUE - count as i32 - 1;
        let from = self.rng.gen_range(0..span);
        let to = self.rng.gen_range(from + 1..=span) + count as i32;

        if self.rng.gen_bool(0.5) {
            let normal = scoped_normal(from, to);
            for _ in 0..count {
                keys.push(sample_scoped(&mut self.rng, &normal, from, to));
            }
        } else {
            for _ in 0..count {
                keys.push(self.rng.gen_range(from..to));
            }
        }
    }
}

/// Truncated normal centered on the scope, with the scope's eighth as its
/// standard deviation.
fn scoped_normal(from: i32, to: i32) -> Normal<f64> {
    let mean = f64::from(from) + f64::from(to - from) / 2.0;
    let std_dev = f64::from(to - from) / 8.0;
    Normal::new(mean, std_dev).expect("scope spans at least one key")
}

/// Rejection-sample until the draw lands strictly inside the scope; about
/// one draw in 16,000 is rejected.
fn sample_scoped(rng: &mut StdRng, normal: &Normal<f64>, from: i32, to: i32) -> i32 {
    loop {
        let sample = normal.sample(rng) as i32;
        if sample > from && sample < to {
            return sample;
        }
    }
}

/// Sort and nudge duplicates upward so the output is strictly ascending.
fn sort_and_separate(mut keys: Vec<i32>) -> Vec<i32> {
    keys.sort_unstable();
    for index in 1..keys.len() {
        if keys[index] <= keys[index - 1] {
            keys[index] = keys[index - 1] + 1;
        }
    }
    keys
}
