//! Probabilistic membership filter with intersection-cardinality estimates
//!
//! A bloom filter over `i64` keys: `k` hash positions per key, false
//! positives possible, false negatives impossible. Beyond the usual
//! add/query pair it estimates the cardinality of the intersection of two
//! or more filters by ANDing their bit arrays and dividing the surviving
//! popcount by `k`. That estimate is biased and only meaningful between
//! filters sharing one [`HashFamily`]; the trie guarantees this by seeding
//! families from the depth alone.

use std::sync::Arc;

use bitvec::prelude::*;

use crate::domain::hash_family::HashFamily;
use crate::error::ConfigError;

/// Fixed-size bit array plus the hash family that indexes it.
#[derive(Clone, Debug)]
pub struct MembershipFilter {
    /// Bit array storing the filter state.
    bits: BitVec<u8, Lsb0>,
    /// Hash parameters, shared across all filters at one trie depth.
    family: Arc<HashFamily>,
}

impl MembershipFilter {
    /// Create a filter with freshly derived hash parameters.
    ///
    /// `seed` fully determines the parameters: two filters created with the
    /// same seed, size and expected count index their bits identically and
    /// may be intersected.
    pub fn new(seed: u64, size_in_bits: u64, expected_count: i64) -> Result<Self, ConfigError> {
        let family = HashFamily::derive(seed, size_in_bits, expected_count)?;
        Ok(Self::with_family(Arc::new(family)))
    }

    /// Create a filter around an existing family.
    ///
    /// This is the constructor the trie uses: one family per depth, shared
    /// by every node at that depth.
    pub fn with_family(family: Arc<HashFamily>) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; family.size_bits()],
            family,
        }
    }

    /// Set all `k` positions for `key`.
    pub fn add(&mut self, key: i64) {
        for i in 0..self.family.hash_count() {
            let pos = self.family.position(i, key);
            self.bits.set(pos, true);
        }
    }

    /// True iff every position for `key` is set. May report keys that were
    /// never added; never misses a key that was.
    pub fn query(&self, key: i64) -> bool {
        (0..self.family.hash_count()).all(|i| self.bits[self.family.position(i, key)])
    }

    /// Estimate how many keys two filters have in common.
    ///
    /// ANDs the bit arrays and divides the popcount by `k`. Biased, and
    /// only defined for filters sharing a family.
    ///
    /// # Panics
    /// Panics if the filters differ in size or hash count.
    pub fn intersect_count(&self, other: &MembershipFilter) -> i64 {
        Self::intersect_count_multiway(&[self, other])
    }

    /// Estimate the cardinality of the intersection of all `filters`.
    ///
    /// ANDs every bit array word-by-word (nothing is materialized) and
    /// divides the surviving popcount by the first filter's hash count.
    /// An empty slice estimates 0.
    ///
    /// # Panics
    /// Panics if the filters differ in size or hash count.
    pub fn intersect_count_multiway(filters: &[&MembershipFilter]) -> i64 {
        let Some(first) = filters.first() else {
            return 0;
        };
        for other in &filters[1..] {
            assert_eq!(
                first.size_bits(),
                other.size_bits(),
                "cannot intersect filters of different sizes"
            );
            assert_eq!(
                first.hash_count(),
                other.hash_count(),
                "cannot intersect filters with different hash counts"
            );
        }

        let words = first.bits.as_raw_slice();
        let mut ones: i64 = 0;
        for (index, &word) in words.iter().enumerate() {
            let mut and = word;
            for other in &filters[1..] {
                and &= other.bits.as_raw_slice()[index];
            }
            ones += i64::from(and.count_ones());
        }

        ones / first.hash_count() as i64
    }

    /// Number of hash functions (`k`).
    pub fn hash_count(&self) -> usize {
        self.family.hash_count()
    }

    /// Filter size in bits.
    pub fn size_bits(&self) -> usize {
        self.family.size_bits()
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// The hash family indexing this filter.
    pub fn family(&self) -> &Arc<HashFamily> {
        &self.family
    }
}
