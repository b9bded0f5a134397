//! Trie configuration and validation
//!
//! The shape of the trie is fixed by the design: 32-bit keys consumed in
//! 4-bit slices over 8 levels. The configuration keeps those choices
//! explicit, carries the per-depth filter sizing, and validates everything
//! up front so filter derivation cannot fail once a trie exists.
//!
//! # Example
//!
//! ```
//! use vector_trie::TrieConfigBuilder;
//!
//! let config = TrieConfigBuilder::new()
//!     .filter_size_exponent(18)
//!     .filter_pruning(false)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.filter_size_bits(3), 1 << 15);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of key bits consumed per trie level.
pub const BITS_PER_LEVEL: u8 = 4;

/// Width of a key in bits.
pub const KEY_BITS: u8 = 32;

/// Number of trie levels: root at depth 0, leaves at `HEIGHT - 1`.
pub const HEIGHT: u8 = KEY_BITS / BITS_PER_LEVEL;

/// Bits reserved for the depth component of a node handle.
pub const LOG_HEIGHT: u8 = 3;

/// Largest exponent for which the prime search above the filter size stays
/// comfortably inside `i64` when two reduced operands are multiplied.
const MAX_FILTER_EXPONENT: u8 = 29;

/// Smallest exponent that still gives the deepest level a non-degenerate
/// filter (`2^(exponent - depth)` bits at depth `HEIGHT - 1`).
const MIN_FILTER_EXPONENT: u8 = HEIGHT;

/// Construction-time tuning knobs for a [`VectorTrie`](crate::VectorTrie).
///
/// Every trie participating in one intersection must be built from a
/// compatible configuration, because membership filters at equal depth are
/// only comparable when they share size and hash parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieConfig {
    /// Key bits consumed per level. The design fixes this at 4 (16-bit
    /// presence vectors, a 2^16-entry survivor table); validation rejects
    /// every other value. The knob exists so the constraint is explicit
    /// and testable rather than buried in arithmetic.
    pub bits_per_level: u8,
    /// A node at depth `d` gets a membership filter of
    /// `2^(filter_size_exponent - d)` bits.
    pub filter_size_exponent: u8,
    /// Default for the pruning flag used by
    /// [`intersect_configured`](crate::intersect_configured). The explicit
    /// [`intersect`](crate::intersect) entry point overrides it per call.
    pub filter_pruning: bool,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            bits_per_level: BITS_PER_LEVEL,
            filter_size_exponent: 20,
            filter_pruning: true,
        }
    }
}

impl TrieConfig {
    /// Validate the configuration.
    ///
    /// Rejects unsupported level widths and any filter sizing whose prime
    /// search could leave the `i64`-safe range, per the fail-at-construction
    /// error model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bits_per_level != BITS_PER_LEVEL {
            return Err(ConfigError::UnsupportedBitsPerLevel {
                got: self.bits_per_level,
                supported: BITS_PER_LEVEL,
            });
        }

        if self.filter_size_exponent < MIN_FILTER_EXPONENT
            || self.filter_size_exponent > MAX_FILTER_EXPONENT
        {
            return Err(ConfigError::FilterExponentOutOfRange {
                got: self.filter_size_exponent,
                min: MIN_FILTER_EXPONENT,
                max: MAX_FILTER_EXPONENT,
            });
        }

        Ok(())
    }

    /// Membership-filter size in bits for a node at `depth`.
    pub fn filter_size_bits(&self, depth: u8) -> u64 {
        debug_assert!(depth < HEIGHT, "depth {depth} out of range");
        1u64 << (self.filter_size_exponent - depth)
    }

    /// Number of keys a node at `depth` can possibly cover: one per value
    /// of the remaining key bits below it.
    pub fn expected_elements(&self, depth: u8) -> i64 {
        debug_assert!(depth < HEIGHT, "depth {depth} out of range");
        1i64 << (KEY_BITS - BITS_PER_LEVEL * depth)
    }

    /// Whether two configurations produce comparable tries: equal slicing
    /// and equal filter sizing (the pruning default may differ).
    pub fn compatible_with(&self, other: &TrieConfig) -> bool {
        self.bits_per_level == other.bits_per_level
            && self.filter_size_exponent == other.filter_size_exponent
    }
}

/// Fluent builder for [`TrieConfig`] with validation at `build`.
#[derive(Clone, Debug, Default)]
pub struct TrieConfigBuilder {
    config: TrieConfig,
}

impl TrieConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits_per_level(mut self, bits: u8) -> Self {
        self.config.bits_per_level = bits;
        self
    }

    pub fn filter_size_exponent(mut self, exponent: u8) -> Self {
        self.config.filter_size_exponent = exponent;
        self
    }

    pub fn filter_pruning(mut self, enabled: bool) -> Self {
        self.config.filter_pruning = enabled;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<TrieConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
