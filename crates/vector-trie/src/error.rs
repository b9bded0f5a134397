//! Error types for trie configuration and filter derivation

use thiserror::Error;

/// Errors reported while validating a configuration or deriving the filter
/// parameters it implies.
///
/// All of these surface at construction time: once a trie exists, its
/// mutation and query paths cannot fail (a removal that finds nothing is a
/// normal `false` outcome, not an error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported bits per level: {got} (this design fixes it at {supported})")]
    UnsupportedBitsPerLevel { got: u8, supported: u8 },

    #[error("filter size exponent out of range: {got} (must be between {min} and {max})")]
    FilterExponentOutOfRange { got: u8, min: u8, max: u8 },

    #[error("filter size {size_bits} bits leaves no searchable prime below 2^{max_prime_bits}")]
    FilterTooLarge { size_bits: u64, max_prime_bits: u8 },

    #[error("filter must expect at least one element, got {expected}")]
    NoExpectedElements { expected: i64 },
}
