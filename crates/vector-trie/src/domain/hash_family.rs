//! Depth-seeded universal hash family for membership filters
//!
//! Filters are only comparable bit-for-bit when they map a key to the same
//! positions. Every filter at one trie depth therefore derives its
//! parameters from the depth alone: a prime modulus found by seeded search
//! above the filter size, and `k` linear-congruential coefficient pairs
//! drawn from the same seeded generator. Two tries built with the same
//! configuration produce identical families at every depth, which is what
//! makes the intersection engine's filter ANDs meaningful.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;

/// Largest bit length a candidate prime may have: keeps `P^2` below `2^62`
/// so the product of two operands reduced mod `P` fits an `i64` without
/// wrapping.
const MAX_PRIME_BITS: u8 = 31;

/// Witnesses making Miller-Rabin exact for every 64-bit integer.
const MILLER_RABIN_WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// One hash function `x -> ((x * a) mod P + b) mod P`, reduced modulo the
/// filter size at the end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HashPair {
    a: i64,
    b: i64,
}

/// Hash parameters shared by every filter at one trie depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashFamily {
    /// Prime modulus, strictly greater than `size_bits`.
    modulus: i64,
    /// `k` independent coefficient pairs, `1 <= a, b <= modulus`.
    pairs: Vec<HashPair>,
    /// Bit-array length the positions are reduced into.
    size_bits: usize,
}

impl HashFamily {
    /// Derive a family from a seed.
    ///
    /// The hash count is `max(1, floor(ln 2 * size_bits / expected_count))`.
    /// The prime search draws odd candidates one bit longer than
    /// `size_bits` from the seeded generator until one passes a
    /// deterministic Miller-Rabin test; the candidate range holds enough
    /// primes that the loop always terminates. Sizes whose candidates would
    /// exceed [`MAX_PRIME_BITS`] are rejected here, at construction.
    pub fn derive(seed: u64, size_bits: u64, expected_count: i64) -> Result<Self, ConfigError> {
        if expected_count <= 0 {
            return Err(ConfigError::NoExpectedElements {
                expected: expected_count,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let modulus = find_prime_above(&mut rng, size_bits)?;

        let k = (core::f64::consts::LN_2 * size_bits as f64 / expected_count as f64).floor();
        let k = (k as i64).max(1) as usize;

        let pairs = (0..k)
            .map(|_| HashPair {
                a: rng.gen_range(1..=modulus),
                b: rng.gen_range(1..=modulus),
            })
            .collect();

        Ok(Self {
            modulus,
            pairs,
            size_bits: size_bits as usize,
        })
    }

    /// Number of hash functions in the family.
    pub fn hash_count(&self) -> usize {
        self.pairs.len()
    }

    /// Bit-array length positions are reduced into.
    pub fn size_bits(&self) -> usize {
        self.size_bits
    }

    /// The prime modulus.
    pub fn modulus(&self) -> i64 {
        self.modulus
    }

    /// Bit position of `key` under function `index`.
    ///
    /// Operands are reduced to true non-negative residues mod `P` before
    /// the multiply, so the widest intermediate is below `P^2 < 2^62` and
    /// signed 64-bit arithmetic cannot wrap. The result is always in
    /// `[0, size_bits)`, for any `i64` key including negative bit patterns.
    #[inline]
    pub fn position(&self, index: usize, key: i64) -> usize {
        let pair = &self.pairs[index];
        let p = self.modulus;
        let x = key.rem_euclid(p);
        let h = (x * pair.a).rem_euclid(p);
        // h < P and b <= P, so the sum stays far from the i64 edge.
        let h = (h + pair.b) % p;
        (h % self.size_bits as i64) as usize
    }
}

/// Find a prime strictly greater than `size_bits` by seeded search.
fn find_prime_above(rng: &mut StdRng, size_bits: u64) -> Result<i64, ConfigError> {
    let bits = u64::BITS - size_bits.leading_zeros() + 1;
    if bits > u32::from(MAX_PRIME_BITS) {
        return Err(ConfigError::FilterTooLarge {
            size_bits,
            max_prime_bits: MAX_PRIME_BITS,
        });
    }

    // Candidates carry exactly `bits` bits, so every one of them already
    // exceeds size_bits; only primality is left to check.
    let low = 1u64 << (bits - 1);
    let high = 1u64 << bits;
    loop {
        let candidate = rng.gen_range(low..high) | 1;
        if is_prime(candidate) {
            return Ok(candidate as i64);
        }
    }
}

/// Deterministic Miller-Rabin, exact for all `u64` inputs.
fn is_prime(n: u64) -> bool {
    match n {
        0 | 1 => return false,
        2 | 3 => return true,
        _ if n % 2 == 0 => return false,
        _ => {}
    }

    // n - 1 = d * 2^s with d odd
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for &a in &MILLER_RABIN_WITNESSES {
        if a % n == 0 {
            continue;
        }
        let mut x = pow_mod(a % n, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[inline]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}
