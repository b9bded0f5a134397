//! Precomputed survivor table
//!
//! Maps every 16-bit presence mask to the ascending list of its set-bit
//! positions. Built once on first use, read-only and process-wide after
//! that; the intersection engine borrows offset slices straight out of it.

use lazy_static::lazy_static;
use smallvec::SmallVec;

/// Offsets of one entry: at most 16 positions, stored inline.
type SurvivorOffsets = SmallVec<[u8; 16]>;

lazy_static! {
    static ref SURVIVORS: Vec<SurvivorOffsets> = build_table();
}

fn build_table() -> Vec<SurvivorOffsets> {
    (0..=u16::MAX)
        .map(|mask| {
            let mut offsets = SurvivorOffsets::new();
            for bit in 0..16u8 {
                if mask & (1u16 << bit) != 0 {
                    offsets.push(bit);
                }
            }
            offsets
        })
        .collect()
}

/// Ascending positions of the set bits in `mask`.
pub fn survivors(mask: u16) -> &'static [u8] {
    &SURVIVORS[usize::from(mask)]
}
