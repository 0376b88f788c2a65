//! Block geometry and distance constants for the parallel engines.
//!
//! Every multiplier is `x^(d-33) mod P` for the bit distance `d` it has to
//! cover (see [`gf2`](crate::gf2) for why 33), evaluated at compile time by
//! [`shift_constant`].

use crate::gf2::shift_constant;

// ─────────────────────────────────────────────────────────────────────────────
// Interleaved 3-stream hardware CRC
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes per interleaved block.
pub const INTERLEAVE_BLOCK: usize = 1024;
/// 64-bit words per stream.
pub const INTERLEAVE_LANE_WORDS: usize = 42;
/// Words after the three streams, fed serially into the merged CRC.
pub const INTERLEAVE_TRAILER_WORDS: usize = INTERLEAVE_BLOCK / 8 - 3 * INTERLEAVE_LANE_WORDS;

const LANE_BITS: u64 = (INTERLEAVE_LANE_WORDS * 64) as u64;

/// Multipliers for streams 0 and 1. Stream 0 sits two streams before the
/// merge point, stream 1 one stream; stream 2 is merged as-is.
pub const INTERLEAVE_K: [u32; 2] = [shift_constant(2 * LANE_BITS), shift_constant(LANE_BITS)];

// ─────────────────────────────────────────────────────────────────────────────
// 128-bit carry-less folding
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes per fold step.
pub const FOLD_BLOCK: usize = 16;

/// Fold multipliers `[k0, k1]` for the low and high 64-bit halves of the
/// accumulator. Folding forward by 128 bits moves the low half (the earlier
/// bytes) 192 bits and the high half 128 bits.
pub const FOLD_K: [u32; 2] = [shift_constant(64 + 128), shift_constant(128)];

// ─────────────────────────────────────────────────────────────────────────────
// Hybrid: seven CRC lanes + one folded lane
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes per hybrid block.
pub const HYBRID_BLOCK: usize = 4096;
/// Lanes per hybrid block; the last one is folded with carry-less multiply.
pub const HYBRID_LANES: usize = 8;
/// Bytes per lane.
pub const HYBRID_LANE: usize = HYBRID_BLOCK / HYBRID_LANES;
/// Rounds per block; each round advances every lane by one fold step.
pub const HYBRID_ROUNDS: usize = HYBRID_LANE / FOLD_BLOCK;

const HYBRID_LANE_BITS: u64 = (HYBRID_LANE * 8) as u64;

/// Multipliers for CRC lanes 0..7: lane `j` is `7 - j` lanes from the end.
#[allow(clippy::indexing_slicing)]
pub const HYBRID_K: [u32; HYBRID_LANES - 1] = {
  let mut k = [0u32; HYBRID_LANES - 1];
  let mut j = 0;
  while j < HYBRID_LANES - 1 {
    k[j] = shift_constant(HYBRID_LANE_BITS * (HYBRID_LANES - 1 - j) as u64);
    j += 1;
  }
  k
};
