//! Internal macros for CRC-32C kernel generation.
//!
//! Every instruction set runs the same kernels and merge shift; only the primitives
//! differ. The invoking module must have these in scope:
//!
//! - `crc_u8(u32, u8) -> u32`, `crc_u16(u32, u16) -> u32`,
//!   `crc_u32(u32, u32) -> u32`, `crc_u64(u32, u64) -> u32`: one step of the
//!   raw CRC-32C register over a little-endian operand.
//! - `clmul(u64, u64) -> u128`: carry-less multiply.
//!
//! All kernels take and return the raw register (no pre/post inversion).

/// Generate `shift`, `scalar`, `interleave3`, `fold128` and `hybrid` for one
/// ISA.
///
/// # Arguments
///
/// - `scalar`: attributes for the scalar kernel (e.g. the CRC target feature)
/// - `parallel`: attributes for the kernels that also need carry-less multiply
macro_rules! define_crc32c_kernels {
  (
    scalar: [$(#[$scalar_attr:meta])*],
    parallel: [$(#[$parallel_attr:meta])*] $(,)?
  ) => {
    /// `crc_u64(0, clmul(crc, k))`: advances `crc` by the distance `k` was
    /// derived for (see [`shift_constant`](crate::gf2::shift_constant)).
    $(#[$parallel_attr])*
    pub fn shift(crc: u32, k: u32) -> u32 {
      crc_u64(0, clmul(u64::from(crc), u64::from(k)) as u64)
    }

    /// Hardware-CRC scalar kernel: align to 8 bytes, 64-bit bulk loop, tail.
    $(#[$scalar_attr])*
    pub fn scalar(crc: u32, data: &[u8]) -> u32 {
      let mut crc = crc;
      let mut rest = data;

      if rest.as_ptr() as usize & 1 != 0
        && let Some((&b, tail)) = rest.split_first()
      {
        crc = crc_u8(crc, b);
        rest = tail;
      }
      if rest.as_ptr() as usize & 3 != 0
        && let Some((w, tail)) = rest.split_first_chunk::<2>()
      {
        crc = crc_u16(crc, u16::from_le_bytes(*w));
        rest = tail;
      }
      if rest.as_ptr() as usize & 7 != 0
        && let Some((w, tail)) = rest.split_first_chunk::<4>()
      {
        crc = crc_u32(crc, u32::from_le_bytes(*w));
        rest = tail;
      }

      let (words, mut rest) = rest.as_chunks::<8>();
      for w in words {
        crc = crc_u64(crc, u64::from_le_bytes(*w));
      }

      if let Some((w, tail)) = rest.split_first_chunk::<4>() {
        crc = crc_u32(crc, u32::from_le_bytes(*w));
        rest = tail;
      }
      if let Some((w, tail)) = rest.split_first_chunk::<2>() {
        crc = crc_u16(crc, u16::from_le_bytes(*w));
        rest = tail;
      }
      if let Some(&b) = rest.first() {
        crc = crc_u8(crc, b);
      }
      crc
    }

    /// Three interleaved CRC streams per 1 KiB block, merged by carry-less
    /// multiply. Falls back to [`scalar`] below two blocks.
    $(#[$parallel_attr])*
    pub fn interleave3(crc: u32, data: &[u8]) -> u32 {
      use $crate::constants::{INTERLEAVE_BLOCK, INTERLEAVE_K, INTERLEAVE_LANE_WORDS};

      let head_len = data.as_ptr().align_offset(8).min(data.len());
      let (head, body) = data.split_at(head_len);
      if body.len() < 2 * INTERLEAVE_BLOCK {
        return scalar(crc, data);
      }

      let mut crc = scalar(crc, head);
      let (blocks, remainder) = body.as_chunks::<INTERLEAVE_BLOCK>();
      for block in blocks {
        let (words, _) = block.as_chunks::<8>();
        let (s0, rest) = words.split_at(INTERLEAVE_LANE_WORDS);
        let (s1, rest) = rest.split_at(INTERLEAVE_LANE_WORDS);
        let (s2, trailer) = rest.split_at(INTERLEAVE_LANE_WORDS);

        let (mut c0, mut c1, mut c2) = (crc, 0u32, 0u32);
        for ((w0, w1), w2) in s0.iter().zip(s1).zip(s2) {
          c0 = crc_u64(c0, u64::from_le_bytes(*w0));
          c1 = crc_u64(c1, u64::from_le_bytes(*w1));
          c2 = crc_u64(c2, u64::from_le_bytes(*w2));
        }

        crc = shift(c0, INTERLEAVE_K[0]) ^ shift(c1, INTERLEAVE_K[1]) ^ c2;
        for w in trailer {
          crc = crc_u64(crc, u64::from_le_bytes(*w));
        }
      }

      scalar(crc, remainder)
    }

    /// 128-bit carry-less folding over 16-byte blocks, reduced through the
    /// CRC instruction. Falls back to [`scalar`] below two blocks.
    $(#[$parallel_attr])*
    pub fn fold128(crc: u32, data: &[u8]) -> u32 {
      use $crate::constants::{FOLD_BLOCK, FOLD_K};

      let (blocks, remainder) = data.as_chunks::<FOLD_BLOCK>();
      let Some((first, rest)) = blocks.split_first() else {
        return scalar(crc, data);
      };
      if rest.is_empty() {
        return scalar(crc, data);
      }

      let mut acc = u128::from_le_bytes(*first) ^ u128::from(crc);
      for block in rest {
        acc = clmul(acc as u64, u64::from(FOLD_K[0]))
          ^ clmul((acc >> 64) as u64, u64::from(FOLD_K[1]))
          ^ u128::from_le_bytes(*block);
      }

      let crc = crc_u64(crc_u64(0, acc as u64), (acc >> 64) as u64);
      scalar(crc, remainder)
    }

    /// Seven CRC lanes and one folded lane per 4 KiB block. Falls back to
    /// [`scalar`] below two blocks.
    $(#[$parallel_attr])*
    #[allow(clippy::indexing_slicing)] // lane/round indices are bounded by block geometry
    pub fn hybrid(crc: u32, data: &[u8]) -> u32 {
      use $crate::constants::{FOLD_BLOCK, FOLD_K, HYBRID_BLOCK, HYBRID_K, HYBRID_LANES, HYBRID_ROUNDS};

      if data.len() < 2 * HYBRID_BLOCK {
        return scalar(crc, data);
      }

      let mut crc = crc;
      let (blocks, remainder) = data.as_chunks::<HYBRID_BLOCK>();
      for block in blocks {
        // Lane j, round r is word j * HYBRID_ROUNDS + r.
        let (words, _) = block.as_chunks::<FOLD_BLOCK>();
        let folded = (HYBRID_LANES - 1) * HYBRID_ROUNDS;

        let mut lanes = [0u32; HYBRID_LANES - 1];
        lanes[0] = crc;
        let mut acc = 0u128;

        for r in 0..HYBRID_ROUNDS {
          for (j, lane) in lanes.iter_mut().enumerate() {
            let v = u128::from_le_bytes(words[j * HYBRID_ROUNDS + r]);
            *lane = crc_u64(crc_u64(*lane, v as u64), (v >> 64) as u64);
          }
          acc = clmul(acc as u64, u64::from(FOLD_K[0]))
            ^ clmul((acc >> 64) as u64, u64::from(FOLD_K[1]))
            ^ u128::from_le_bytes(words[folded + r]);
        }

        let mut merged = crc_u64(crc_u64(0, acc as u64), (acc >> 64) as u64);
        for (&lane, &k) in lanes.iter().zip(HYBRID_K.iter()) {
          merged ^= shift(lane, k);
        }
        crc = merged;
      }

      scalar(crc, remainder)
    }
  };
}
