//! Software stand-ins for the CRC and carry-less multiply instructions.
//!
//! The kernels generated here follow exactly the same control flow as the
//! hardware ones, so they are what the engine runs when the CPU lacks the
//! instructions, and what the equivalence tests exercise on any host.

#![allow(clippy::indexing_slicing)] // table indices are `u8` values into 256-entry rows

use super::{Kernel, ShiftKernel};
use crate::tables::TABLES;

/// One byte step.
#[inline]
#[must_use]
pub fn crc_u8(crc: u32, v: u8) -> u32 {
  (crc >> 8) ^ TABLES.0[0][((crc as u8) ^ v) as usize]
}

#[inline]
#[must_use]
pub fn crc_u16(crc: u32, v: u16) -> u32 {
  let [b0, b1] = v.to_le_bytes();
  crc_u8(crc_u8(crc, b0), b1)
}

/// One 32-bit step through all four table rows.
#[inline]
#[must_use]
pub fn crc_u32(crc: u32, v: u32) -> u32 {
  let [b0, b1, b2, b3] = (crc ^ v).to_le_bytes();
  let t = &TABLES.0;
  t[3][b0 as usize] ^ t[2][b1 as usize] ^ t[1][b2 as usize] ^ t[0][b3 as usize]
}

/// One 64-bit step, the software `crc32q` / `crc32cx`.
#[inline]
#[must_use]
pub fn crc_u64(crc: u32, v: u64) -> u32 {
  crc_u32(crc_u32(crc, v as u32), (v >> 32) as u32)
}

#[inline]
fn clmul(a: u64, b: u64) -> u128 {
  crate::gf2::clmul(a, b)
}

define_crc32c_kernels! {
  scalar: [#[must_use]],
  parallel: [#[must_use]],
}

pub(crate) const SHIFT: ShiftKernel = ShiftKernel {
  name: "portable/shift",
  func: shift,
};
pub(crate) const SCALAR: Kernel = Kernel {
  name: "portable/scalar",
  func: scalar,
};
pub(crate) const INTERLEAVE3: Kernel = Kernel {
  name: "portable/interleave3",
  func: interleave3,
};
pub(crate) const FOLD128: Kernel = Kernel {
  name: "portable/fold128",
  func: fold128,
};
pub(crate) const HYBRID: Kernel = Kernel {
  name: "portable/hybrid",
  func: hybrid,
};

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;
  use crate::engine::naive;

  #[test]
  fn primitives_match_naive() {
    let crc = 0x1357_9BDF;
    assert_eq!(crc_u8(crc, 0xA5), naive::compute(crc, &[0xA5]));
    assert_eq!(crc_u16(crc, 0xBEEF), naive::compute(crc, &0xBEEFu16.to_le_bytes()));
    assert_eq!(crc_u32(crc, 0xDEAD_BEEF), naive::compute(crc, &0xDEAD_BEEFu32.to_le_bytes()));
    let v = 0x0123_4567_89AB_CDEFu64;
    assert_eq!(crc_u64(crc, v), naive::compute(crc, &v.to_le_bytes()));
  }

  #[test]
  fn shift_is_clmul_then_reduce() {
    for (crc, k) in [(0u32, 0x1234_5678u32), (!0, !0), (0xE306_9283, 0xF20C_0DFE), (0x8000_0000, 0x493C_7D27)] {
      let expected = crate::gf2::reduce(crate::gf2::clmul(u64::from(crc), u64::from(k)) as u64);
      assert_eq!(shift(crc, k), expected, "{crc:#x} * {k:#x}");
    }
  }

  #[test]
  fn kernels_match_naive_across_block_boundaries() {
    let data: Vec<u8> = (0..3 * 4096 + 77).map(|i: u32| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
    for len in [0usize, 31, 32, 33, 2047, 2048, 2049, 3000, 8191, 8192, 8193, data.len()] {
      let input = &data[..len];
      let expected = naive::compute(!0, input);
      assert_eq!(scalar(!0, input), expected, "scalar len={len}");
      assert_eq!(interleave3(!0, input), expected, "interleave3 len={len}");
      assert_eq!(fold128(!0, input), expected, "fold128 len={len}");
      assert_eq!(hybrid(!0, input), expected, "hybrid len={len}");
    }
  }

  #[test]
  fn interleave_handles_misaligned_start() {
    let data: Vec<u8> = (0..2200u32).map(|i| (i * 13) as u8).collect();
    for offset in 0..8 {
      let input = &data[offset..];
      assert_eq!(interleave3(0x55AA_55AA, input), naive::compute(0x55AA_55AA, input), "offset={offset}");
    }
  }
}
