//! Bit-at-a-time CRC-32C, the reference every other engine is tested against.
//!
//! No tables and no hardware: each byte is XORed into the low byte of the
//! register and then shifted out one bit at a time, conditionally reducing by
//! [`POLY`](crate::POLY).

use crate::POLY;

/// Raw-register CRC-32C of `data`, starting from `crc`.
///
/// ```
/// use castagnoli::engine::naive;
///
/// assert_eq!(naive::compute(!0, b"123456789") ^ !0, 0xE306_9283);
/// ```
#[inline]
#[must_use]
pub const fn compute(mut crc: u32, data: &[u8]) -> u32 {
  let mut rest = data;
  while let [byte, tail @ ..] = rest {
    crc = step(crc, *byte);
    rest = tail;
  }
  crc
}

/// One byte, eight branch-free shift-and-reduce steps.
#[inline]
#[must_use]
pub const fn step(mut crc: u32, byte: u8) -> u32 {
  crc ^= byte as u32;
  let mut bit = 0;
  while bit < 8 {
    let mask = 0u32.wrapping_sub(crc & 1);
    crc = (crc >> 1) ^ (POLY & mask);
    bit += 1;
  }
  crc
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn check_value() {
    assert_eq!(compute(!0, b"123456789") ^ !0, 0xE306_9283);
  }

  #[test]
  fn empty_is_identity() {
    assert_eq!(compute(0x1234_5678, b""), 0x1234_5678);
  }

  #[test]
  fn zeros_and_ones() {
    assert_eq!(compute(!0, &[0u8; 32]) ^ !0, 0x8A91_36AA);
    assert_eq!(compute(!0, &[0xFFu8; 32]) ^ !0, 0x62A8_AB43);
  }

  #[test]
  fn const_evaluable() {
    const CHECK: u32 = compute(!0, b"123456789") ^ !0;
    assert_eq!(CHECK, 0xE306_9283);
  }
}
