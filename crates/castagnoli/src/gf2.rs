//! GF(2) polynomial arithmetic for CRC-32C.
//!
//! Every value here is a polynomial of degree < 32 in the **reflected**
//! convention used by the hardware CRC instructions: bit 31 is the `x^0`
//! coefficient and bit 0 is `x^31`. In this convention "multiply by `x`" is a
//! right shift, and overflow past `x^31` is reduced by XORing
//! [`POLY`](crate::POLY).
//!
//! # Distance constants
//!
//! Merging a partial CRC `c` that sits `d` bits before the end of a message
//! means computing `c · x^d mod P`. With a carry-less multiply by a constant
//! `k` followed by the CRC-of-zero reduction:
//!
//! - `clmul(c, k)` of two reflected 32-bit operands lands in a 64-bit word
//!   whose reflected reading is `c·k·x` (the product has degree ≤ 62 and the
//!   word holds degree ≤ 63).
//! - `crc_u64(0, q)` computes `q · x^32 mod P`.
//!
//! So `reduce(clmul(c, k)) = c·k·x^33`, and the constant for distance `d` is
//! `k = x^(d-33) mod P`. [`shift_constant`] is the one place this formula
//! lives.

use crate::{POLY, engine::ShiftKernel};

/// The polynomial `1` (`x^0`) in reflected form.
pub const ONE: u32 = 0x8000_0000;

/// One shift-and-reduce step: multiply by `x` modulo P.
#[inline(always)]
const fn mul_x(v: u32) -> u32 {
  let mask = 0u32.wrapping_sub(v & 1);
  (v >> 1) ^ (POLY & mask)
}

/// `x^n mod P` by simulating `n` shift-and-reduce steps from `1`.
///
/// This is the bit-serial definition; it runs in `O(n)` and is the oracle
/// that [`xpow_mod`] and every shipped constant are checked against.
#[must_use]
pub const fn xn_mod_p(n: u32) -> u32 {
  let mut state = ONE;
  let mut i = 0;
  while i < n {
    state = mul_x(state);
    i += 1;
  }
  state
}

/// `a · b mod P` for reflected operands.
///
/// Walks `a` from its `x^0` coefficient (bit 31) downwards while `b` is
/// advanced by one power of `x` per step.
#[must_use]
pub const fn mul_mod(a: u32, mut b: u32) -> u32 {
  let mut product = 0u32;
  let mut m = ONE;
  while m != 0 {
    if a & m != 0 {
      product ^= b;
    }
    b = mul_x(b);
    m >>= 1;
  }
  product
}

/// `x^n mod P` by square-and-multiply, `O(log n)`.
///
/// Usable in `const` context without the step counts that the bit-serial
/// form would need for multi-kilobyte distances.
#[must_use]
pub const fn xpow_mod(mut n: u64) -> u32 {
  let mut result = ONE;
  let mut base = ONE >> 1; // x^1
  while n != 0 {
    if n & 1 != 0 {
      result = mul_mod(result, base);
    }
    base = mul_mod(base, base);
    n >>= 1;
  }
  result
}

/// Constant that advances a partial CRC by `distance_bits` through
/// `reduce(clmul(crc, k))`. See the module docs for the derivation.
///
/// # Panics
///
/// In const evaluation, if `distance_bits < 33`.
#[must_use]
pub const fn shift_constant(distance_bits: u64) -> u32 {
  assert!(distance_bits >= 33, "clmul reduction already advances by 33 bits");
  xpow_mod(distance_bits - 33)
}

/// Software 64×64 → 128-bit carry-less multiplication.
///
/// Bit-serial reference for `PCLMULQDQ` / `PMULL`.
#[must_use]
pub const fn clmul(a: u64, b: u64) -> u128 {
  let mut product = 0u128;
  let mut i = 0;
  while i < 64 {
    if (b >> i) & 1 != 0 {
      product ^= (a as u128) << i;
    }
    i += 1;
  }
  product
}

/// CRC-of-zero reduction in software: `crc_u64(0, q)` = `q · x^32 mod P`.
#[inline]
#[must_use]
pub fn reduce(q: u64) -> u32 {
  crate::engine::portable::crc_u64(0, q)
}

/// `crc_a · x^gap_bits mod P ⊕ crc_b`.
///
/// Joins two CRCs whose regions are `gap_bits` apart: with `crc_a` over `A`
/// and `crc_b` over `B`, `merge(crc_a, crc_b, 8 * len(B))` is the CRC of
/// `A ‖ B`. This holds for raw registers and for finalized (inverted) values
/// alike, since the inversion terms cancel.
///
/// Gaps of 33 bits and more go through the carry-less multiply and
/// CRC-of-zero reduction, on `PCLMULQDQ`/`PMULL` and the CRC instruction when
/// the CPU has them. Shorter gaps multiply by `x^gap_bits` directly.
#[inline]
#[must_use]
pub fn merge(crc_a: u32, crc_b: u32, gap_bits: u64) -> u32 {
  merge_with(ShiftKernel::current(), crc_a, crc_b, gap_bits)
}

/// [`merge`] through an explicit shift kernel.
/// `ShiftKernel::with_caps(Caps::NONE)` is the all-software form.
#[must_use]
pub fn merge_with(shift: ShiftKernel, crc_a: u32, crc_b: u32, gap_bits: u64) -> u32 {
  let shifted = if gap_bits >= 33 {
    shift.call(crc_a, xpow_mod(gap_bits - 33))
  } else {
    mul_mod(crc_a, xpow_mod(gap_bits))
  };
  shifted ^ crc_b
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::naive;

  #[test]
  fn small_powers_are_single_bits() {
    for n in 0..32 {
      assert_eq!(xn_mod_p(n), ONE >> n, "x^{n}");
      assert_eq!(xpow_mod(u64::from(n)), ONE >> n, "x^{n}");
    }
  }

  #[test]
  fn x32_is_the_polynomial() {
    // x^32 ≡ P - x^32, i.e. the low 32 coefficients of P.
    assert_eq!(xn_mod_p(32), POLY);
  }

  #[test]
  fn square_and_multiply_matches_bit_serial() {
    for n in [0u32, 1, 31, 32, 33, 63, 64, 95, 159, 1000, 2655, 5343, 28639] {
      assert_eq!(xpow_mod(u64::from(n)), xn_mod_p(n), "x^{n}");
    }
  }

  #[test]
  fn mul_mod_identity_and_commutativity() {
    let a = 0x1234_5678;
    let b = 0x9ABC_DEF0;
    assert_eq!(mul_mod(a, ONE), a);
    assert_eq!(mul_mod(ONE, b), b);
    assert_eq!(mul_mod(a, b), mul_mod(b, a));
    assert_eq!(mul_mod(a, 0), 0);
  }

  #[test]
  fn exponents_add() {
    assert_eq!(mul_mod(xn_mod_p(700), xn_mod_p(321)), xn_mod_p(1021));
  }

  #[test]
  fn clmul_small_products() {
    assert_eq!(clmul(0b11, 0b11), 0b101);
    assert_eq!(clmul(u64::MAX, 1), u128::from(u64::MAX));
    assert_eq!(clmul(1 << 63, 1 << 63), 1u128 << 126);
  }

  #[test]
  fn reduce_is_multiplication_by_x32() {
    // A reflected 64-bit word whose top half is zero holds a 32-bit value
    // times x^32.
    let v = 0xDEAD_BEEFu32;
    assert_eq!(reduce(u64::from(v)), mul_mod(v, xn_mod_p(64)));
  }

  #[test]
  fn merge_joins_adjacent_regions() {
    let data: alloc::vec::Vec<u8> = (0..300u32).map(|i| (i * 7 + 3) as u8).collect();
    for split in [0usize, 1, 3, 4, 5, 8, 100, 299, 300] {
      let (a, b) = data.split_at(split);
      let whole = naive::compute(!0, &data) ^ !0;
      let crc_a = naive::compute(!0, a) ^ !0;
      let crc_b = naive::compute(!0, b) ^ !0;
      assert_eq!(merge(crc_a, crc_b, 8 * b.len() as u64), whole, "split={split}");
    }
  }

  #[test]
  fn native_merge_matches_software() {
    let software = ShiftKernel::with_caps(crate::Caps::NONE);
    let native = ShiftKernel::current();
    let crcs = [0u32, 1, !0, 0xE306_9283, 0x8000_0000, 0x1234_5678];
    for &a in &crcs {
      for &b in &crcs {
        for gap in [0u64, 1, 32, 33, 34, 64, 8 * 777, 8 * 4096, 8 << 30] {
          let expected = mul_mod(a, xpow_mod(gap)) ^ b;
          assert_eq!(merge_with(software, a, b, gap), expected, "software a={a:#x} gap={gap}");
          assert_eq!(merge_with(native, a, b, gap), expected, "{} a={a:#x} gap={gap}", native.name);
          assert_eq!(merge(a, b, gap), expected);
        }
      }
    }
  }

  #[test]
  fn merge_with_zero_gap_is_xor() {
    assert_eq!(merge(0x1111_0000, 0x0000_2222, 0), 0x1111_2222);
  }
}
