//! Slice-by-4 lookup table, derived from [`POLY`](crate::POLY) at compile time.
//!
//! Row 0 is the classic Sarwate byte table. Row `k` maps a byte to its CRC
//! contribution when it sits `k` bytes further from the end of a 4-byte word:
//!
//! ```text
//! table[0][i] = crc_byte(i)
//! table[k][i] = (table[k-1][i] >> 8) ^ table[0][table[k-1][i] & 0xFF]
//! ```

// SAFETY: indices are loop counters bounded by the array sizes (0..256, 0..4).
#![allow(clippy::indexing_slicing)]

use crate::POLY;

/// Number of table rows (slice-by-4).
pub const ROWS: usize = 4;

/// 64-byte aligned wrapper so each row starts on a cache line.
#[repr(align(64))]
#[derive(Debug)]
pub struct Aligned64<T>(pub T);

/// The slice-by-4 table.
pub static TABLES: Aligned64<[[u32; 256]; ROWS]> = Aligned64(generate());

/// CRC of a single byte from a zero register, bit by bit.
#[must_use]
pub const fn byte_entry(index: u8) -> u32 {
  let mut crc = index as u32;
  let mut i = 0;
  while i < 8 {
    let mask = 0u32.wrapping_sub(crc & 1);
    crc = (crc >> 1) ^ (POLY & mask);
    i += 1;
  }
  crc
}

/// Build all four rows.
#[must_use]
pub const fn generate() -> [[u32; 256]; ROWS] {
  let mut table = [[0u32; 256]; ROWS];

  let mut i = 0usize;
  while i < 256 {
    table[0][i] = byte_entry(i as u8);
    i += 1;
  }

  let mut k = 1usize;
  while k < ROWS {
    i = 0;
    while i < 256 {
      let prev = table[k - 1][i];
      table[k][i] = (prev >> 8) ^ table[0][(prev & 0xFF) as usize];
      i += 1;
    }
    k += 1;
  }

  table
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn well_known_entries() {
    let t = &TABLES.0;
    assert_eq!(t[0][0], 0);
    assert_eq!(t[0][1], 0xF26B_8303);
    assert_eq!(t[0][128], POLY);
    assert_eq!(t[0][255], 0xAD7D_5351);
  }

  #[test]
  fn rows_are_shifted_byte_tables() {
    // table[k][i] is the CRC of byte i followed by k zero bytes.
    let t = &TABLES.0;
    for k in 0..ROWS {
      for i in [0usize, 1, 2, 0x55, 0x80, 0xAA, 0xFF] {
        let mut msg = [0u8; ROWS];
        msg[0] = i as u8;
        let expected = crate::engine::naive::compute(0, &msg[..=k]);
        assert_eq!(t[k][i], expected, "row {k} index {i}");
      }
    }
  }

  #[test]
  fn table_is_aligned() {
    assert_eq!(core::ptr::addr_of!(TABLES) as usize % 64, 0);
  }
}
