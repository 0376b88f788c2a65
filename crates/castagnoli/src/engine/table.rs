//! Table-driven CRC-32C: byte-at-a-time and slicing-by-4.
//!
//! For each aligned 4-byte word:
//! 1. XOR the little-endian word into the register
//! 2. Look up each byte in the row for its distance from the word's end
//! 3. XOR the four entries together
//!
//! The four lookups are independent, which hides most of their latency.

#![allow(clippy::indexing_slicing)] // table indices are `u8` values into 256-entry rows

use crate::tables::TABLES;

/// Byte-at-a-time, one row-0 lookup per byte.
#[inline]
#[must_use]
pub fn bytewise(mut crc: u32, data: &[u8]) -> u32 {
  let t0 = &TABLES.0[0];
  for &b in data {
    crc = (crc >> 8) ^ t0[((crc as u8) ^ b) as usize];
  }
  crc
}

/// Slicing-by-4 over the 4-byte-aligned middle of `data`; the unaligned
/// head and the tail go through [`bytewise`].
#[must_use]
pub fn slice4(crc: u32, data: &[u8]) -> u32 {
  let head_len = data.as_ptr().align_offset(4).min(data.len());
  let (head, body) = data.split_at(head_len);
  let mut crc = bytewise(crc, head);

  let t = &TABLES.0;
  let (words, tail) = body.as_chunks::<4>();
  for w in words {
    let [b0, b1, b2, b3] = (crc ^ u32::from_le_bytes(*w)).to_le_bytes();
    crc = t[3][b0 as usize] ^ t[2][b1 as usize] ^ t[1][b2 as usize] ^ t[0][b3 as usize];
  }

  bytewise(crc, tail)
}
