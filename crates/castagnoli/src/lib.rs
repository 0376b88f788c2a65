//! CRC-32C (Castagnoli) with interchangeable engines.
//!
//! Reflected polynomial [`POLY`] = `0x82F63B78`, as used by iSCSI, SCTP,
//! ext4 and Btrfs. Every engine computes the same function:
//!
//! | engine | technique |
//! |--------|-----------|
//! | [`Engine::Naive`] | bit at a time (reference) |
//! | [`Engine::TableByte`] | byte table |
//! | [`Engine::TableSlice4`] | slicing-by-4 |
//! | [`Engine::HwScalar`] | SSE4.2 `crc32` / ARMv8 CRC |
//! | [`Engine::Interleave3`] | 3 CRC streams merged by carry-less multiply |
//! | [`Engine::Fold128`] | 128-bit carry-less folding |
//! | [`Engine::Hybrid`] | 7 CRC streams + 1 folded lane |
//!
//! [`compute`] picks one per call from the buffer length and the CPU.
//!
//! # Example
//!
//! ```rust
//! use castagnoli::Crc32c;
//!
//! let data = b"123456789";
//! assert_eq!(castagnoli::compute(0, data), 0xE306_9283);
//!
//! // Streaming
//! let mut hasher = Crc32c::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), 0xE306_9283);
//!
//! // Combining independently computed parts
//! let (a, b) = data.split_at(4);
//! let crc = Crc32c::combine(Crc32c::checksum(a), Crc32c::checksum(b), b.len());
//! assert_eq!(crc, 0xE306_9283);
//! ```
//!
//! # Conventions
//!
//! Public values (seeds and results) use the standard pre/post-inverted
//! convention, so `compute(0, b"")` is `0` and a result is a valid seed for
//! the next call. [`engine`] kernels work on the raw register.
//!
//! # no_std Support
//!
//! Disable default features for `no_std`. Capability detection then relies on
//! compile-time `target_feature`s and environment overrides are unavailable.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// Internal macros must be declared before modules that use them.
#[macro_use]
mod macros;

#[cfg(feature = "alloc")]
mod buffered;
pub mod caps;
pub mod config;
pub mod constants;
pub mod diag;
pub mod dispatch;
pub mod engine;
mod error;
pub mod gf2;
mod introspect;
pub mod parallel;
pub mod tables;

#[cfg(feature = "alloc")]
pub use buffered::BufferedCrc32c;
pub use caps::Caps;
pub use config::{Crc32cConfig, Crc32cForce, Crc32cTunables};
pub use engine::Engine;
pub use error::ParseForceError;
pub use gf2::merge;
pub use introspect::{DispatchInfo, backend_name, kernel_name_for_len};
#[cfg(feature = "std")]
pub use traits::io::{ChecksumReader, ChecksumWriter};
pub use traits::{Checksum, ChecksumCombine};

/// CRC-32C polynomial, reflected.
pub const POLY: u32 = 0x82F6_3B78;

/// CRC-32C of `data` continuing from `seed`.
///
/// `compute(compute(s, a), b) == compute(s, a ‖ b)`.
///
/// ```
/// assert_eq!(castagnoli::compute(0, b""), 0);
/// assert_eq!(castagnoli::compute(0, b"123456789"), 0xE306_9283);
/// ```
#[inline]
#[must_use]
pub fn compute(seed: u32, data: &[u8]) -> u32 {
  dispatch::compute(seed, data)
}

/// `crc(A ‖ B)` from `crc(A)`, `crc(B)` and `len(B)`, in `O(log len_b)`.
///
/// ```
/// let data = b"hello world";
/// let (a, b) = data.split_at(6);
/// let joined = castagnoli::combine(castagnoli::compute(0, a), castagnoli::compute(0, b), b.len());
/// assert_eq!(joined, castagnoli::compute(0, data));
/// ```
#[inline]
#[must_use]
pub fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
  merge(crc_a, crc_b, 8 * len_b as u64)
}

/// Streaming CRC-32C hasher.
///
/// `Crc32c` is `Send` and `Sync`; hashers over disjoint data can run on
/// separate threads and be joined with [`combine`](Self::combine).
#[derive(Clone, Debug)]
pub struct Crc32c {
  /// Raw register (inverted relative to the public value).
  state: u32,
  /// Raw register to return to on `reset`.
  initial: u32,
}

impl Crc32c {
  const INIT: u32 = !0;

  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      state: Self::INIT,
      initial: Self::INIT,
    }
  }

  /// Continue from a previously finalized CRC.
  ///
  /// ```
  /// use castagnoli::Crc32c;
  ///
  /// let (first, second) = b"hello world".split_at(6);
  /// let mut hasher = Crc32c::resume(Crc32c::checksum(first));
  /// hasher.update(second);
  /// assert_eq!(hasher.finalize(), Crc32c::checksum(b"hello world"));
  /// ```
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self {
      state: !crc,
      initial: !crc,
    }
  }

  /// One-shot CRC-32C of `data`.
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    compute(0, data)
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = dispatch::Dispatcher::current().update(self.state, data);
  }

  /// Current CRC. Does not consume the hasher.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    !self.state
  }

  /// Return to the state the hasher was created with.
  #[inline]
  pub fn reset(&mut self) {
    self.state = self.initial;
  }

  /// `crc(A ‖ B)` from `crc(A)`, `crc(B)` and `len(B)`.
  #[inline]
  #[must_use]
  pub fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    combine(crc_a, crc_b, len_b)
  }

  /// Kernel used for a representative 1 KiB buffer.
  #[must_use]
  pub fn backend_name() -> &'static str {
    backend_name()
  }

  /// Kernel the selector would choose for `len` bytes.
  #[must_use]
  pub fn kernel_name_for_len(len: usize) -> &'static str {
    kernel_name_for_len(len)
  }

  /// Effective configuration (overrides + thresholds).
  #[must_use]
  pub fn config() -> Crc32cConfig {
    dispatch::Dispatcher::current().config()
  }
}

impl Default for Crc32c {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Checksum for Crc32c {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Crc32c::new()
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Crc32c::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Crc32c::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> u32 {
    Crc32c::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Crc32c::reset(self);
  }

  #[inline]
  fn checksum(data: &[u8]) -> u32 {
    Crc32c::checksum(data)
  }
}

impl ChecksumCombine for Crc32c {
  #[inline]
  fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    combine(crc_a, crc_b, len_b)
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc32c {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;

  #[test]
  fn check_value() {
    assert_eq!(compute(0, b""), 0);
    assert_eq!(compute(0, b"123456789"), 0xE306_9283);
    assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
  }

  #[test]
  fn streaming_matches_oneshot() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i * 7) as u8).collect();
    for split in [0, 1, 7, 1024, 2048, 5000, 9999, 10_000] {
      let (a, b) = data.split_at(split);
      let mut h = Crc32c::new();
      h.update(a);
      h.update(b);
      assert_eq!(h.finalize(), compute(0, &data), "split={split}");
    }
  }

  #[test]
  fn reset_returns_to_resume_point() {
    let mut h = Crc32c::resume(0x1234_5678);
    h.update(b"abc");
    h.reset();
    assert_eq!(h.finalize(), 0x1234_5678);
  }

  #[test]
  fn trait_surface() {
    let mut h = <Crc32c as Checksum>::with_initial(Crc32c::checksum(b"1234"));
    Checksum::update_vectored(&mut h, &[b"56".as_slice(), b"789".as_slice()]);
    assert_eq!(Checksum::finalize(&h), 0xE306_9283);
    assert_eq!(<Crc32c as ChecksumCombine>::combine(compute(0, b"1234"), compute(0, b"56789"), 5), 0xE306_9283);
  }

  #[test]
  fn combine_with_empty_tail_is_identity() {
    let crc = compute(0, b"abc");
    assert_eq!(combine(crc, 0, 0), crc);
  }

  #[cfg(feature = "std")]
  #[test]
  fn io_write_and_adapters() {
    use std::io::{Read, Write};

    let mut h = Crc32c::new();
    h.write_all(b"123456789").unwrap();
    assert_eq!(h.finalize(), 0xE306_9283);

    let mut reader = Crc32c::reader(&b"123456789"[..]);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(reader.crc(), 0xE306_9283);

    let mut writer = Crc32c::writer(Vec::<u8>::new());
    writer.write_all(b"123456789").unwrap();
    let (inner, crc) = writer.into_parts();
    assert_eq!(inner, b"123456789");
    assert_eq!(crc, 0xE306_9283);
  }
}
