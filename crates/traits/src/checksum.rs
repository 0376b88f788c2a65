//! Checksum traits.
//!
//! A checksum is a streaming state over a fixed-width register. Implementors
//! that are linear over GF(2) (every CRC) also get [`ChecksumCombine`].

use core::fmt::Debug;

/// Streaming checksum.
///
/// ```rust,ignore
/// use castagnoli::{Checksum, Crc32c};
///
/// let crc = Crc32c::checksum(b"hello world");
///
/// let mut hasher = Crc32c::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc);
/// ```
///
/// # Implementor Requirements
///
/// - `new()` and `Default::default()` produce the same state.
/// - `finalize()` does not consume or mutate the state.
/// - `with_initial(x)` followed by `finalize()` returns `x`.
pub trait Checksum: Clone + Default {
  /// Output width in bytes.
  const OUTPUT_SIZE: usize;

  /// The checksum value type.
  type Output: Copy + Eq + Debug + Default;

  /// Fresh state.
  #[must_use]
  fn new() -> Self;

  /// State that resumes from a previously finalized value.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Absorb `data`.
  fn update(&mut self, data: &[u8]);

  /// Absorb several buffers in order. Same result as calling
  /// [`update`](Self::update) on each.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Current checksum value.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Return to the state the hasher was constructed in (`new()` or
  /// `with_initial`).
  fn reset(&mut self);

  /// One-shot checksum of `data`.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Wrap a reader so that every byte read is checksummed.
  #[cfg(feature = "std")]
  #[inline]
  #[must_use]
  fn reader<R>(inner: R) -> crate::io::ChecksumReader<R, Self>
  where
    Self: Sized,
  {
    crate::io::ChecksumReader::new(inner)
  }

  /// Wrap a writer so that every byte written is checksummed.
  #[cfg(feature = "std")]
  #[inline]
  #[must_use]
  fn writer<W>(inner: W) -> crate::io::ChecksumWriter<W, Self>
  where
    Self: Sized,
  {
    crate::io::ChecksumWriter::new(inner)
  }
}

/// Checksums whose partial results can be joined.
///
/// For a CRC over GF(2):
///
/// ```text
/// crc(A ‖ B) = crc(A) · x^(8·len(B)) mod P  ⊕  crc(B)
/// ```
///
/// which lets independently computed shards be combined without touching
/// their bytes again.
pub trait ChecksumCombine: Checksum {
  /// Given `crc_a = crc(A)`, `crc_b = crc(B)` and `len_b = len(B)`,
  /// returns `crc(A ‖ B)`.
  #[must_use]
  fn combine(crc_a: Self::Output, crc_b: Self::Output, len_b: usize) -> Self::Output;
}
