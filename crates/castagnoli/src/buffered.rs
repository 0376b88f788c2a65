//! Buffered CRC-32C for streams of small writes.
//!
//! Many tiny `update` calls each land below the interleave threshold and run
//! on the single-stream kernel. [`BufferedCrc32c`] coalesces them so the
//! dispatcher sees buffers large enough for the parallel kernels.

use alloc::boxed::Box;
use core::fmt;

use crate::{Crc32c, dispatch::Dispatcher};

/// Coalescing buffer size: four hybrid blocks.
const BUFFER_SIZE: usize = 4 * crate::constants::HYBRID_BLOCK;

/// Length at which buffered bytes are handed to the hasher.
fn flush_threshold() -> usize {
  Dispatcher::current().config().tunables.interleave_threshold.min(BUFFER_SIZE)
}

/// CRC-32C hasher that buffers small writes.
///
/// Produces exactly the same values as [`Crc32c`].
///
/// ```
/// use castagnoli::{BufferedCrc32c, Crc32c};
///
/// let mut hasher = BufferedCrc32c::new();
/// for byte in b"123456789" {
///   hasher.update(core::slice::from_ref(byte));
/// }
/// assert_eq!(hasher.finalize(), Crc32c::checksum(b"123456789"));
/// ```
#[derive(Clone)]
pub struct BufferedCrc32c {
  inner: Crc32c,
  buffer: Box<[u8; BUFFER_SIZE]>,
  /// Buffered bytes; always `< BUFFER_SIZE` between calls.
  len: usize,
}

impl BufferedCrc32c {
  #[must_use]
  pub fn new() -> Self {
    Self {
      inner: Crc32c::new(),
      buffer: Box::new([0u8; BUFFER_SIZE]),
      len: 0,
    }
  }

  #[allow(clippy::indexing_slicing)] // len < BUFFER_SIZE, fill <= BUFFER_SIZE - len, tail < threshold <= BUFFER_SIZE
  pub fn update(&mut self, data: &[u8]) {
    let threshold = flush_threshold();
    let mut input = data;

    if self.len > 0 {
      let fill = input.len().min(BUFFER_SIZE - self.len);
      let (head, rest) = input.split_at(fill);
      self.buffer[self.len..self.len + fill].copy_from_slice(head);
      self.len += fill;
      input = rest;

      if self.len == BUFFER_SIZE || (self.len >= threshold && input.is_empty()) {
        self.inner.update(&self.buffer[..self.len]);
        self.len = 0;
      }
      if input.is_empty() {
        return;
      }
    }

    // Buffer is empty here: either it was, or it just filled and flushed.
    let (bulk, tail) = input.split_at(input.len() / threshold * threshold);
    if !bulk.is_empty() {
      self.inner.update(bulk);
    }
    self.buffer[..tail.len()].copy_from_slice(tail);
    self.len = tail.len();
  }

  /// CRC of everything absorbed, buffered bytes included.
  #[must_use]
  #[allow(clippy::indexing_slicing)] // len < BUFFER_SIZE
  pub fn finalize(&self) -> u32 {
    if self.len == 0 {
      return self.inner.finalize();
    }
    let mut inner = self.inner.clone();
    inner.update(&self.buffer[..self.len]);
    inner.finalize()
  }

  pub fn reset(&mut self) {
    self.inner.reset();
    self.len = 0;
  }

  #[must_use]
  pub fn backend_name() -> &'static str {
    Crc32c::backend_name()
  }
}

impl Default for BufferedCrc32c {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for BufferedCrc32c {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BufferedCrc32c")
      .field("inner", &self.inner)
      .field("buffered", &self.len)
      .finish()
  }
}
