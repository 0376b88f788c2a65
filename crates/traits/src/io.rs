//! I/O adapters that checksum bytes in flight.
//!
//! Only bytes that actually cross the inner reader/writer are absorbed, so
//! short reads and short writes are accounted for exactly.

#[cfg(feature = "std")]
use crate::Checksum;

/// A [`Read`](std::io::Read) wrapper that checksums everything read through it.
#[cfg(feature = "std")]
#[derive(Clone, Debug)]
pub struct ChecksumReader<R, C: Checksum> {
  inner: R,
  hasher: C,
}

#[cfg(feature = "std")]
impl<R, C: Checksum> ChecksumReader<R, C> {
  /// Wrap `inner` with a fresh checksum state.
  #[inline]
  #[must_use]
  pub fn new(inner: R) -> Self {
    Self { inner, hasher: C::new() }
  }

  /// Wrap `inner`, continuing from a previously finalized value.
  #[inline]
  #[must_use]
  pub fn with_initial(inner: R, initial: C::Output) -> Self {
    Self {
      inner,
      hasher: C::with_initial(initial),
    }
  }

  /// Checksum of everything read so far.
  #[inline]
  #[must_use]
  pub fn crc(&self) -> C::Output {
    self.hasher.finalize()
  }

  /// The inner reader and the checksum of everything read.
  #[inline]
  pub fn into_parts(self) -> (R, C::Output) {
    let crc = self.hasher.finalize();
    (self.inner, crc)
  }

  #[inline]
  pub fn into_inner(self) -> R {
    self.inner
  }

  #[inline]
  pub fn inner(&self) -> &R {
    &self.inner
  }
}

#[cfg(feature = "std")]
impl<R: std::io::Read, C: Checksum> std::io::Read for ChecksumReader<R, C> {
  #[inline]
  fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
    let n = self.inner.read(buf)?;
    if let Some(data) = buf.get(..n) {
      self.hasher.update(data);
    }
    Ok(n)
  }
}

/// A [`Write`](std::io::Write) wrapper that checksums everything written
/// through it.
///
/// Bytes are absorbed after the inner writer accepts them, and only as many
/// as it reports written.
#[cfg(feature = "std")]
#[derive(Clone, Debug)]
pub struct ChecksumWriter<W, C: Checksum> {
  inner: W,
  hasher: C,
}

#[cfg(feature = "std")]
impl<W, C: Checksum> ChecksumWriter<W, C> {
  /// Wrap `inner` with a fresh checksum state.
  #[inline]
  #[must_use]
  pub fn new(inner: W) -> Self {
    Self { inner, hasher: C::new() }
  }

  /// Wrap `inner`, continuing from a previously finalized value.
  #[inline]
  #[must_use]
  pub fn with_initial(inner: W, initial: C::Output) -> Self {
    Self {
      inner,
      hasher: C::with_initial(initial),
    }
  }

  /// Checksum of everything written so far.
  #[inline]
  #[must_use]
  pub fn crc(&self) -> C::Output {
    self.hasher.finalize()
  }

  /// The inner writer and the checksum of everything written.
  #[inline]
  pub fn into_parts(self) -> (W, C::Output) {
    let crc = self.hasher.finalize();
    (self.inner, crc)
  }

  #[inline]
  pub fn into_inner(self) -> W {
    self.inner
  }

  #[inline]
  pub fn inner(&self) -> &W {
    &self.inner
  }
}

#[cfg(feature = "std")]
impl<W: std::io::Write, C: Checksum> std::io::Write for ChecksumWriter<W, C> {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    let n = self.inner.write(buf)?;
    if let Some(data) = buf.get(..n) {
      self.hasher.update(data);
    }
    Ok(n)
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    self.inner.flush()
  }
}

#[cfg(all(test, feature = "std"))]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;
  use std::io::{Cursor, Read, Write};

  use super::*;

  /// Byte-sum stand-in; enough to observe which bytes were absorbed.
  #[derive(Clone, Default)]
  struct Sum(u32);

  impl Checksum for Sum {
    const OUTPUT_SIZE: usize = 4;
    type Output = u32;

    fn new() -> Self {
      Self(0)
    }
    fn with_initial(initial: u32) -> Self {
      Self(initial)
    }
    fn update(&mut self, data: &[u8]) {
      self.0 = data.iter().fold(self.0, |acc, &b| acc.wrapping_add(u32::from(b)));
    }
    fn finalize(&self) -> u32 {
      self.0
    }
    fn reset(&mut self) {
      self.0 = 0;
    }
  }

  /// Accepts at most 3 bytes per call.
  struct Trickle(Vec<u8>);

  impl Write for Trickle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      let n = buf.len().min(3);
      self.0.extend_from_slice(&buf[..n]);
      Ok(n)
    }
    fn flush(&mut self) -> std::io::Result<()> {
      Ok(())
    }
  }

  #[test]
  fn reader_sees_every_byte() {
    let mut reader = Sum::reader(Cursor::new(b"abc".to_vec()));
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"abc");
    assert_eq!(reader.crc(), 97 + 98 + 99);
  }

  #[test]
  fn writer_counts_only_accepted_bytes() {
    let mut writer = ChecksumWriter::<_, Sum>::new(Trickle(Vec::new()));
    let n = writer.write(b"abcdef").unwrap();
    assert_eq!(n, 3);
    assert_eq!(writer.crc(), 97 + 98 + 99);

    writer.write_all(b"def").unwrap();
    let (inner, crc) = writer.into_parts();
    assert_eq!(inner.0, b"abcdef");
    assert_eq!(crc, b"abcdef".iter().map(|&b| u32::from(b)).sum::<u32>());
  }

  #[test]
  fn with_initial_resumes() {
    let reader = ChecksumReader::<_, Sum>::with_initial(Cursor::new(Vec::<u8>::new()), 41);
    assert_eq!(reader.crc(), 41);
  }
}
