//! Joining CRCs of chunks computed separately.
//!
//! No threads are spawned here. Callers hash shards however they like (rayon,
//! scoped threads, async tasks) and hand the `(crc, len)` pairs back, in
//! order, to be joined with the `O(log n)` combine.
//!
//! ```
//! use castagnoli::{Crc32c, parallel::checksum_chunks};
//!
//! let data = b"The quick brown fox jumps over the lazy dog";
//! let chunks: Vec<&[u8]> = data.chunks(16).collect();
//! assert_eq!(checksum_chunks::<Crc32c>(&chunks), Crc32c::checksum(data));
//! ```
//!
//! With scoped threads:
//!
//! ```
//! use castagnoli::{Crc32c, parallel::combine_checksums};
//!
//! let data = vec![0xA5u8; 1 << 20];
//! let parts: Vec<(u32, usize)> = std::thread::scope(|s| {
//!   let handles: Vec<_> = data
//!     .chunks(256 * 1024)
//!     .map(|chunk| s.spawn(move || (Crc32c::checksum(chunk), chunk.len())))
//!     .collect();
//!   handles.into_iter().map(|h| h.join().unwrap()).collect()
//! });
//! assert_eq!(combine_checksums::<Crc32c>(&parts), Crc32c::checksum(&data));
//! ```

use traits::ChecksumCombine;

/// Checksum of the concatenation of `chunks`, one chunk at a time.
///
/// An empty slice gives the checksum of empty input.
///
/// ```
/// use castagnoli::{Crc32c, parallel::checksum_chunks};
///
/// let empty: &[&[u8]] = &[];
/// assert_eq!(checksum_chunks::<Crc32c>(empty), 0);
/// ```
#[inline]
pub fn checksum_chunks<C: ChecksumCombine>(chunks: &[&[u8]]) -> C::Output {
  let Some((first, rest)) = chunks.split_first() else {
    return C::checksum(&[]);
  };

  rest
    .iter()
    .fold(C::checksum(first), |acc, chunk| C::combine(acc, C::checksum(chunk), chunk.len()))
}

/// Join `(crc, len)` pairs, in stream order, into one checksum.
///
/// # Panics
///
/// If `checksums` is empty. See [`combine_checksums_or`].
#[inline]
#[allow(clippy::expect_used)]
pub fn combine_checksums<C: ChecksumCombine>(checksums: &[(C::Output, usize)]) -> C::Output {
  combine_checksums_or::<C>(checksums).expect("checksums slice must not be empty")
}

/// Join `(crc, len)` pairs, or `None` when there are none.
///
/// The length of the first pair is never needed.
///
/// ```
/// use castagnoli::{Crc32c, parallel::combine_checksums_or};
///
/// assert_eq!(combine_checksums_or::<Crc32c>(&[]), None);
/// assert_eq!(combine_checksums_or::<Crc32c>(&[(0xDEAD_BEEF, 7)]), Some(0xDEAD_BEEF));
/// ```
#[inline]
pub fn combine_checksums_or<C: ChecksumCombine>(checksums: &[(C::Output, usize)]) -> Option<C::Output> {
  let ((first, _), rest) = checksums.split_first()?;
  Some(rest.iter().fold(*first, |acc, &(crc, len)| C::combine(acc, crc, len)))
}
