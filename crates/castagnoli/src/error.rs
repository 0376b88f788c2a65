//! Error types.
//!
//! Checksumming itself cannot fail; the only fallible surface is parsing
//! configuration values.

use core::fmt;

/// An unrecognized engine name was given to
/// [`Crc32cForce::from_str`](crate::config::Crc32cForce).
///
/// # Examples
///
/// ```
/// use castagnoli::config::Crc32cForce;
///
/// assert!("hybrid".parse::<Crc32cForce>().is_ok());
/// assert!("turbo".parse::<Crc32cForce>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ParseForceError;

impl ParseForceError {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self
  }
}

impl Default for ParseForceError {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for ParseForceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(
      "unknown CRC-32C engine (expected auto, naive, table, slice4, hwcrc, interleave, fold, or hybrid)",
    )
  }
}

impl core::error::Error for ParseForceError {}

#[cfg(test)]
mod tests {
  use alloc::string::ToString;

  use super::*;

  #[test]
  fn display_names_the_choices() {
    let msg = ParseForceError::new().to_string();
    assert!(msg.contains("hybrid"));
    assert!(msg.starts_with("unknown CRC-32C engine"));
  }

  #[test]
  fn is_error_trait_object() {
    let err: &dyn core::error::Error = &ParseForceError;
    assert!(err.source().is_none());
  }
}
