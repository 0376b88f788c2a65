//! Kernel dispatch introspection.
//!
//! Shows which kernels run on this machine without touching the hot path.
//!
//! ```
//! use castagnoli::{DispatchInfo, kernel_name_for_len};
//!
//! let info = DispatchInfo::current();
//! println!("{info}");
//! println!("CRC-32C @ 64 KiB: {}", kernel_name_for_len(64 * 1024));
//! ```

use core::fmt;

use crate::{caps::Caps, config::Crc32cConfig, dispatch::Dispatcher};

/// Detected capabilities, effective configuration, and the representative
/// backend.
#[derive(Clone, Copy)]
pub struct DispatchInfo {
  caps: Caps,
  config: Crc32cConfig,
  backend: &'static str,
}

impl DispatchInfo {
  /// Dispatch info for the running process. Cached after the first call.
  #[inline]
  #[must_use]
  pub fn current() -> Self {
    let d = Dispatcher::current();
    Self {
      caps: d.caps(),
      config: d.config(),
      backend: d.backend_name(),
    }
  }

  #[inline]
  #[must_use]
  pub const fn caps(&self) -> Caps {
    self.caps
  }

  #[inline]
  #[must_use]
  pub const fn config(&self) -> Crc32cConfig {
    self.config
  }

  /// Kernel used for a 1 KiB buffer (or the forced kernel).
  #[inline]
  #[must_use]
  pub const fn backend(&self) -> &'static str {
    self.backend
  }
}

impl fmt::Display for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} backend={} force={} interleave>={} hybrid>={}",
      self.caps,
      self.backend,
      self.config.effective_force,
      self.config.tunables.interleave_threshold,
      self.config.tunables.hybrid_threshold,
    )
  }
}

impl fmt::Debug for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DispatchInfo")
      .field("caps", &format_args!("{}", self.caps))
      .field("backend", &self.backend)
      .field("config", &self.config)
      .finish()
  }
}

/// Kernel the selector would use for a buffer of `len` bytes.
///
/// Intended for debugging and benchmarking; does not allocate.
#[inline]
#[must_use]
pub fn kernel_name_for_len(len: usize) -> &'static str {
  Dispatcher::current().kernel_for(len).name
}

/// Kernel used for a representative 1 KiB buffer, or the forced kernel.
#[inline]
#[must_use]
pub fn backend_name() -> &'static str {
  Dispatcher::current().backend_name()
}
