//! CPU capabilities relevant to CRC-32C.
//!
//! Answers one question: which of the two instruction families the kernels
//! need can legally run on this machine?
//!
//! | bit | x86_64 | aarch64 |
//! |-----|--------|---------|
//! | [`Caps::HWCRC`] | SSE4.2 `crc32` | CRC extension |
//! | [`Caps::CLMUL`] | `PCLMULQDQ` | `PMULL` (`aes`) |
//!
//! With `std`, detection runs once at runtime and is cached in a `OnceLock`.
//! Without it, only features enabled at compile time are reported. Under Miri
//! nothing is reported and every engine runs its portable form.

use core::fmt;

/// Capability bitset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(u8);

impl Caps {
  /// No hardware support.
  pub const NONE: Self = Self(0);
  /// Hardware CRC-32C instructions.
  pub const HWCRC: Self = Self(1 << 0);
  /// 64×64 carry-less multiply.
  pub const CLMUL: Self = Self(1 << 1);
  /// Everything the parallel kernels need.
  pub const PARALLEL: Self = Self::HWCRC.union(Self::CLMUL);

  /// `self | other`.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// `self & other`.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Whether every bit of `required` is present.
  #[inline]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.0 & required.0 == required.0
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Architecture-specific feature names for the bits that are set.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    let (crc, clmul) = arch_feature_names();
    [(Self::HWCRC, crc), (Self::CLMUL, clmul)]
      .into_iter()
      .filter(move |&(bit, _)| self.has(bit))
      .map(|(_, name)| name)
  }

  /// Capabilities enabled at compile time via `target_feature`.
  #[must_use]
  pub const fn compile_time() -> Self {
    let mut caps = Self::NONE;
    if cfg!(any(
      all(target_arch = "x86_64", target_feature = "sse4.2"),
      all(target_arch = "aarch64", target_feature = "crc")
    )) {
      caps = caps.union(Self::HWCRC);
    }
    if cfg!(any(
      all(target_arch = "x86_64", target_feature = "pclmulqdq"),
      all(target_arch = "aarch64", target_feature = "aes")
    )) {
      caps = caps.union(Self::CLMUL);
    }
    caps
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl fmt::Display for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}[", arch_name())?;
    for (i, name) in self.feature_names().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      f.write_str(name)?;
    }
    f.write_str("]")
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Caps({self})")
  }
}

/// Target architecture as reported in introspection output.
#[must_use]
pub const fn arch_name() -> &'static str {
  if cfg!(target_arch = "x86_64") {
    "x86_64"
  } else if cfg!(target_arch = "aarch64") {
    "aarch64"
  } else {
    "portable"
  }
}

const fn arch_feature_names() -> (&'static str, &'static str) {
  if cfg!(target_arch = "aarch64") {
    ("crc", "pmull")
  } else {
    ("sse4.2", "pclmulqdq")
  }
}

/// Capabilities of the running CPU.
///
/// Cached after the first call under `std`.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  #[cfg(feature = "std")]
  {
    use std::sync::OnceLock;
    static CACHED: OnceLock<Caps> = OnceLock::new();
    *CACHED.get_or_init(detect)
  }

  #[cfg(not(feature = "std"))]
  {
    detect()
  }
}

#[cfg(miri)]
fn detect() -> Caps {
  Caps::NONE
}

#[cfg(all(not(miri), feature = "std", target_arch = "x86_64"))]
fn detect() -> Caps {
  let mut caps = Caps::compile_time();
  if std::arch::is_x86_feature_detected!("sse4.2") {
    caps |= Caps::HWCRC;
  }
  if std::arch::is_x86_feature_detected!("pclmulqdq") {
    caps |= Caps::CLMUL;
  }
  caps
}

#[cfg(all(not(miri), feature = "std", target_arch = "aarch64"))]
fn detect() -> Caps {
  let mut caps = Caps::compile_time();
  if std::arch::is_aarch64_feature_detected!("crc") {
    caps |= Caps::HWCRC;
  }
  if std::arch::is_aarch64_feature_detected!("aes") {
    caps |= Caps::CLMUL;
  }
  caps
}

#[cfg(all(
  not(miri),
  any(not(feature = "std"), not(any(target_arch = "x86_64", target_arch = "aarch64")))
))]
fn detect() -> Caps {
  Caps::compile_time()
}
