//! Interchangeable CRC-32C engines.
//!
//! Every engine computes the same function; they differ only in speed and in
//! which instructions they need:
//!
//! | engine | technique | needs |
//! |--------|-----------|-------|
//! | [`Engine::Naive`] | bit at a time | nothing |
//! | [`Engine::TableByte`] | one table lookup per byte | nothing |
//! | [`Engine::TableSlice4`] | slicing-by-4 | nothing |
//! | [`Engine::HwScalar`] | CRC instruction, 8 bytes per step | [`Caps::HWCRC`] |
//! | [`Engine::Interleave3`] | 3 CRC streams per 1 KiB, clmul merge | [`Caps::PARALLEL`] |
//! | [`Engine::Fold128`] | 128-bit carry-less folding | [`Caps::PARALLEL`] |
//! | [`Engine::Hybrid`] | 7 CRC streams + 1 folded lane per 4 KiB | [`Caps::PARALLEL`] |
//!
//! When the instructions are missing, the hardware engines run the same
//! algorithm on [`portable`] emulations of them. The answer never changes.
//!
//! Auto selection never picks [`Engine::Fold128`]; see [`crate::dispatch`].
//! [`ShiftKernel`] is resolved the same way for [`gf2::merge`](crate::gf2::merge).

pub mod naive;
pub mod portable;
pub mod table;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(target_arch = "aarch64")]
use aarch64 as hw;
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
use portable as hw;
#[cfg(target_arch = "x86_64")]
use x86_64 as hw;

use crate::caps::{Caps, caps};
use crate::constants::{FOLD_BLOCK, HYBRID_BLOCK, INTERLEAVE_BLOCK};

/// Raw-register kernel signature: `(crc, data) -> crc`, no pre/post inversion.
pub type Crc32cFn = fn(u32, &[u8]) -> u32;

/// A resolved kernel and its introspection name.
#[derive(Clone, Copy, Debug)]
pub struct Kernel {
  /// e.g. `"x86_64/sse4.2-3way"`, `"portable/slice4"`.
  pub name: &'static str,
  pub func: Crc32cFn,
}

impl Kernel {
  /// Run on the raw register.
  #[inline]
  #[must_use]
  pub fn call(&self, crc: u32, data: &[u8]) -> u32 {
    (self.func)(crc, data)
  }
}

/// Distance-shift signature: `(crc, k) -> crc_u64(0, clmul(crc, k))`.
pub type ShiftFn = fn(u32, u32) -> u32;

/// The carry-less multiply + CRC-of-zero step behind [`merge`](crate::gf2::merge).
#[derive(Clone, Copy, Debug)]
pub struct ShiftKernel {
  /// e.g. `"x86_64/pclmul-shift"`, `"portable/shift"`.
  pub name: &'static str,
  pub func: ShiftFn,
}

impl ShiftKernel {
  #[inline]
  #[must_use]
  pub fn call(&self, crc: u32, k: u32) -> u32 {
    (self.func)(crc, k)
  }

  /// Native when the running CPU has hardware CRC and carry-less multiply.
  #[inline]
  #[must_use]
  pub fn current() -> Self {
    Self::resolve(caps())
  }

  /// Shift for a CPU with at most `caps`; [`Caps::NONE`] gives the software
  /// form.
  #[inline]
  #[must_use]
  pub fn with_caps(caps: Caps) -> Self {
    Self::resolve(caps.intersection(crate::caps::caps()))
  }

  /// `caps` must be a subset of the detected capabilities.
  const fn resolve(caps: Caps) -> Self {
    if caps.has(Caps::PARALLEL) { hw::SHIFT } else { portable::SHIFT }
  }
}

/// CRC-32C strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Engine {
  Naive,
  TableByte,
  TableSlice4,
  HwScalar,
  Interleave3,
  Fold128,
  Hybrid,
}

impl Engine {
  /// Every engine, slowest first.
  pub const ALL: [Self; 7] = [
    Self::Naive,
    Self::TableByte,
    Self::TableSlice4,
    Self::HwScalar,
    Self::Interleave3,
    Self::Fold128,
    Self::Hybrid,
  ];

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Naive => "naive",
      Self::TableByte => "table-byte",
      Self::TableSlice4 => "table-slice4",
      Self::HwScalar => "hw-scalar",
      Self::Interleave3 => "interleave3",
      Self::Fold128 => "fold128",
      Self::Hybrid => "hybrid",
    }
  }

  /// Instructions the engine needs to run natively.
  #[must_use]
  pub const fn required_caps(self) -> Caps {
    match self {
      Self::Naive | Self::TableByte | Self::TableSlice4 => Caps::NONE,
      Self::HwScalar => Caps::HWCRC,
      Self::Interleave3 | Self::Fold128 | Self::Hybrid => Caps::PARALLEL,
    }
  }

  /// Shortest input the engine's own technique applies to. Below this it
  /// delegates to the scalar path.
  #[must_use]
  pub const fn min_len(self) -> usize {
    match self {
      Self::Naive | Self::TableByte | Self::TableSlice4 | Self::HwScalar => 0,
      Self::Interleave3 => 2 * INTERLEAVE_BLOCK,
      Self::Fold128 => 2 * FOLD_BLOCK,
      Self::Hybrid => 2 * HYBRID_BLOCK,
    }
  }

  /// Whether this engine runs on real hardware instructions here.
  #[inline]
  #[must_use]
  pub fn is_accelerated(self) -> bool {
    let required = self.required_caps();
    !required.is_empty() && caps().has(required)
  }

  /// Kernel for the running CPU.
  #[inline]
  #[must_use]
  pub fn kernel(self) -> Kernel {
    self.resolve(caps())
  }

  /// Kernel for a CPU with at most `caps`. Hardware engines resolve to their
  /// portable emulation when `caps` (or the running CPU) lacks what they need.
  #[inline]
  #[must_use]
  pub fn kernel_with(self, caps: Caps) -> Kernel {
    self.resolve(caps.intersection(crate::caps::caps()))
  }

  /// `caps` must be a subset of the detected capabilities.
  #[must_use]
  pub(crate) const fn resolve(self, caps: Caps) -> Kernel {
    const fn pick(caps: Caps, required: Caps, native: Kernel, emulated: Kernel) -> Kernel {
      if caps.has(required) { native } else { emulated }
    }

    match self {
      Self::Naive => NAIVE,
      Self::TableByte => BYTEWISE,
      Self::TableSlice4 => SLICE4,
      Self::HwScalar => pick(caps, Caps::HWCRC, hw::SCALAR, portable::SCALAR),
      Self::Interleave3 => pick(caps, Caps::PARALLEL, hw::INTERLEAVE3, portable::INTERLEAVE3),
      Self::Fold128 => pick(caps, Caps::PARALLEL, hw::FOLD128, portable::FOLD128),
      Self::Hybrid => pick(caps, Caps::PARALLEL, hw::HYBRID, portable::HYBRID),
    }
  }

  /// CRC-32C of `data` continuing from `seed`, in the standard (inverted)
  /// convention: `compute(0, b"")` is `0`.
  ///
  /// ```
  /// use castagnoli::Engine;
  ///
  /// for engine in Engine::ALL {
  ///   assert_eq!(engine.compute(0, b"123456789"), 0xE306_9283);
  /// }
  /// ```
  #[inline]
  #[must_use]
  pub fn compute(self, seed: u32, data: &[u8]) -> u32 {
    !self.kernel().call(!seed, data)
  }
}

impl core::fmt::Display for Engine {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

const NAIVE: Kernel = Kernel {
  name: "reference/bitwise",
  func: naive::compute,
};

const BYTEWISE: Kernel = Kernel {
  name: "portable/bytewise",
  func: table::bytewise,
};

const SLICE4: Kernel = Kernel {
  name: "portable/slice4",
  func: table::slice4,
};
