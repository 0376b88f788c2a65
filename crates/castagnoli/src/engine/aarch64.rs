//! aarch64 CRC-32C kernels.
//!
//! - ARMv8 CRC extension (`crc32c{b,h,w,x}`) for every CRC step
//! - `PMULL` (the `aes` feature) for stream merging and 128-bit folding
//!
//! Safety: as on x86_64, the `*_runtime` wrappers are the only `unsafe` and
//! are handed out after capability checks.

#![allow(unsafe_code)]

use core::arch::aarch64::{__crc32cb, __crc32cd, __crc32ch, __crc32cw, vmull_p64};

use super::{Kernel, ShiftKernel};

#[inline]
#[target_feature(enable = "crc")]
fn crc_u8(crc: u32, v: u8) -> u32 {
  __crc32cb(crc, v)
}

#[inline]
#[target_feature(enable = "crc")]
fn crc_u16(crc: u32, v: u16) -> u32 {
  __crc32ch(crc, v)
}

#[inline]
#[target_feature(enable = "crc")]
fn crc_u32(crc: u32, v: u32) -> u32 {
  __crc32cw(crc, v)
}

#[inline]
#[target_feature(enable = "crc")]
fn crc_u64(crc: u32, v: u64) -> u32 {
  __crc32cd(crc, v)
}

#[inline]
#[target_feature(enable = "neon,aes")]
fn clmul(a: u64, b: u64) -> u128 {
  vmull_p64(a, b)
}

define_crc32c_kernels! {
  scalar: [#[must_use] #[target_feature(enable = "crc")]],
  parallel: [#[must_use] #[target_feature(enable = "crc,neon,aes")]],
}

#[inline]
pub(crate) fn shift_runtime(crc: u32, k: u32) -> u32 {
  // SAFETY: selected only when `Caps::HWCRC | Caps::CLMUL` was detected.
  unsafe { shift(crc, k) }
}

#[inline]
pub(crate) fn scalar_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when `Caps::HWCRC` (crc) was detected.
  unsafe { scalar(crc, data) }
}

#[inline]
pub(crate) fn interleave3_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when `Caps::HWCRC | Caps::CLMUL` was detected.
  unsafe { interleave3(crc, data) }
}

#[inline]
pub(crate) fn fold128_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when `Caps::HWCRC | Caps::CLMUL` was detected.
  unsafe { fold128(crc, data) }
}

#[inline]
pub(crate) fn hybrid_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when `Caps::HWCRC | Caps::CLMUL` was detected.
  unsafe { hybrid(crc, data) }
}

pub(crate) const SHIFT: ShiftKernel = ShiftKernel {
  name: "aarch64/pmull-shift",
  func: shift_runtime,
};
pub(crate) const SCALAR: Kernel = Kernel {
  name: "aarch64/crc",
  func: scalar_runtime,
};
pub(crate) const INTERLEAVE3: Kernel = Kernel {
  name: "aarch64/crc-3way",
  func: interleave3_runtime,
};
pub(crate) const FOLD128: Kernel = Kernel {
  name: "aarch64/pmull-fold128",
  func: fold128_runtime,
};
pub(crate) const HYBRID: Kernel = Kernel {
  name: "aarch64/hybrid-7crc-1fold",
  func: hybrid_runtime,
};
