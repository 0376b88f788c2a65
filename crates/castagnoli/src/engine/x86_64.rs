//! x86_64 CRC-32C kernels.
//!
//! - SSE4.2 `crc32` for every CRC step
//! - `PCLMULQDQ` for stream merging and 128-bit folding
//!
//! Safety:
//! - The kernels are `#[target_feature]` functions; calling them is only
//!   sound when the features are present.
//! - The `*_runtime` wrappers are the only `unsafe` here and are handed out by
//!   [`Engine::kernel`](super::Engine::kernel) after capability checks.

#![allow(unsafe_code)]

use core::arch::x86_64::{
  _mm_clmulepi64_si128, _mm_crc32_u8, _mm_crc32_u16, _mm_crc32_u32, _mm_crc32_u64, _mm_cvtsi64_si128,
  _mm_cvtsi128_si64, _mm_srli_si128,
};

use super::{Kernel, ShiftKernel};

#[inline]
#[target_feature(enable = "sse4.2")]
fn crc_u8(crc: u32, v: u8) -> u32 {
  _mm_crc32_u8(crc, v)
}

#[inline]
#[target_feature(enable = "sse4.2")]
fn crc_u16(crc: u32, v: u16) -> u32 {
  _mm_crc32_u16(crc, v)
}

#[inline]
#[target_feature(enable = "sse4.2")]
fn crc_u32(crc: u32, v: u32) -> u32 {
  _mm_crc32_u32(crc, v)
}

#[inline]
#[target_feature(enable = "sse4.2")]
fn crc_u64(crc: u32, v: u64) -> u32 {
  _mm_crc32_u64(u64::from(crc), v) as u32
}

/// 64×64 → 128 carry-less multiply of the low quadwords.
#[inline]
#[target_feature(enable = "pclmulqdq")]
fn clmul(a: u64, b: u64) -> u128 {
  let p = _mm_clmulepi64_si128(_mm_cvtsi64_si128(a as i64), _mm_cvtsi64_si128(b as i64), 0x00);
  let lo = _mm_cvtsi128_si64(p) as u64;
  let hi = _mm_cvtsi128_si64(_mm_srli_si128(p, 8)) as u64;
  (u128::from(hi) << 64) | u128::from(lo)
}

define_crc32c_kernels! {
  scalar: [#[must_use] #[target_feature(enable = "sse4.2")]],
  parallel: [#[must_use] #[target_feature(enable = "sse4.2,pclmulqdq")]],
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime-dispatched entry points
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn shift_runtime(crc: u32, k: u32) -> u32 {
  // SAFETY: selected only when `Caps::HWCRC | Caps::CLMUL` was detected.
  unsafe { shift(crc, k) }
}

#[inline]
pub(crate) fn scalar_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when `Caps::HWCRC` (sse4.2) was detected.
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
  name: "x86_64/pclmul-shift",
  func: shift_runtime,
};
pub(crate) const SCALAR: Kernel = Kernel {
  name: "x86_64/sse4.2",
  func: scalar_runtime,
};
pub(crate) const INTERLEAVE3: Kernel = Kernel {
  name: "x86_64/sse4.2-3way",
  func: interleave3_runtime,
};
pub(crate) const FOLD128: Kernel = Kernel {
  name: "x86_64/pclmul-fold128",
  func: fold128_runtime,
};
pub(crate) const HYBRID: Kernel = Kernel {
  name: "x86_64/hybrid-7crc-1fold",
  func: hybrid_runtime,
};
