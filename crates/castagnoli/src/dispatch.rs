//! Per-call engine selection.
//!
//! ```text
//! caps + config (once) → Dispatcher
//! len (per call)       → engine → kernel
//! ```
//!
//! Selection order for [`Crc32cForce::Auto`]:
//!
//! 1. carry-less multiply and hardware CRC present:
//!    - `len >= hybrid_threshold` → [`Engine::Hybrid`]
//!    - `len >= interleave_threshold` → [`Engine::Interleave3`]
//!    - otherwise → [`Engine::HwScalar`]
//! 2. hardware CRC only → [`Engine::HwScalar`]
//! 3. nothing → [`Engine::TableSlice4`]
//!
//! [`Engine::Naive`], [`Engine::TableByte`] and [`Engine::Fold128`] are only
//! reached by forcing them (`CASTAGNOLI_FORCE=fold` for the latter). 128-bit
//! folding still runs automatically as the folded lane of [`Engine::Hybrid`];
//! on its own it trails both parallel CRC kernels, so no threshold selects it.
//! The choice never changes the result.

use crate::{
  caps::{Caps, caps},
  config::{self, Crc32cConfig, Crc32cForce},
  engine::{Engine, Kernel},
};

/// Why a given engine was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionReason {
  /// A forced mode was active.
  Forced,
  /// At or above the hybrid threshold.
  AboveHybridThreshold,
  /// At or above the interleave threshold.
  AboveInterleaveThreshold,
  /// Parallel kernels available but the input is too short for them.
  BelowParallelThreshold,
  /// Hardware CRC without carry-less multiply.
  NoClmul,
  /// No hardware support at all.
  NoHardware,
}

impl SelectionReason {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Forced => "forced",
      Self::AboveHybridThreshold => "above hybrid threshold",
      Self::AboveInterleaveThreshold => "above interleave threshold",
      Self::BelowParallelThreshold => "below parallel threshold",
      Self::NoClmul => "no carry-less multiply",
      Self::NoHardware => "no hardware CRC",
    }
  }
}

/// Pick the engine for `len` bytes. Pure; exposed for introspection and tests.
#[must_use]
pub const fn select(len: usize, config: &Crc32cConfig, caps: Caps) -> (Engine, SelectionReason) {
  if let Some(engine) = config.effective_force.engine() {
    return (engine, SelectionReason::Forced);
  }

  if caps.has(Caps::PARALLEL) {
    if len >= config.tunables.hybrid_threshold {
      return (Engine::Hybrid, SelectionReason::AboveHybridThreshold);
    }
    if len >= config.tunables.interleave_threshold {
      return (Engine::Interleave3, SelectionReason::AboveInterleaveThreshold);
    }
    return (Engine::HwScalar, SelectionReason::BelowParallelThreshold);
  }

  if caps.has(Caps::HWCRC) {
    return (Engine::HwScalar, SelectionReason::NoClmul);
  }

  (Engine::TableSlice4, SelectionReason::NoHardware)
}

/// Resolved selection state: configuration and capabilities, fixed for the
/// life of the process.
#[derive(Clone, Copy, Debug)]
pub struct Dispatcher {
  config: Crc32cConfig,
  caps: Caps,
}

impl Dispatcher {
  /// Dispatcher for `config` on a CPU with at most `caps`; capabilities the
  /// running CPU lacks are dropped.
  #[must_use]
  pub fn new(config: Crc32cConfig, caps: Caps) -> Self {
    Self {
      config,
      caps: caps.intersection(crate::caps::caps()),
    }
  }

  /// The process-wide dispatcher.
  #[inline]
  #[must_use]
  pub fn current() -> Self {
    #[cfg(feature = "std")]
    {
      use std::sync::OnceLock;
      static ACTIVE: OnceLock<Dispatcher> = OnceLock::new();
      *ACTIVE.get_or_init(|| Dispatcher::new(config::get(), caps()))
    }

    #[cfg(not(feature = "std"))]
    {
      Dispatcher::new(config::get(), caps())
    }
  }

  #[inline]
  #[must_use]
  pub const fn config(&self) -> Crc32cConfig {
    self.config
  }

  #[inline]
  #[must_use]
  pub const fn caps(&self) -> Caps {
    self.caps
  }

  /// Engine and kernel for a buffer of `len` bytes.
  #[inline]
  #[must_use]
  pub const fn kernel_for(&self, len: usize) -> Kernel {
    let (engine, _) = select(len, &self.config, self.caps);
    engine.resolve(self.caps)
  }

  /// Raw-register update.
  #[inline]
  #[must_use]
  pub fn update(&self, crc: u32, data: &[u8]) -> u32 {
    self.kernel_for(data.len()).call(crc, data)
  }

  /// Name of the kernel used for a representative 1 KiB buffer, or the
  /// forced kernel.
  #[must_use]
  pub const fn backend_name(&self) -> &'static str {
    self.kernel_for(1024).name
  }

  /// Whether any selected kernel runs on hardware instructions.
  #[must_use]
  pub const fn is_hardware_accelerated(&self) -> bool {
    match self.config.effective_force {
      Crc32cForce::Auto => self.caps.has(Caps::HWCRC),
      force => match force.engine() {
        Some(engine) => {
          let required = engine.required_caps();
          !required.is_empty() && self.caps.has(required)
        }
        None => false,
      },
    }
  }
}

/// CRC-32C of `data` continuing from `seed`, using the fastest engine for
/// this CPU and length.
///
/// ```
/// assert_eq!(castagnoli::dispatch::compute(0, b"123456789"), 0xE306_9283);
/// ```
#[inline]
#[must_use]
pub fn compute(seed: u32, data: &[u8]) -> u32 {
  !Dispatcher::current().update(!seed, data)
}

/// Returns `true` if CRC-32C runs on hardware instructions on this machine.
#[inline]
#[must_use]
pub fn is_hardware_accelerated() -> bool {
  Dispatcher::current().is_hardware_accelerated()
}
