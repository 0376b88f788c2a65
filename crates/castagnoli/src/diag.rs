//! Explainable kernel selection.
//!
//! [`select`] reports what the dispatcher would do for a length and why,
//! along with every input that went into the decision.

use crate::{
  caps::Caps,
  config::Crc32cForce,
  dispatch::{self, Dispatcher, SelectionReason},
  engine::Engine,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionDiag {
  pub len: usize,
  pub reason: SelectionReason,
  pub engine: Engine,
  pub selected_kernel: &'static str,
  pub caps: Caps,
  pub requested_force: Crc32cForce,
  pub effective_force: Crc32cForce,
  pub interleave_threshold: usize,
  pub hybrid_threshold: usize,
  pub has_hwcrc: bool,
  pub has_clmul: bool,
}

/// Diagnose CRC-32C selection for `len`.
#[must_use]
pub fn select(len: usize) -> SelectionDiag {
  explain(&Dispatcher::current(), len)
}

/// Diagnose selection for `len` under an explicit dispatcher.
#[must_use]
pub fn explain(d: &Dispatcher, len: usize) -> SelectionDiag {
  let config = d.config();
  let caps = d.caps();
  let (engine, reason) = dispatch::select(len, &config, caps);
  SelectionDiag {
    len,
    reason,
    engine,
    selected_kernel: d.kernel_for(len).name,
    caps,
    requested_force: config.requested_force,
    effective_force: config.effective_force,
    interleave_threshold: config.tunables.interleave_threshold,
    hybrid_threshold: config.tunables.hybrid_threshold,
    has_hwcrc: caps.has(Caps::HWCRC),
    has_clmul: caps.has(Caps::CLMUL),
  }
}
