//! CRC-32C runtime configuration (overrides + thresholds).
//!
//! Selection knobs:
//! - an optional forced engine
//! - the length at which the 3-way interleaved kernel takes over
//! - the length at which the hybrid kernel takes over
//!
//! With `std`, these can be overridden from the environment (read once):
//!
//! | variable | values |
//! |----------|--------|
//! | `CASTAGNOLI_FORCE` | see [`Crc32cForce::from_str`] |
//! | `CASTAGNOLI_THRESHOLD_INTERLEAVE` | bytes |
//! | `CASTAGNOLI_THRESHOLD_HYBRID` | bytes |
//!
//! Forced modes are always clamped to detected CPU capabilities, and
//! thresholds never go below two blocks of the kernel they gate.

use core::{fmt, str::FromStr};

use crate::{
  caps::{Caps, caps},
  constants::{HYBRID_BLOCK, INTERLEAVE_BLOCK},
  engine::Engine,
  error::ParseForceError,
};

/// Forced engine selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Crc32cForce {
  /// Size- and capability-based selection.
  #[default]
  Auto,
  /// Bit-at-a-time reference.
  Naive,
  /// One table lookup per byte.
  Table,
  /// Slicing-by-4.
  Slice4,
  /// Hardware CRC, single stream.
  Hwcrc,
  /// Three interleaved hardware CRC streams.
  Interleave,
  /// 128-bit carry-less folding.
  Fold,
  /// Seven CRC streams plus one folded lane.
  Hybrid,
}

impl Crc32cForce {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Naive => "naive",
      Self::Table => "table",
      Self::Slice4 => "slice4",
      Self::Hwcrc => "hwcrc",
      Self::Interleave => "interleave",
      Self::Fold => "fold",
      Self::Hybrid => "hybrid",
    }
  }

  /// The engine this mode pins, or `None` for [`Auto`](Self::Auto).
  #[must_use]
  pub const fn engine(self) -> Option<Engine> {
    match self {
      Self::Auto => None,
      Self::Naive => Some(Engine::Naive),
      Self::Table => Some(Engine::TableByte),
      Self::Slice4 => Some(Engine::TableSlice4),
      Self::Hwcrc => Some(Engine::HwScalar),
      Self::Interleave => Some(Engine::Interleave3),
      Self::Fold => Some(Engine::Fold128),
      Self::Hybrid => Some(Engine::Hybrid),
    }
  }

  /// Downgrade to [`Auto`](Self::Auto) when `caps` cannot run the forced
  /// engine natively.
  #[must_use]
  pub const fn clamp_to(self, caps: Caps) -> Self {
    match self.engine() {
      Some(engine) if !caps.has(engine.required_caps()) => Self::Auto,
      _ => self,
    }
  }
}

impl fmt::Display for Crc32cForce {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Crc32cForce {
  type Err = ParseForceError;

  /// Case-insensitive; surrounding whitespace is ignored.
  ///
  /// | mode | accepted |
  /// |------|----------|
  /// | `Auto` | `auto` |
  /// | `Naive` | `naive`, `reference`, `bitwise` |
  /// | `Table` | `table`, `bytewise` |
  /// | `Slice4` | `slice4`, `portable` |
  /// | `Hwcrc` | `hwcrc`, `scalar`, `crc32c` |
  /// | `Interleave` | `interleave`, `interleave3`, `3way` |
  /// | `Fold` | `fold`, `fold128`, `clmul` |
  /// | `Hybrid` | `hybrid` |
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    const ALIASES: &[(&str, Crc32cForce)] = &[
      ("auto", Crc32cForce::Auto),
      ("naive", Crc32cForce::Naive),
      ("reference", Crc32cForce::Naive),
      ("bitwise", Crc32cForce::Naive),
      ("table", Crc32cForce::Table),
      ("bytewise", Crc32cForce::Table),
      ("slice4", Crc32cForce::Slice4),
      ("portable", Crc32cForce::Slice4),
      ("hwcrc", Crc32cForce::Hwcrc),
      ("scalar", Crc32cForce::Hwcrc),
      ("crc32c", Crc32cForce::Hwcrc),
      ("interleave", Crc32cForce::Interleave),
      ("interleave3", Crc32cForce::Interleave),
      ("3way", Crc32cForce::Interleave),
      ("fold", Crc32cForce::Fold),
      ("fold128", Crc32cForce::Fold),
      ("clmul", Crc32cForce::Fold),
      ("hybrid", Crc32cForce::Hybrid),
    ];

    let s = s.trim();
    ALIASES
      .iter()
      .find(|(name, _)| s.eq_ignore_ascii_case(name))
      .map(|&(_, force)| force)
      .ok_or(ParseForceError::new())
  }
}

/// Size thresholds used by the auto selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Crc32cTunables {
  /// Bytes from which the 3-way interleaved kernel is used.
  pub interleave_threshold: usize,
  /// Bytes from which the hybrid kernel is used.
  pub hybrid_threshold: usize,
}

impl Crc32cTunables {
  /// Built-in thresholds.
  pub const DEFAULT: Self = Self {
    interleave_threshold: 2 * INTERLEAVE_BLOCK,
    hybrid_threshold: 16 * 1024,
  };

  /// Raise each threshold to at least two blocks of its kernel.
  #[must_use]
  pub const fn clamped(self) -> Self {
    Self {
      interleave_threshold: max(self.interleave_threshold, 2 * INTERLEAVE_BLOCK),
      hybrid_threshold: max(self.hybrid_threshold, 2 * HYBRID_BLOCK),
    }
  }
}

impl Default for Crc32cTunables {
  #[inline]
  fn default() -> Self {
    Self::DEFAULT
  }
}

const fn max(a: usize, b: usize) -> usize {
  if a > b { a } else { b }
}

/// Full CRC-32C configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Crc32cConfig {
  /// Requested force mode (env/programmatic).
  pub requested_force: Crc32cForce,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: Crc32cForce,
  /// Thresholds used by the selector.
  pub tunables: Crc32cTunables,
}

impl Crc32cConfig {
  /// Resolve a configuration against `caps`, clamping the force mode and the
  /// thresholds.
  #[must_use]
  pub const fn resolve(requested_force: Crc32cForce, tunables: Crc32cTunables, caps: Caps) -> Self {
    Self {
      requested_force,
      effective_force: requested_force.clamp_to(caps),
      tunables: tunables.clamped(),
    }
  }
}

#[derive(Clone, Copy, Debug, Default)]
struct Overrides {
  force: Crc32cForce,
  interleave_threshold: Option<usize>,
  hybrid_threshold: Option<usize>,
}

/// Overrides from a variable lookup. Unset, blank and unparsable values are
/// ignored.
#[cfg(any(feature = "std", test))]
fn parse_overrides<F, S>(lookup: F) -> Overrides
where
  F: Fn(&str) -> Option<S>,
  S: AsRef<str>,
{
  let threshold = |name: &str| lookup(name).and_then(|v| v.as_ref().trim().parse::<usize>().ok());

  Overrides {
    force: lookup("CASTAGNOLI_FORCE")
      .and_then(|v| v.as_ref().parse().ok())
      .unwrap_or_default(),
    interleave_threshold: threshold("CASTAGNOLI_THRESHOLD_INTERLEAVE"),
    hybrid_threshold: threshold("CASTAGNOLI_THRESHOLD_HYBRID"),
  }
}

#[cfg(feature = "std")]
fn read_env_overrides() -> Overrides {
  parse_overrides(|name| std::env::var(name).ok())
}

#[cfg(feature = "std")]
fn overrides() -> Overrides {
  use std::sync::OnceLock;
  static OVERRIDES: OnceLock<Overrides> = OnceLock::new();
  *OVERRIDES.get_or_init(read_env_overrides)
}

#[cfg(not(feature = "std"))]
fn overrides() -> Overrides {
  Overrides::default()
}

fn apply(ov: Overrides, caps: Caps) -> Crc32cConfig {
  let mut tunables = Crc32cTunables::DEFAULT;
  if let Some(v) = ov.interleave_threshold {
    tunables.interleave_threshold = v;
  }
  if let Some(v) = ov.hybrid_threshold {
    tunables.hybrid_threshold = v;
  }
  Crc32cConfig::resolve(ov.force, tunables, caps)
}

/// Effective CRC-32C configuration for the current platform.
#[inline]
#[must_use]
pub fn get() -> Crc32cConfig {
  apply(overrides(), caps())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_is_case_and_whitespace_insensitive() {
    assert_eq!(" Hybrid\n".parse::<Crc32cForce>(), Ok(Crc32cForce::Hybrid));
    assert_eq!("REFERENCE".parse::<Crc32cForce>(), Ok(Crc32cForce::Naive));
    assert_eq!("3way".parse::<Crc32cForce>(), Ok(Crc32cForce::Interleave));
    assert_eq!("".parse::<Crc32cForce>(), Err(ParseForceError));
    assert_eq!("slice8".parse::<Crc32cForce>(), Err(ParseForceError));
  }

  #[test]
  fn as_str_round_trips() {
    for force in [
      Crc32cForce::Auto,
      Crc32cForce::Naive,
      Crc32cForce::Table,
      Crc32cForce::Slice4,
      Crc32cForce::Hwcrc,
      Crc32cForce::Interleave,
      Crc32cForce::Fold,
      Crc32cForce::Hybrid,
    ] {
      assert_eq!(force.as_str().parse::<Crc32cForce>(), Ok(force));
    }
  }

  #[test]
  fn hardware_force_clamps_without_caps() {
    assert_eq!(Crc32cForce::Hwcrc.clamp_to(Caps::NONE), Crc32cForce::Auto);
    assert_eq!(Crc32cForce::Hybrid.clamp_to(Caps::HWCRC), Crc32cForce::Auto);
    assert_eq!(Crc32cForce::Hwcrc.clamp_to(Caps::HWCRC), Crc32cForce::Hwcrc);
    assert_eq!(Crc32cForce::Fold.clamp_to(Caps::PARALLEL), Crc32cForce::Fold);
    assert_eq!(Crc32cForce::Naive.clamp_to(Caps::NONE), Crc32cForce::Naive);
    assert_eq!(Crc32cForce::Slice4.clamp_to(Caps::NONE), Crc32cForce::Slice4);
  }

  #[test]
  fn thresholds_never_drop_below_two_blocks() {
    let ov = Overrides {
      force: Crc32cForce::Auto,
      interleave_threshold: Some(1),
      hybrid_threshold: Some(0),
    };
    let cfg = apply(ov, Caps::PARALLEL);
    assert_eq!(cfg.tunables.interleave_threshold, 2 * INTERLEAVE_BLOCK);
    assert_eq!(cfg.tunables.hybrid_threshold, 2 * HYBRID_BLOCK);
  }

  #[test]
  fn overrides_replace_defaults() {
    let ov = Overrides {
      force: Crc32cForce::Interleave,
      interleave_threshold: Some(4096),
      hybrid_threshold: Some(1 << 20),
    };
    let cfg = apply(ov, Caps::NONE);
    assert_eq!(cfg.requested_force, Crc32cForce::Interleave);
    assert_eq!(cfg.effective_force, Crc32cForce::Auto);
    assert_eq!(cfg.tunables.interleave_threshold, 4096);
    assert_eq!(cfg.tunables.hybrid_threshold, 1 << 20);
  }

  fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> {
    move |name: &str| vars.iter().find(|(k, _)| *k == name).map(|&(_, v)| v)
  }

  #[test]
  fn unset_variables_leave_defaults() {
    let ov = parse_overrides(lookup(&[]));
    assert_eq!(ov.force, Crc32cForce::Auto);
    assert_eq!(ov.interleave_threshold, None);
    assert_eq!(ov.hybrid_threshold, None);
  }

  #[test]
  fn variables_are_trimmed_and_parsed() {
    let ov = parse_overrides(lookup(&[
      ("CASTAGNOLI_FORCE", " hybrid \n"),
      ("CASTAGNOLI_THRESHOLD_INTERLEAVE", " 4096 "),
      ("CASTAGNOLI_THRESHOLD_HYBRID", "65536"),
    ]));
    assert_eq!(ov.force, Crc32cForce::Hybrid);
    assert_eq!(ov.interleave_threshold, Some(4096));
    assert_eq!(ov.hybrid_threshold, Some(65536));
  }

  #[test]
  fn unknown_empty_and_blank_values_are_ignored() {
    for bad in ["turbo", "", "   ", "\t\n", "-1", "abc", "4k"] {
      let ov = parse_overrides(lookup(&[
        ("CASTAGNOLI_FORCE", bad),
        ("CASTAGNOLI_THRESHOLD_INTERLEAVE", bad),
        ("CASTAGNOLI_THRESHOLD_HYBRID", bad),
      ]));
      assert_eq!(ov.force, Crc32cForce::Auto, "{bad:?}");
      assert_eq!(ov.interleave_threshold, None, "{bad:?}");
      assert_eq!(ov.hybrid_threshold, None, "{bad:?}");
    }
  }

  #[test]
  fn parsed_overrides_are_clamped_on_apply() {
    let ov = parse_overrides(lookup(&[
      ("CASTAGNOLI_FORCE", "FOLD128"),
      ("CASTAGNOLI_THRESHOLD_INTERLEAVE", "0"),
    ]));
    let cfg = apply(ov, Caps::NONE);
    assert_eq!(cfg.requested_force, Crc32cForce::Fold);
    assert_eq!(cfg.effective_force, Crc32cForce::Auto);
    assert_eq!(cfg.tunables.interleave_threshold, 2 * INTERLEAVE_BLOCK);
    assert_eq!(cfg.tunables.hybrid_threshold, Crc32cTunables::DEFAULT.hybrid_threshold);
  }

  #[test]
  fn defaults_are_already_clamped() {
    assert_eq!(Crc32cTunables::DEFAULT.clamped(), Crc32cTunables::DEFAULT);
  }
}
