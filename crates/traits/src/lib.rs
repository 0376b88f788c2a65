//! Core checksum traits for the castagnoli workspace.
//!
//! This crate holds the algorithm-agnostic surface that checksum crates
//! conform to. It is `no_std` compatible and has zero dependencies.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Checksum`] | One-shot and streaming checksum computation |
//! | [`ChecksumCombine`] | `crc(A ‖ B)` from `crc(A)`, `crc(B)`, `len(B)` |
//!
//! With `std`, [`io::ChecksumReader`] and [`io::ChecksumWriter`] wrap any
//! reader/writer and checksum the bytes that actually move through them.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;
pub mod io;

pub use checksum::{Checksum, ChecksumCombine};
