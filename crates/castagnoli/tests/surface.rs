//! Hasher, I/O adapters, configuration and introspection through the public API.

#![cfg(feature = "std")]

use std::io::{Read, Write};

use castagnoli::{
  BufferedCrc32c, Caps, Checksum, ChecksumReader, ChecksumWriter, Crc32c, Crc32cForce, DispatchInfo, Engine, diag,
  dispatch::{Dispatcher, SelectionReason},
};

/// Accepts at most 5 bytes per call.
struct Trickle(Vec<u8>);

impl Write for Trickle {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    let n = buf.len().min(5);
    self.0.extend_from_slice(&buf[..n]);
    Ok(n)
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

#[test]
fn writer_absorbs_only_accepted_bytes() {
  let mut writer = ChecksumWriter::<_, Crc32c>::new(Trickle(Vec::new()));
  assert_eq!(writer.write(b"123456789").unwrap(), 5);
  assert_eq!(writer.crc(), Crc32c::checksum(b"12345"));

  writer.write_all(b"6789").unwrap();
  let (inner, crc) = writer.into_parts();
  assert_eq!(inner.0, b"123456789");
  assert_eq!(crc, 0xE306_9283);
}

#[test]
fn reader_resumes_from_initial() {
  let mut reader = ChecksumReader::<_, Crc32c>::with_initial(&b"56789"[..], Crc32c::checksum(b"1234"));
  let mut sink = Vec::new();
  reader.read_to_end(&mut sink).unwrap();
  assert_eq!(reader.crc(), 0xE306_9283);
}

#[test]
fn io_copy_into_hasher() {
  let data = vec![0x5Au8; 100_000];
  let mut hasher = Crc32c::new();
  std::io::copy(&mut &data[..], &mut hasher).unwrap();
  assert_eq!(hasher.finalize(), Crc32c::checksum(&data));
}

#[test]
fn buffered_and_plain_hashers_agree() {
  let data: Vec<u8> = (0..70_000u32).map(|i| (i % 253) as u8).collect();
  let mut plain = Crc32c::new();
  let mut buffered = BufferedCrc32c::new();
  for part in data.chunks(37) {
    plain.update(part);
    buffered.update(part);
  }
  assert_eq!(plain.finalize(), buffered.finalize());
  assert_eq!(BufferedCrc32c::backend_name(), Crc32c::backend_name());
}

#[test]
fn clone_forks_the_stream() {
  let mut a = Crc32c::new();
  a.update(b"1234");
  let mut b = a.clone();
  a.update(b"56789");
  b.update(b"5678");
  assert_eq!(a.finalize(), 0xE306_9283);
  assert_ne!(a.finalize(), b.finalize());
}

#[test]
fn force_parsing_reports_unknown_values() {
  let err = "turbo".parse::<Crc32cForce>().unwrap_err();
  assert!(err.to_string().contains("unknown CRC-32C engine"));
  let _: &dyn std::error::Error = &err;
  assert_eq!("FOLD128".parse::<Crc32cForce>(), Ok(Crc32cForce::Fold));
}

#[test]
fn introspection_is_consistent() {
  let info = DispatchInfo::current();
  assert_eq!(info.backend(), castagnoli::backend_name());
  assert_eq!(info.caps(), Dispatcher::current().caps());
  assert_eq!(info.config(), Crc32c::config());
  assert!(info.to_string().contains("force="));

  for len in [0, 10, 2048, 16 * 1024, 1 << 20] {
    let d = diag::select(len);
    assert_eq!(d.selected_kernel, castagnoli::kernel_name_for_len(len));
    assert_eq!(d.selected_kernel, Crc32c::kernel_name_for_len(len));
  }
}

#[test]
fn hardware_flag_matches_detected_caps() {
  let caps = castagnoli::caps::caps();
  if Crc32c::config().effective_force == Crc32cForce::Auto {
    assert_eq!(castagnoli::dispatch::is_hardware_accelerated(), caps.has(Caps::HWCRC));
  }
  assert_eq!(Engine::HwScalar.is_accelerated(), caps.has(Caps::HWCRC));
}

#[test]
fn auto_selection_on_parallel_caps() {
  let caps = castagnoli::caps::caps();
  if !caps.has(Caps::PARALLEL) || Crc32c::config().effective_force != Crc32cForce::Auto {
    return;
  }
  let d = diag::select(Crc32c::config().tunables.hybrid_threshold);
  assert_eq!(d.engine, Engine::Hybrid);
  assert_eq!(d.reason, SelectionReason::AboveHybridThreshold);
  assert!(d.has_hwcrc && d.has_clmul);
}
