//! Streaming, resume and combine agree with one-shot on arbitrary input.

#![no_main]

use arbitrary::Arbitrary;
use castagnoli::{BufferedCrc32c, Crc32c};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  split_point: usize,
  seed: u32,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let split = input.split_point % (data.len() + 1);
  let (a, b) = data.split_at(split);

  let oneshot = Crc32c::checksum(data);

  let mut hasher = Crc32c::new();
  hasher.update(a);
  hasher.update(b);
  assert_eq!(hasher.finalize(), oneshot, "incremental mismatch");

  let mut buffered = BufferedCrc32c::new();
  buffered.update(a);
  buffered.update(b);
  assert_eq!(buffered.finalize(), oneshot, "buffered mismatch");

  let crc_a = Crc32c::checksum(a);
  let mut resumed = Crc32c::resume(crc_a);
  resumed.update(b);
  assert_eq!(resumed.finalize(), oneshot, "resume mismatch");

  let combined = Crc32c::combine(crc_a, Crc32c::checksum(b), b.len());
  assert_eq!(combined, oneshot, "combine mismatch");

  let seeded = castagnoli::compute(castagnoli::compute(input.seed, a), b);
  assert_eq!(seeded, castagnoli::compute(input.seed, data), "seeded concatenation mismatch");
});
