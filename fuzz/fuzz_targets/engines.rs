//! Differential fuzzing: every engine, native and emulated, against the
//! bitwise reference, from an arbitrary register seed. The native merge
//! shift is checked against the software one on the same values.

#![no_main]

use arbitrary::Arbitrary;
use castagnoli::{
  Caps, Engine,
  engine::{ShiftKernel, naive},
  gf2,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  seed: u32,
  data: Vec<u8>,
  merge_with: u32,
  gap_bits: u32,
}

fuzz_target!(|input: Input| {
  let data = input.data.as_slice();
  let expected = naive::compute(input.seed, data);

  for engine in Engine::ALL {
    for kernel in [engine.kernel(), engine.kernel_with(Caps::NONE)] {
      let got = kernel.call(input.seed, data);
      assert_eq!(
        got,
        expected,
        "{} mismatch: seed={:#010x}, got={got:#010x}, expected={expected:#010x}, len={}",
        kernel.name,
        input.seed,
        data.len()
      );
    }
  }

  let gap = u64::from(input.gap_bits);
  let native = gf2::merge_with(ShiftKernel::current(), expected, input.merge_with, gap);
  let software = gf2::merge_with(ShiftKernel::with_caps(Caps::NONE), expected, input.merge_with, gap);
  assert_eq!(native, software, "merge mismatch: gap_bits={gap}");
});
