//! Print what the dispatcher does on this machine.
//!
//! Run with: `cargo run --example introspect -p castagnoli`
//! Try `CASTAGNOLI_FORCE=fold` or `CASTAGNOLI_THRESHOLD_HYBRID=65536`.

use castagnoli::{Crc32c, DispatchInfo, Engine, diag};

fn main() {
  println!("{}", DispatchInfo::current());
  println!("hardware accelerated: {}", castagnoli::dispatch::is_hardware_accelerated());
  println!();

  println!("{:>10}  {:<28} {:<14} reason", "len", "kernel", "engine");
  for len in [0usize, 64, 1024, 2048, 8192, 16 * 1024, 1 << 20] {
    let d = diag::select(len);
    println!(
      "{:>10}  {:<28} {:<14} {}",
      len,
      d.selected_kernel,
      d.engine.name(),
      d.reason.as_str()
    );
  }
  println!();

  let data = b"123456789";
  for engine in Engine::ALL {
    let accel = if engine.is_accelerated() { "native" } else { "portable" };
    println!(
      "{:<14} {:<28} {:08X}  ({accel})",
      engine.name(),
      engine.kernel().name,
      engine.compute(0, data)
    );
  }
  assert_eq!(Crc32c::checksum(data), 0xE306_9283);
}
