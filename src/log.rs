/*!

  Handles emitting verbosity-gated diagnostic messages. Messages are written to `stderr`
  prefixed with `c `, the comment convention of DIMACS-style solver output.

*/

use std::sync::atomic::{AtomicI32, Ordering};

static VERBOSITY: AtomicI32 = AtomicI32::new(0);

pub fn set_verbosity(new_value: i32) {
  VERBOSITY.store(new_value, Ordering::Relaxed);
}

pub fn verbosity() -> i32 {
  VERBOSITY.load(Ordering::Relaxed)
}

pub(crate) fn log_at_level(level: i32, msg: &str) {
  if verbosity() >= level {
    eprintln!("c {}", msg);
  }
}
