/*!

  A cooperative budget for the search loop: a step counter with an optional cap, plus an
  atomic cancel flag another thread may raise. The loop polls `inc()` once per flip and
  winds down at the next step boundary.

*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};


pub struct ResourceLimit {
  count : u64,
  limit : u64, // `u64::MAX` means unlimited
  cancel: Arc<AtomicBool>,
}

impl ResourceLimit {
  pub fn new() -> Self {
    ResourceLimit {
      count : 0,
      limit : u64::MAX,
      cancel: Arc::new(AtomicBool::new(false)),
    }
  }

  pub fn with_limit(limit: u64) -> Self {
    let mut resource_limit = Self::new();
    resource_limit.limit = limit;
    resource_limit
  }

  pub fn set_limit(&mut self, limit: u64) {
    self.limit = limit;
  }

  /// Counts one step and reports whether the search may continue.
  pub fn inc(&mut self) -> bool {
    self.count += 1;
    !self.canceled() && self.count <= self.limit
  }

  pub fn count(&self) -> u64 {
    self.count
  }

  pub fn canceled(&self) -> bool {
    self.cancel.load(Ordering::Relaxed)
  }

  /// A handle another thread can set to stop the search cooperatively.
  pub fn cancel_handle(&self) -> Arc<AtomicBool> {
    self.cancel.clone()
  }

  pub fn reset_count(&mut self) {
    self.count = 0;
  }
}

impl Default for ResourceLimit {
  fn default() -> Self {
    Self::new()
  }
}
