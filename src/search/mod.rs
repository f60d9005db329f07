/*!

  The stochastic local-search subsystem: per-try bookkeeping and the flip engine,
  clause-weight management, and the three-tier variable-selection policy. The driver in
  `crate::solver` owns one `SearchState` and steps it in a tight loop.

*/

mod config;
mod picker;
mod state;
mod weights;

pub use config::SearchConfig;
pub(crate) use state::SearchState;
