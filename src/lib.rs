
mod data_structures;
mod errors;
mod formula;
mod literal;
mod log;
mod model;
mod neighbors;
mod preprocess;
mod resource_limit;
mod search;
mod solver;
mod verdict;


// Re-exported items
pub use data_structures::{IndexedStack, RandomGenerator, Statistic, Statistics};
pub use errors::Error;
pub use formula::{Formula, Lit};
pub use literal::{Literal, LiteralVector};
pub use log::{set_verbosity, verbosity};
pub use model::Model;
pub use neighbors::NeighborGraph;
pub use resource_limit::ResourceLimit;
pub use search::SearchConfig;
pub use solver::CcaSolver;
pub use verdict::Verdict;


/// A bool variable $x_j$ has corresponding literals $x_j$ and $\overline{x}_j$. Variables are
/// numbered `1..=num_vars`; the id `0` is reserved as a sentinel and never names a real variable.
pub type BoolVariable               = usize;
pub const NULL_BOOL_VAR: BoolVariable = 0;
pub type BoolVariableVector         = Vec<BoolVariable>;

/// Clauses are numbered `0..num_clauses`.
pub type ClauseId                 = usize;
pub const NULL_CLAUSE: ClauseId   = ClauseId::MAX;

/* limits on the size of the problem */
pub const MAX_VARS   : usize = 4_000_010;
pub const MAX_CLAUSES: usize = 20_000_000;
