/*!

These are generic structures and algorithms: they do not depend on anything specific to this
codebase or application.

*/

mod indexed_stack;
mod random;
mod statistics;

pub use indexed_stack::IndexedStack;
pub use random::RandomGenerator;
pub use statistics::{Statistic, Statistics};
