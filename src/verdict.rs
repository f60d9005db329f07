/*!

  The outcome of a solver run. Local search is incomplete: it either finds a model or
  gives up, it never proves unsatisfiability.

*/

use std::fmt::{Display, Formatter};


#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Verdict {
  Satisfiable,
  Unknown,
}

impl Verdict {
  pub fn is_satisfiable(&self) -> bool {
    *self == Verdict::Satisfiable
  }

  pub fn to_sat_str(&self) -> &'static str {
    match self {
      Verdict::Satisfiable => "SATISFIABLE",
      Verdict::Unknown     => "UNKNOWN",
    }
  }
}

impl Display for Verdict {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_sat_str())
  }
}
