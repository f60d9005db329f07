/*!

  A `Model` maps `BoolVariable`s to their truth values. It is a thin wrapper around a
  vector of `bool`s indexed by variable id, recording the satisfying assignment the
  search found.

*/

use std::fmt::{Display, Formatter};
use std::ops::Index;

use itertools::Itertools;

use crate::{BoolVariable, Literal};


#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Model {
  // Index 0 is the sentinel slot; real variables start at 1.
  assignments: Vec<bool>,
}

impl Model {
  pub(crate) fn from_assignment(assignment: &[bool]) -> Model {
    Model { assignments: assignment.to_vec() }
  }

  pub fn num_vars(&self) -> usize {
    self.assignments.len().saturating_sub(1)
  }

  pub fn is_empty(&self) -> bool {
    self.num_vars() == 0
  }

  pub fn value(&self, v: BoolVariable) -> bool {
    self.assignments[v]
  }

  /// A literal holds under the model iff its variable's value agrees with its polarity.
  pub fn satisfies(&self, literal: Literal) -> bool {
    self.assignments[literal.var()] != literal.sign()
  }

  pub(crate) fn clear(&mut self) {
    self.assignments.clear();
  }
}

impl Index<BoolVariable> for Model {
  type Output = bool;

  fn index(&self, index: BoolVariable) -> &Self::Output {
    &self.assignments[index]
  }
}

impl Display for Model {
  /// Renders in the classic `v ` solution-line style: signed variable ids, ten per line,
  /// terminated by `0`.
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let ids: Vec<String> = (1..=self.num_vars())
        .map(| v | {
          if self.assignments[v] {
            format!("{}", v)
          } else {
            format!("-{}", v)
          }
        })
        .collect();

    if ids.is_empty() {
      return write!(f, "v 0");
    }

    let lines = ids
        .chunks(10)
        .map(| chunk | format!("v {}", chunk.join(" ")))
        .join("\n");

    // A full final line of ten ids wraps before the terminator, so the `0` always sits
    // on a line holding fewer than ten ids.
    if ids.len() % 10 == 0 {
      write!(f, "{}\nv 0", lines)
    } else {
      write!(f, "{} 0", lines)
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn literal_satisfaction_respects_polarity() {
    let model = Model::from_assignment(&[false, true, false]);
    assert!(model.satisfies(Literal::from_dimacs(1)));
    assert!(!model.satisfies(Literal::from_dimacs(-1)));
    assert!(model.satisfies(Literal::from_dimacs(-2)));
    assert!(!model.satisfies(Literal::from_dimacs(2)));
  }

  #[test]
  fn displays_solution_line() {
    let model = Model::from_assignment(&[false, true, false, true]);
    assert_eq!(format!("{}", model), "v 1 -2 3 0");
  }

  #[test]
  fn long_models_wrap_every_ten_variables() {
    let mut assignment = vec![false];
    assignment.extend(std::iter::repeat(true).take(12));
    let rendered = format!("{}", Model::from_assignment(&assignment));
    assert_eq!(rendered, "v 1 2 3 4 5 6 7 8 9 10\nv 11 12 0");
  }

  #[test]
  fn a_full_line_of_ten_wraps_before_the_terminator() {
    let mut assignment = vec![false];
    assignment.extend(std::iter::repeat(true).take(10));
    let rendered = format!("{}", Model::from_assignment(&assignment));
    assert_eq!(rendered, "v 1 2 3 4 5 6 7 8 9 10\nv 0");
  }
}
