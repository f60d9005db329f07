/*!

  For every variable, the set of variables it shares at least one surviving clause with.
  Built once after preprocessing; flips consult it to mark neighboring variables as
  configuration-changed.

*/

use bit_set::BitSet;

use crate::{BoolVariable, BoolVariableVector, NULL_BOOL_VAR};
use crate::formula::Formula;


pub struct NeighborGraph {
  // 1-indexed by variable; each list is deduplicated, sorted, and zero-terminated.
  var_neighbor: Vec<BoolVariableVector>,
}

impl NeighborGraph {
  pub fn build(formula: &Formula) -> NeighborGraph {
    let num_vars = formula.num_vars();
    let mut var_neighbor: Vec<BoolVariableVector> = vec![Vec::new(); num_vars + 1];
    let mut neighbor_flag = BitSet::with_capacity(num_vars + 1);
    let mut touched: BoolVariableVector = Vec::new();

    for v in 1..=num_vars {
      if formula.is_fixed(v) {
        var_neighbor[v].push(NULL_BOOL_VAR);
        continue;
      }

      neighbor_flag.insert(v);
      touched.clear();

      for occurrence in formula.var_lits(v) {
        let c = occurrence.clause_num;
        if formula.is_deleted(c) {
          continue;
        }
        for lit in formula.clause_lits(c) {
          let u = lit.var_num;
          if !neighbor_flag.contains(u) {
            neighbor_flag.insert(u);
            touched.push(u);
          }
        }
      }

      // Reset only the touched flags so the scratch set stays cheap across variables.
      neighbor_flag.remove(v);
      for &u in &touched {
        neighbor_flag.remove(u);
      }

      let mut collected: BoolVariableVector =
          touched.iter().copied().filter(| &u | !formula.is_fixed(u)).collect();
      collected.sort_unstable();
      collected.push(NULL_BOOL_VAR);
      var_neighbor[v] = collected;
    }

    NeighborGraph { var_neighbor }
  }

  /// The neighbors of `v`, terminator excluded. Empty for fixed variables.
  pub fn of(&self, v: BoolVariable) -> &[BoolVariable] {
    let list = &self.var_neighbor[v];
    &list[..list.len() - 1]
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Formula, Literal};

  fn build_graph(num_vars: usize, clauses: &[&[i32]], propagate: bool) -> (Formula, NeighborGraph) {
    let mut formula = Formula::new(num_vars, clauses.len()).unwrap();
    for codes in clauses {
      let lits: Vec<Literal> = codes.iter().map(| &code | Literal::from_dimacs(code)).collect();
      formula.add_clause(&lits).unwrap();
    }
    formula.finish();
    if propagate {
      formula.unit_propagate();
    }
    let graph = NeighborGraph::build(&formula);
    (formula, graph)
  }

  #[test]
  fn shared_clauses_make_neighbors_without_duplicates() {
    // 1 meets 2 twice and 3 once; the list must hold each neighbor once.
    let (_, graph) = build_graph(3, &[&[1, 2], &[-1, 2], &[1, -2, 3]], false);
    assert_eq!(graph.of(1), &[2, 3]);
    assert_eq!(graph.of(2), &[1, 3]);
    assert_eq!(graph.of(3), &[1, 2]);
  }

  #[test]
  fn a_variable_is_not_its_own_neighbor() {
    let (_, graph) = build_graph(2, &[&[1, 2]], false);
    assert_eq!(graph.of(1), &[2]);
    assert_eq!(graph.of(2), &[1]);
  }

  #[test]
  fn fixed_variables_are_excluded_both_ways() {
    let (formula, graph) = build_graph(3, &[&[1], &[-1, 2, 3]], true);
    assert!(formula.is_fixed(1));
    assert!(graph.of(1).is_empty());
    // Clause {-1,2,3} shrank to {2,3}, so 2 and 3 still neighbor each other but not 1.
    assert_eq!(graph.of(2), &[3]);
    assert_eq!(graph.of(3), &[2]);
  }

  #[test]
  fn variables_in_disjoint_clauses_are_strangers() {
    let (_, graph) = build_graph(4, &[&[1, 2], &[3, 4]], false);
    assert_eq!(graph.of(1), &[2]);
    assert_eq!(graph.of(3), &[4]);
  }
}
