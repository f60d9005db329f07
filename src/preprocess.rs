/*!

  Unit propagation over the ingested formula. Queued unit literals are fixed one at a
  time; satisfied clauses are deleted, falsified occurrences are swap-removed, and
  clauses collapsing to a single literal feed the queue. Afterwards the per-variable
  occurrence lists are rebuilt from the surviving clauses.

*/

use crate::formula::{Formula, Lit};
use crate::log::log_at_level;


impl Formula {
  /// Drains the unit-clause queue. Never fails: a contradictory unit set is reported as
  /// a diagnostic and the first fixed value wins; the search simply won't converge.
  pub fn unit_propagate(&mut self) {
    let mut head = 0;

    while head < self.unit_queue.len() {
      let uc = self.unit_queue[head];
      head += 1;

      let uc_var   = uc.var_num;
      let uc_sense = uc.sense;

      if self.fix[uc_var] {
        if uc_sense != self.fixed_value[uc_var] {
          log_at_level(1, "wants to fix a variable twice, forbid");
        }
        continue;
      }

      self.fixed_value[uc_var] = uc_sense;
      self.fix[uc_var]         = true;

      for i in 0..self.var_lit_count[uc_var] {
        let cur = self.var_lit[uc_var][i];
        let c   = cur.clause_num;

        if self.clause_delete[c] {
          continue;
        }

        if cur.sense == uc_sense {
          // The clause is satisfied outright.
          self.clause_delete[c] = true;
          continue;
        }

        // The occurrence is falsified.
        if self.clause_lit_count[c] == 2 {
          let first  = self.clause_lit[c][0];
          let second = self.clause_lit[c][1];
          // Only a binary clause that really contains the falsified variable collapses
          // to a unit; a stale occurrence falls through to the removal scan below.
          if first.var_num == uc_var || second.var_num == uc_var {
            let remaining = if first.var_num == uc_var { second } else { first };
            self.unit_queue.push(remaining);
            self.clause_delete[c] = true;
            continue;
          }
        }

        for j in 0..self.clause_lit_count[c] {
          if self.clause_lit[c][j].var_num == uc_var {
            self.clause_lit[c][j] = self.clause_lit[c][self.clause_lit_count[c] - 1];
            self.clause_lit_count[c] -= 1;
            break;
          }
        }
      }
    }

    self.rebuild_after_propagation();
  }

  /// Re-terminates the shrunk clauses, rebuilds the occurrence lists over the surviving
  /// clauses, and refreshes the aggregate statistics.
  fn rebuild_after_propagation(&mut self) {
    let mut delete_clause_count = 0;
    let mut fix_var_count       = 0;

    for c in 0..self.clause_lit.len() {
      if self.clause_delete[c] {
        delete_clause_count += 1;
        continue;
      }
      let count = self.clause_lit_count[c];
      self.clause_lit[c].truncate(count);
      self.clause_lit[c].push(Lit::SENTINEL);
    }

    for v in 1..=self.num_vars() {
      if self.fix[v] {
        fix_var_count += 1;
      }
    }

    self.build_var_lits();
    self.recount_clause_stats();

    log_at_level(
      2,
      &format!(
        "unit propagation fixes {} variables, and deletes {} clauses",
        fix_var_count,
        delete_clause_count
      ),
    );
  }
}


#[cfg(test)]
mod tests {
  use crate::{Formula, Literal};

  fn clause(codes: &[i32]) -> Vec<Literal> {
    codes.iter().map(| &code | Literal::from_dimacs(code)).collect()
  }

  fn build(num_vars: usize, clauses: &[&[i32]]) -> Formula {
    let mut formula = Formula::new(num_vars, clauses.len()).unwrap();
    for codes in clauses {
      formula.add_clause(&clause(codes)).unwrap();
    }
    formula.finish();
    formula
  }

  #[test]
  fn forced_chain_fixes_every_variable() {
    let mut formula = build(4, &[&[1], &[-1, 2], &[-2, 3], &[-3, 4]]);
    formula.unit_propagate();

    for v in 1..=4 {
      assert!(formula.is_fixed(v), "variable {} should be fixed", v);
      assert!(formula.fixed_value[v], "variable {} should be fixed true", v);
    }
    for c in 0..formula.num_clauses() {
      assert!(formula.is_deleted(c), "clause {} should be deleted", c);
    }
    for v in 1..=4 {
      assert!(formula.var_lits(v).is_empty());
    }
  }

  #[test]
  fn binary_clause_collapse_enqueues_the_survivor() {
    let mut formula = build(3, &[&[1], &[-1, -2], &[2, 3]]);
    formula.unit_propagate();

    // 1 is forced true, so {-1,-2} collapses and forces 2 false, which shrinks {2,3}
    // to the unit {3}.
    assert!(formula.is_fixed(1) && formula.fixed_value[1]);
    assert!(formula.is_fixed(2) && !formula.fixed_value[2]);
    assert!(formula.is_fixed(3) && formula.fixed_value[3]);
  }

  #[test]
  fn contradictory_units_keep_the_first_value() {
    let mut formula = build(2, &[&[1], &[-1], &[1, 2]]);
    formula.unit_propagate();

    assert!(formula.is_fixed(1));
    assert!(formula.fixed_value[1]);
    // {1,2} was satisfied by the first unit and deleted.
    assert!(formula.is_deleted(2));
  }

  #[test]
  fn surviving_clauses_lose_only_falsified_occurrences() {
    let mut formula = build(4, &[&[1], &[-1, 2, 3], &[2, 3, 4]]);
    formula.unit_propagate();

    assert!(formula.is_fixed(1));
    assert!(!formula.is_deleted(1));
    let survivors: Vec<_> = formula.clause_lits(1).iter().map(| lit | lit.var_num).collect();
    assert_eq!(survivors.len(), 2);
    assert!(survivors.contains(&2) && survivors.contains(&3));
    // The untouched clause keeps all three literals.
    assert_eq!(formula.clause_lits(2).len(), 3);
    // Aggregates reflect the surviving clauses only.
    assert_eq!(formula.formula_len(), 5);
  }
}
