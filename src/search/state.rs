/*!

  The mutable bookkeeping the search maintains across flips: the current assignment,
  per-clause satisfied-literal counts, the stacks of unsatisfied clauses and of variables
  occurring in them, per-variable scores, configuration-change flags, and the stack of
  configuration-changed decreasing variables.

  `flip` is the engine. It repairs every piece of this state in time proportional to the
  clauses containing the flipped variable plus its neighborhood, so the inner search loop
  never rescans the formula and never allocates.

*/

use crate::{BoolVariable, ClauseId, NULL_BOOL_VAR};
use crate::data_structures::IndexedStack;
use crate::formula::Formula;
use crate::neighbors::NeighborGraph;

// Keeps fixed variables out of every comparison a picker could make.
const FIXED_VAR_SCORE: i64 = i64::MIN / 4;


pub(crate) struct SearchState {
  pub(crate) cur_soln : Vec<bool>,         // the current assignment, indexed by variable
  pub(crate) sat_count: Vec<usize>,        // satisfied literals per clause
  pub(crate) sat_var  : Vec<BoolVariable>, // the unique satisfier, valid while sat_count == 1

  pub(crate) unsat_stack    : IndexedStack, // currently unsatisfied clauses
  pub(crate) unsatvar_stack : IndexedStack, // variables appearing in some unsatisfied clause
  pub(crate) unsat_app_count: Vec<usize>,   // in how many unsatisfied clauses a variable appears

  pub(crate) score      : Vec<i64>,
  pub(crate) time_stamp : Vec<u64>,         // step of the variable's last flip
  pub(crate) conf_change: Vec<bool>,        // some neighbor flipped since the variable's last flip

  // Configuration-changed decreasing variables: score > 0 and conf_change set.
  pub(crate) goodvar_stack: IndexedStack,

  pub(crate) clause_weight     : Vec<i64>,
  pub(crate) ave_weight        : i64,
  pub(crate) delta_total_weight: i64,

  pub(crate) best_unsat_this_try: usize,
  pub(crate) step : u64,
  pub(crate) tries: u64,
}

impl SearchState {
  pub(crate) fn new(formula: &Formula) -> SearchState {
    let num_vars    = formula.num_vars();
    let num_clauses = formula.num_clauses();

    SearchState {
      cur_soln           : vec![false; num_vars + 1],
      sat_count          : vec![0; num_clauses],
      sat_var            : vec![NULL_BOOL_VAR; num_clauses],
      unsat_stack        : IndexedStack::with_universe(num_clauses),
      unsatvar_stack     : IndexedStack::with_universe(num_vars + 1),
      unsat_app_count    : vec![0; num_vars + 1],
      score              : vec![0; num_vars + 1],
      time_stamp         : vec![0; num_vars + 1],
      conf_change        : vec![true; num_vars + 1],
      goodvar_stack      : IndexedStack::with_universe(num_vars + 1),
      clause_weight      : vec![1; num_clauses],
      ave_weight         : 1,
      delta_total_weight : 0,
      best_unsat_this_try: 0,
      step               : 0,
      tries              : 0,
    }
  }

  /// Rebuilds the whole state from a seed assignment. Clause weights restart at 1 each
  /// try; the weight average and its accumulator deliberately survive restarts. `step`
  /// also persists, so time stamps keep ordering variables across tries.
  pub(crate) fn init(&mut self, formula: &Formula, seed_assignment: &[bool]) {
    let num_vars    = formula.num_vars();
    let num_clauses = formula.num_clauses();

    for c in 0..num_clauses {
      self.clause_weight[c] = 1;
    }
    self.unsat_stack.clear();
    self.unsatvar_stack.clear();

    for v in 1..=num_vars {
      if formula.is_fixed(v) {
        self.cur_soln[v] = formula.fixed_value[v];
      } else {
        self.cur_soln[v]        = seed_assignment[v - 1];
        self.time_stamp[v]      = 0;
        self.conf_change[v]     = true;
        self.unsat_app_count[v] = 0;
      }
    }

    // Figure out sat_count and populate the unsat stack.
    for c in 0..num_clauses {
      if formula.is_deleted(c) {
        continue;
      }
      self.sat_count[c] = 0;
      for lit in formula.clause_lits(c) {
        if self.cur_soln[lit.var_num] == lit.sense {
          self.sat_count[c] += 1;
          self.sat_var[c] = lit.var_num;
        }
      }
      if self.sat_count[c] == 0 {
        self.enter_unsat(formula, c);
      }
    }

    // Figure out variable scores; every weight is 1 right now.
    for v in 1..=num_vars {
      if formula.is_fixed(v) {
        self.score[v] = FIXED_VAR_SCORE;
        continue;
      }
      self.score[v] = 0;
      for lit in formula.var_lits(v) {
        let c = lit.clause_num;
        if self.sat_count[c] == 0 {
          self.score[v] += 1;
        } else if self.sat_count[c] == 1 && lit.sense == self.cur_soln[v] {
          self.score[v] -= 1;
        }
      }
    }

    self.goodvar_stack.clear();
    for v in 1..=num_vars {
      if formula.is_fixed(v) {
        continue;
      }
      if self.score[v] > 0 {
        self.goodvar_stack.push(v);
      }
    }

    self.time_stamp[NULL_BOOL_VAR] = 0;
    self.best_unsat_this_try = self.unsat_stack.len();
  }

  /// Clause `clause` just became unsatisfied.
  pub(crate) fn enter_unsat(&mut self, formula: &Formula, clause: ClauseId) {
    self.unsat_stack.push(clause);

    for lit in formula.clause_lits(clause) {
      let v = lit.var_num;
      self.unsat_app_count[v] += 1;
      if self.unsat_app_count[v] == 1 {
        self.unsatvar_stack.push(v);
      }
    }
  }

  /// Clause `clause` just became satisfied.
  pub(crate) fn leave_unsat(&mut self, formula: &Formula, clause: ClauseId) {
    self.unsat_stack.remove(clause);

    for lit in formula.clause_lits(clause) {
      let v = lit.var_num;
      self.unsat_app_count[v] -= 1;
      if self.unsat_app_count[v] == 0 {
        self.unsatvar_stack.remove(v);
      }
    }
  }

  /// Flips `flipvar` and repairs all bookkeeping. Requires `flipvar` not fixed.
  pub(crate) fn flip(&mut self, formula: &Formula, neighbors: &NeighborGraph, flipvar: BoolVariable) {
    debug_assert!(!formula.is_fixed(flipvar));

    self.cur_soln[flipvar] = !self.cur_soln[flipvar];
    let org_flipvar_score = self.score[flipvar];

    for q in formula.var_lits(flipvar) {
      let c      = q.clause_num;
      let weight = self.clause_weight[c];

      if self.cur_soln[flipvar] == q.sense {
        // This occurrence just became true.
        self.sat_count[c] += 1;

        if self.sat_count[c] == 2 {
          // The former unique satisfier is no longer critical.
          let freed = self.sat_var[c];
          self.score[freed] += weight;
        } else if self.sat_count[c] == 1 {
          self.sat_var[c] = flipvar; // record the only true literal's variable
          for p in formula.clause_lits(c) {
            self.score[p.var_num] -= weight;
          }
          self.leave_unsat(formula, c);
        }
      } else {
        // This occurrence just became false.
        self.sat_count[c] -= 1;

        if self.sat_count[c] == 1 {
          for p in formula.clause_lits(c) {
            if p.sense == self.cur_soln[p.var_num] {
              self.score[p.var_num] -= weight;
              self.sat_var[c] = p.var_num;
              break;
            }
          }
        } else if self.sat_count[c] == 0 {
          for p in formula.clause_lits(c) {
            self.score[p.var_num] += weight;
          }
          self.enter_unsat(formula, c);
        }
      }
    }

    // Flipping twice restores the score exactly.
    self.score[flipvar] = -org_flipvar_score;

    self.conf_change[flipvar] = false;

    // Sweep variables that stopped being decreasing off the goodvar stack. Removal swaps
    // an already-inspected member down, so a single top-to-bottom pass suffices.
    let mut index = self.goodvar_stack.len();
    while index > 0 {
      index -= 1;
      let v = self.goodvar_stack.get(index);
      if self.score[v] <= 0 {
        self.goodvar_stack.remove(v);
      }
    }

    // The flip changed every neighbor's configuration.
    for &u in neighbors.of(flipvar) {
      self.conf_change[u] = true;
      if self.score[u] > 0 && !self.goodvar_stack.contains(u) {
        self.goodvar_stack.push(u);
      }
    }

    #[cfg(feature = "debug")]
    self.verify_unsat_stack(formula);
  }

  #[cfg(feature = "debug")]
  fn verify_unsat_stack(&self, formula: &Formula) {
    for i in 0..self.unsat_stack.len() {
      let c = self.unsat_stack.get(i);
      assert!(!formula.is_deleted(c), "deleted clause {} on the unsat stack", c);
      assert_eq!(self.sat_count[c], 0, "satisfied clause {} on the unsat stack", c);
    }
  }

  /// Recomputes every maintained quantity from scratch and compares. Costs a full formula
  /// scan; meant for tests and debug probes, never the inner loop.
  #[cfg(any(test, feature = "debug"))]
  pub(crate) fn check_invariants(&self, formula: &Formula) {
    for c in 0..formula.num_clauses() {
      if formula.is_deleted(c) {
        continue;
      }
      assert!(self.clause_weight[c] >= 1, "clause {} has weight below 1", c);

      let true_count = formula
          .clause_lits(c)
          .iter()
          .filter(| lit | self.cur_soln[lit.var_num] == lit.sense)
          .count();
      assert_eq!(self.sat_count[c], true_count, "sat_count wrong for clause {}", c);
      assert_eq!(
        self.unsat_stack.contains(c),
        true_count == 0,
        "unsat membership wrong for clause {}",
        c
      );

      if true_count == 1 {
        let unique = formula
            .clause_lits(c)
            .iter()
            .find(| lit | self.cur_soln[lit.var_num] == lit.sense)
            .map(| lit | lit.var_num);
        assert_eq!(Some(self.sat_var[c]), unique, "sat_var wrong for clause {}", c);
      }
    }

    for v in 1..=formula.num_vars() {
      if formula.is_fixed(v) {
        continue;
      }

      let mut expected_score = 0i64;
      let mut unsat_apps     = 0usize;
      for lit in formula.var_lits(v) {
        let c = lit.clause_num;
        if self.sat_count[c] == 0 {
          expected_score += self.clause_weight[c];
          unsat_apps += 1;
        } else if self.sat_count[c] == 1 && self.sat_var[c] == v {
          expected_score -= self.clause_weight[c];
        }
      }

      assert_eq!(self.score[v], expected_score, "score wrong for variable {}", v);
      assert_eq!(self.unsat_app_count[v], unsat_apps, "unsat_app_count wrong for variable {}", v);
      assert_eq!(
        self.unsatvar_stack.contains(v),
        unsat_apps > 0,
        "unsatvar membership wrong for variable {}",
        v
      );

      // A member of the goodvar stack must qualify; non-members may lag behind until the
      // next weight update re-admits them.
      if self.goodvar_stack.contains(v) {
        assert!(self.score[v] > 0, "goodvar {} has score {}", v, self.score[v]);
        assert!(self.conf_change[v], "goodvar {} without configuration change", v);
      }
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::Literal;

  fn build(num_vars: usize, clauses: &[&[i32]]) -> (Formula, NeighborGraph) {
    let mut formula = Formula::new(num_vars, clauses.len()).unwrap();
    for codes in clauses {
      let lits: Vec<Literal> = codes.iter().map(| &code | Literal::from_dimacs(code)).collect();
      formula.add_clause(&lits).unwrap();
    }
    formula.finish();
    if formula.has_units() {
      formula.unit_propagate();
    }
    let graph = NeighborGraph::build(&formula);
    (formula, graph)
  }

  #[test]
  fn init_computes_counts_scores_and_stacks() {
    let (formula, _) = build(2, &[&[1, 2], &[-1, 2], &[1, -2]]);
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[false, false]);

    // Under all-false: {1,2} unsat, {-1,2} sat by -1, {1,-2} sat by -2.
    assert_eq!(state.unsat_stack.as_slice(), &[0]);
    assert_eq!(state.sat_count[0], 0);
    assert_eq!(state.sat_count[1], 1);
    assert_eq!(state.sat_var[1], 1);
    assert_eq!(state.sat_count[2], 1);
    assert_eq!(state.sat_var[2], 2);

    // Flipping 1 satisfies clause 0 but breaks clause 1; net 0. Same for 2.
    assert_eq!(state.score[1], 0);
    assert_eq!(state.score[2], 0);
    assert!(state.goodvar_stack.is_empty());
    assert!(state.unsatvar_stack.contains(1));
    assert!(state.unsatvar_stack.contains(2));
    assert_eq!(state.best_unsat_this_try, 1);

    state.check_invariants(&formula);
  }

  #[test]
  fn flip_repairs_all_bookkeeping() {
    let (formula, graph) = build(2, &[&[1, 2], &[-1, 2], &[1, -2]]);
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[false, false]);

    state.flip(&formula, &graph, 2);
    state.check_invariants(&formula);

    // 2=true satisfies {1,2} and {-1,2}, leaves {1,-2} unsatisfied.
    assert_eq!(state.unsat_stack.as_slice(), &[2]);
    assert!(!state.conf_change[2]);
    assert!(state.conf_change[1]);

    state.flip(&formula, &graph, 1);
    state.check_invariants(&formula);
    assert!(state.unsat_stack.is_empty());
    assert!(state.unsatvar_stack.is_empty());
  }

  #[test]
  fn double_flip_is_an_involution_on_search_state() {
    let (formula, graph) = build(3, &[&[1, 2, 3], &[-1, 2], &[-2, -3], &[1, -3]]);
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[true, false, true]);

    let cur_soln  = state.cur_soln.clone();
    let sat_count = state.sat_count.clone();
    let score     = state.score.clone();
    let mut unsat: Vec<usize> = state.unsat_stack.as_slice().to_vec();
    unsat.sort_unstable();
    let unsat_app = state.unsat_app_count.clone();

    state.flip(&formula, &graph, 2);
    state.flip(&formula, &graph, 2);

    assert_eq!(state.cur_soln, cur_soln);
    assert_eq!(state.sat_count, sat_count);
    assert_eq!(state.score, score);
    let mut unsat_after: Vec<usize> = state.unsat_stack.as_slice().to_vec();
    unsat_after.sort_unstable();
    assert_eq!(unsat_after, unsat);
    assert_eq!(state.unsat_app_count, unsat_app);
    state.check_invariants(&formula);
  }

  #[test]
  fn long_flip_sequences_keep_the_invariants() {
    let (formula, graph) = build(
      4,
      &[&[1, 2, 3], &[-1, 2], &[-2, -3], &[1, -3, 4], &[-4, 1], &[2, 4]],
    );
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[false, true, false, true]);

    for round in 0..48usize {
      let v = round % 4 + 1;
      state.flip(&formula, &graph, v);
      state.step += 1;
      state.time_stamp[v] = state.step;
      state.check_invariants(&formula);
    }
  }

  #[test]
  fn fixed_variables_keep_their_propagated_value_through_init() {
    let (formula, _) = build(3, &[&[1], &[-1, 2, 3]]);
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[false, false, false]);

    assert!(state.cur_soln[1], "propagated value must override the seed");
    assert_eq!(state.score[1], FIXED_VAR_SCORE);
    assert!(!state.goodvar_stack.contains(1));
    state.check_invariants(&formula);
  }
}
