/*!

  Smoothed clause weighting. Entering random-walk mode bumps the weight of every
  unsatisfied clause; once the running weight average climbs past the configured
  threshold, all weights decay toward the average: `w <- max(1, w*p + ave*q)`.

*/

use crate::formula::Formula;
use super::config::SearchConfig;
use super::state::SearchState;


impl SearchState {
  /// Bumps every unsatisfied clause's weight by one and credits each variable in an
  /// unsatisfied clause with the corresponding make-score gain. Newly decreasing
  /// configuration-changed variables join the goodvar stack here.
  pub(crate) fn update_clause_weights(&mut self, formula: &Formula, config: &SearchConfig) {
    for i in 0..self.unsat_stack.len() {
      let c = self.unsat_stack.get(i);
      self.clause_weight[c] += 1;
    }

    for i in 0..self.unsatvar_stack.len() {
      let v = self.unsatvar_stack.get(i);
      self.score[v] += self.unsat_app_count[v] as i64;
      if self.score[v] > 0 && self.conf_change[v] && !self.goodvar_stack.contains(v) {
        self.goodvar_stack.push(v);
      }
    }

    self.delta_total_weight += self.unsat_stack.len() as i64;
    while self.delta_total_weight >= formula.num_clauses() as i64 {
      self.ave_weight += 1;
      self.delta_total_weight -= formula.num_clauses() as i64;

      if self.ave_weight > config.swt_threshold {
        self.smooth_clause_weights(formula, config);
      }
    }
  }

  /// Decays every surviving clause's weight toward the average and recomputes all scores
  /// in the same pass. The goodvar stack is intentionally left alone; the next weight
  /// update re-admits any variable this pass turned decreasing.
  pub(crate) fn smooth_clause_weights(&mut self, formula: &Formula, config: &SearchConfig) {
    let scale_ave = config.scale_ave();
    let mut new_total_weight: i64 = 0;

    for v in 1..=formula.num_vars() {
      if !formula.is_fixed(v) {
        self.score[v] = 0;
      }
    }

    for c in 0..formula.num_clauses() {
      if formula.is_deleted(c) {
        continue;
      }

      let mut weight = (self.clause_weight[c] as f64 * config.swt_p) as i64 + scale_ave;
      if weight < 1 {
        weight = 1;
      }
      self.clause_weight[c] = weight;
      new_total_weight += weight;

      if self.sat_count[c] == 0 {
        for lit in formula.clause_lits(c) {
          self.score[lit.var_num] += weight;
        }
      } else if self.sat_count[c] == 1 {
        let sv = self.sat_var[c];
        self.score[sv] -= weight;
      }
    }

    self.ave_weight = new_total_weight / formula.num_clauses() as i64;
  }
}


#[cfg(test)]
mod tests {
  use crate::{Formula, Literal, NeighborGraph, SearchConfig};
  use crate::search::SearchState;

  fn build(num_vars: usize, clauses: &[&[i32]]) -> (Formula, NeighborGraph) {
    let mut formula = Formula::new(num_vars, clauses.len()).unwrap();
    for codes in clauses {
      let lits: Vec<Literal> = codes.iter().map(| &code | Literal::from_dimacs(code)).collect();
      formula.add_clause(&lits).unwrap();
    }
    formula.finish();
    let graph = NeighborGraph::build(&formula);
    (formula, graph)
  }

  #[test]
  fn update_bumps_unsat_weights_and_scores() {
    let (formula, _) = build(2, &[&[1, 2]]);
    let config = SearchConfig::default();
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[false, false]);

    assert_eq!(state.score[1], 1);
    state.update_clause_weights(&formula, &config);

    assert_eq!(state.clause_weight[0], 2);
    assert_eq!(state.score[1], 2);
    assert_eq!(state.score[2], 2);
    // One clause, one unsat: the average advances immediately.
    assert_eq!(state.ave_weight, 2);
    assert_eq!(state.delta_total_weight, 0);
    state.check_invariants(&formula);
  }

  #[test]
  fn update_readmits_eligible_variables_to_the_goodvar_stack() {
    let (formula, _) = build(2, &[&[1, 2]]);
    let config = SearchConfig::default();
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[false, false]);

    state.goodvar_stack.remove(1);
    state.goodvar_stack.remove(2);
    state.conf_change[2] = false;

    state.update_clause_weights(&formula, &config);
    assert!(state.goodvar_stack.contains(1));
    // No configuration change, no readmission.
    assert!(!state.goodvar_stack.contains(2));
  }

  #[test]
  fn smoothing_keeps_scores_consistent_and_floors_weights() {
    let (formula, graph) = build(3, &[&[1, 2], &[-1, 3], &[-2, -3], &[1, 3]]);
    let mut config = SearchConfig::default();
    config.swt_threshold = 2;
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[false, false, false]);

    // Grind weights upward until the threshold forces at least one smoothing pass.
    // Weights only ever grow outside the smoother, so a drop proves it ran.
    let mut smoothed = false;
    for round in 0..64u64 {
      if state.unsat_stack.is_empty() {
        break;
      }
      let weights_before = state.clause_weight.clone();
      state.update_clause_weights(&formula, &config);
      if (0..formula.num_clauses()).any(| c | state.clause_weight[c] < weights_before[c]) {
        smoothed = true;
      }
      let v = round as usize % 3 + 1;
      state.flip(&formula, &graph, v);
      state.check_invariants(&formula);
    }

    assert!(smoothed, "the weight average never triggered a smoothing pass");
    for c in 0..formula.num_clauses() {
      assert!(state.clause_weight[c] >= 1);
    }
  }

  #[test]
  fn smoothing_matches_a_from_scratch_score_recomputation() {
    let (formula, _) = build(3, &[&[1, 2], &[-1, 3], &[2, 3], &[-2, -3]]);
    let config = SearchConfig::default();
    let mut state = SearchState::new(&formula);
    state.init(&formula, &[true, false, false]);

    // Inflate some weights asymmetrically, then smooth.
    state.clause_weight[0] = 9;
    state.clause_weight[2] = 4;
    state.update_clause_weights(&formula, &config);
    state.smooth_clause_weights(&formula, &config);

    // check_invariants recomputes scores from the clause set; agreement means the
    // single-pass recomputation in the smoother is exact.
    state.check_invariants(&formula);
  }
}
