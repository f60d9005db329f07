/*!

  The three-tier variable-selection policy. Greedy mode flips the best
  configuration-changed decreasing variable; failing that, the aspiration tier may accept
  a variable whose score beats the average clause weight; otherwise the picker updates
  clause weights and walks into a random unsatisfied clause.

*/

use crate::{BoolVariable, NULL_BOOL_VAR};
use crate::data_structures::RandomGenerator;
use crate::formula::Formula;
use super::config::SearchConfig;
use super::state::SearchState;


impl SearchState {
  /// Picks the next variable to flip. Requires at least one unsatisfied clause.
  pub(crate) fn pick_var(
    &mut self,
    formula: &Formula,
    config: &SearchConfig,
    rng: &mut RandomGenerator,
  ) -> BoolVariable {
    debug_assert!(!self.unsat_stack.is_empty());

    // Greedy mode: best configuration-changed decreasing variable, oldest flip wins ties.
    if !self.goodvar_stack.is_empty() {
      let mut best_var = self.goodvar_stack.get(0);
      for i in 1..self.goodvar_stack.len() {
        let v = self.goodvar_stack.get(i);
        if self.score[v] > self.score[best_var] {
          best_var = v;
        } else if self.score[v] == self.score[best_var]
            && self.time_stamp[v] < self.time_stamp[best_var] {
          best_var = v;
        }
      }
      return best_var;
    }

    // Aspiration: a significantly decreasing variable may be flipped even though its
    // configuration has not changed.
    if config.aspiration {
      let mut best_var = NULL_BOOL_VAR;
      let stack_len = self.unsatvar_stack.len();
      let mut i = 0;

      while i < stack_len {
        let v = self.unsatvar_stack.get(i);
        if self.score[v] > self.ave_weight {
          best_var = v;
          break;
        }
        i += 1;
      }

      i += 1;
      while i < stack_len {
        let v = self.unsatvar_stack.get(i);
        if self.score[v] > self.score[best_var] {
          best_var = v;
        } else if self.score[v] == self.score[best_var]
            && self.time_stamp[v] < self.time_stamp[best_var] {
          best_var = v;
        }
        i += 1;
      }

      if best_var != NULL_BOOL_VAR {
        return best_var;
      }
    }

    // Diversification: reweight, then walk into a random unsatisfied clause and take its
    // most promising variable.
    self.update_clause_weights(formula, config);

    let c = self.unsat_stack.get(rng.below(self.unsat_stack.len()));
    let lits = formula.clause_lits(c);

    let mut best_var = lits[0].var_num;
    for lit in &lits[1..] {
      let v = lit.var_num;
      if self.unsat_app_count[v] > self.unsat_app_count[best_var] {
        best_var = v;
      } else if self.unsat_app_count[v] == self.unsat_app_count[best_var] {
        if self.score[v] > self.score[best_var] {
          best_var = v;
        } else if self.score[v] == self.score[best_var]
            && self.time_stamp[v] < self.time_stamp[best_var] {
          best_var = v;
        }
      }
    }

    best_var
  }
}
