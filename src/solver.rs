/*!

  The search driver. It owns the formula, the neighbor graph, and the per-try search
  state; `run` seeds the generator and restarts configuration-checking local search until
  a verified model is found or the try budget runs out.

*/

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use itertools::Itertools;

use crate::{ClauseId, Error, Verdict};
use crate::data_structures::{RandomGenerator, Statistics};
use crate::formula::{Formula, Lit};
use crate::log::log_at_level;
use crate::model::Model;
use crate::neighbors::NeighborGraph;
use crate::resource_limit::ResourceLimit;
use crate::search::{SearchConfig, SearchState};


#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
struct SolverStatistics {
  count_of_flips   : u64,
  count_of_restarts: u64,
}


pub struct CcaSolver {
  formula  : Formula,
  neighbors: NeighborGraph,
  state    : SearchState,
  config   : SearchConfig,
  rng      : RandomGenerator,
  limit    : ResourceLimit,
  model    : Model,
  stats    : SolverStatistics,
}

impl CcaSolver {
  /// Takes over a fully ingested formula: closes it, runs unit propagation if any unit
  /// clause was seen, and builds the neighbor graph. After this the formula is frozen.
  pub fn new(mut formula: Formula, config: SearchConfig) -> CcaSolver {
    formula.finish();
    if formula.has_units() {
      formula.unit_propagate();
    }

    let neighbors = NeighborGraph::build(&formula);
    let state     = SearchState::new(&formula);

    CcaSolver {
      rng: RandomGenerator::with_seed(config.seed),
      formula,
      neighbors,
      state,
      config,
      limit: ResourceLimit::new(),
      model: Model::default(),
      stats: SolverStatistics::default(),
    }
  }

  /// Searches for a model starting from `seed_assignment` (one value per variable,
  /// variable `v` at slot `v - 1`). Values of variables fixed by propagation override
  /// the seed. Returns `Satisfiable` only for assignments that verify against the
  /// original clause set.
  pub fn run(&mut self, seed_assignment: &[bool], seed: u32) -> Result<Verdict, Error> {
    if seed_assignment.len() != self.formula.num_vars() {
      return Err(Error::SeedAssignmentLength {
        got     : seed_assignment.len(),
        expected: self.formula.num_vars(),
      });
    }

    self.rng.set_seed(seed);
    self.model.clear();
    self.log_banner(seed);

    for tries in 0..=self.config.max_tries {
      self.state.tries = tries;
      self.stats.count_of_restarts += 1;

      self.state.init(&self.formula, seed_assignment);
      self.local_search(self.config.ls_no_improv_steps);

      if self.state.unsat_stack.is_empty() {
        match self.verify() {
          Ok(()) => {
            self.model = Model::from_assignment(&self.state.cur_soln);
            log_at_level(1, &format!("(local-search {})", Verdict::Satisfiable));
            log_at_level(2, &format!("{}", self.model));
            return Ok(Verdict::Satisfiable);
          }
          Err(c) => {
            // A state-tracking bug, not a property of the instance; drop the try.
            log_at_level(0, &format!("solution failed verification on clause {}", c));
          }
        }
      }

      if self.limit.canceled() {
        break;
      }
    }

    log_at_level(1, &format!("(local-search {})", Verdict::Unknown));
    log_at_level(
      2,
      &format!("solveSteps = {} tries + {} steps", self.state.tries, self.state.step),
    );
    Ok(Verdict::Unknown)
  }

  /// One try: flips variables until the formula is satisfied, the stagnation budget is
  /// spent, or the resource limit trips. Improving on the try's best unsatisfied count
  /// refills the budget.
  fn local_search(&mut self, no_improv_budget: u64) {
    let mut notime = 1 + no_improv_budget;

    loop {
      notime -= 1;
      if notime == 0 {
        return;
      }

      if self.state.unsat_stack.is_empty() {
        return;
      }
      if !self.limit.inc() {
        return;
      }

      self.state.step += 1;

      let flipvar = self.state.pick_var(&self.formula, &self.config, &mut self.rng);
      self.state.flip(&self.formula, &self.neighbors, flipvar);
      self.stats.count_of_flips += 1;
      self.state.time_stamp[flipvar] = self.state.step;

      if self.state.unsat_stack.len() < self.state.best_unsat_this_try {
        self.state.best_unsat_this_try = self.state.unsat_stack.len();
        notime = 1 + no_improv_budget;
      }
    }
  }

  /// Checks the current assignment clause by clause. When unit propagation simplified
  /// the instance this judges the original clause set, not the shrunken working copy.
  fn verify(&self) -> Result<(), ClauseId> {
    for c in 0..self.formula.num_clauses() {
      let lits = self.formula.org_clause_lits(c);
      let satisfied = lits.iter().any(| lit | self.state.cur_soln[lit.var_num] == lit.sense);
      if !satisfied {
        self.report_failed_clause(c, lits);
        return Err(c);
      }
    }
    Ok(())
  }

  fn report_failed_clause(&self, c: ClauseId, lits: &[Lit]) {
    log_at_level(0, &format!("clause {} is not satisfied", c));
    if self.formula.is_deleted(c) {
      log_at_level(0, "this clause was deleted by unit propagation");
    }

    let rendered = lits
        .iter()
        .map(| lit | format!("{}{}", if lit.sense { "" } else { "-" }, lit.var_num))
        .join(" ");
    log_at_level(0, &rendered);

    let values = lits
        .iter()
        .map(| lit | format!("{}", self.state.cur_soln[lit.var_num] as u8))
        .join(" ");
    log_at_level(0, &values);
  }

  fn log_banner(&self, seed: u32) {
    log_at_level(2, &format!("Instance: Number of variables = {}", self.formula.num_vars()));
    log_at_level(2, &format!("Instance: Number of clauses = {}", self.formula.num_clauses()));
    log_at_level(2, &format!("Instance: Ratio = {}", self.formula.ratio()));
    log_at_level(2, &format!("Instance: Formula length = {}", self.formula.formula_len()));
    log_at_level(
      2,
      &format!(
        "Instance: Avg (Min,Max) clause length = {} ({},{})",
        self.formula.avg_clause_len(),
        self.formula.min_clause_len(),
        self.formula.max_clause_len()
      ),
    );
    log_at_level(2, &format!("Algorithmic: Random seed = {}", seed));
    log_at_level(2, &format!("Algorithmic: ls_no_improv_steps = {}", self.config.ls_no_improv_steps));
    log_at_level(2, &format!("Algorithmic: swt_p = {}", self.config.swt_p));
    log_at_level(2, &format!("Algorithmic: swt_q = {}", self.config.swt_q));
    log_at_level(2, &format!("Algorithmic: swt_threshold = {}", self.config.swt_threshold));
    log_at_level(2, &format!("Algorithmic: scale_ave = {}", self.config.scale_ave()));
    log_at_level(2, &format!("Algorithmic: max_flips = {}", self.config.max_flips));
    log_at_level(2, &format!("Algorithmic: aspiration_active = {}", self.config.aspiration));
  }

  // region Accessors

  pub fn formula(&self) -> &Formula {
    &self.formula
  }

  /// The model found by the last successful `run`; empty otherwise.
  pub fn model(&self) -> &Model {
    &self.model
  }

  pub fn config(&self) -> &SearchConfig {
    &self.config
  }

  pub fn config_mut(&mut self) -> &mut SearchConfig {
    &mut self.config
  }

  /// Caps the total number of flips across tries.
  pub fn set_step_limit(&mut self, limit: u64) {
    self.limit.set_limit(limit);
  }

  /// A flag another thread can raise to stop the search at the next flip boundary.
  pub fn cancel_handle(&self) -> Arc<AtomicBool> {
    self.limit.cancel_handle()
  }

  /// Recomputes every incrementally maintained quantity from the formula and panics on
  /// the first mismatch. Expensive; callable at any point between flips.
  #[cfg(feature = "debug")]
  pub fn assert_invariants(&self) {
    self.state.check_invariants(&self.formula);
  }

  pub fn collect_statistics(&self, statistics: &mut Statistics) {
    let fixed_vars = (1..=self.formula.num_vars())
        .filter(| &v | self.formula.is_fixed(v))
        .count();
    let deleted_clauses = (0..self.formula.num_clauses())
        .filter(| &c | self.formula.is_deleted(c))
        .count();

    statistics.update("local-search-flips", self.stats.count_of_flips);
    statistics.update("local-search-restarts", self.stats.count_of_restarts);
    statistics.update("local-search-steps", self.state.step);
    statistics.update("local-search-tries", self.state.tries);
    statistics.update("local-search-best-unsat", self.state.best_unsat_this_try);
    statistics.update("preprocess-fixed-vars", fixed_vars);
    statistics.update("preprocess-deleted-clauses", deleted_clauses);
  }

  // endregion
}
