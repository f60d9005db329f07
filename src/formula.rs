/*!

  Dual-indexed CNF storage. Every clause keeps the ordered list of its literals, and every
  variable keeps the list of its occurrences across all clauses; both lists are terminated
  by a sentinel entry. The two indices describe the same multiset of literals and are kept
  consistent through unit propagation; once the search starts the store is read-only.

*/

use crate::{
  BoolVariable,
  ClauseId,
  Error,
  Literal,
  MAX_CLAUSES,
  MAX_VARS,
  NULL_BOOL_VAR,
  NULL_CLAUSE,
};


/// One occurrence of a variable in a clause. The variable is true under this occurrence
/// iff its current value equals `sense`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Lit {
  pub clause_num: ClauseId,
  pub var_num   : BoolVariable,
  pub sense     : bool, // true for positive literals, false for negated ones
}

impl Lit {
  pub(crate) const SENTINEL: Lit = Lit {
    clause_num: NULL_CLAUSE,
    var_num   : NULL_BOOL_VAR,
    sense     : false,
  };

  pub fn is_sentinel(&self) -> bool {
    self.var_num == NULL_BOOL_VAR
  }
}


pub struct Formula {
  num_vars: usize,

  pub(crate) clause_lit      : Vec<Vec<Lit>>,  // clause_lit[c][j] is the j'th literal of clause c
  pub(crate) clause_lit_count: Vec<usize>,
  pub(crate) var_lit         : Vec<Vec<Lit>>,  // var_lit[v][j] is the j'th occurrence of variable v
  pub(crate) var_lit_count   : Vec<usize>,

  pub(crate) clause_delete: Vec<bool>,
  pub(crate) fix          : Vec<bool>,
  pub(crate) fixed_value  : Vec<bool>,         // meaningful only where fix[v] holds

  // The untouched clause set, snapshotted before unit propagation mutates the working one.
  pub(crate) org_clause_lit      : Vec<Vec<Lit>>,
  pub(crate) org_clause_lit_count: Vec<usize>,
  simplified: bool,

  pub(crate) unit_queue: Vec<Lit>,             // FIFO; propagation appends while draining

  formula_len   : usize,
  max_clause_len: usize,
  min_clause_len: usize,

  finished: bool,
}

impl Formula {
  pub fn new(num_vars: usize, num_clauses_hint: usize) -> Result<Formula, Error> {
    if num_vars >= MAX_VARS || num_clauses_hint >= MAX_CLAUSES {
      return Err(Error::InstanceTooLarge { vars: num_vars, clauses: num_clauses_hint });
    }

    Ok(Formula {
      num_vars,
      clause_lit          : Vec::with_capacity(num_clauses_hint),
      clause_lit_count    : Vec::with_capacity(num_clauses_hint),
      var_lit             : vec![Vec::new(); num_vars + 1],
      var_lit_count       : vec![0; num_vars + 1],
      clause_delete       : Vec::with_capacity(num_clauses_hint),
      fix                 : vec![false; num_vars + 1],
      fixed_value         : vec![false; num_vars + 1],
      org_clause_lit      : Vec::new(),
      org_clause_lit_count: Vec::new(),
      simplified          : false,
      unit_queue          : Vec::new(),
      formula_len         : 0,
      max_clause_len      : 0,
      min_clause_len      : num_vars,
      finished            : false,
    })
  }

  /// Adds one clause. Unit clauses are queued for propagation and marked deleted right
  /// away. Tautology and duplicate handling is the caller's responsibility.
  pub fn add_clause(&mut self, literals: &[Literal]) -> Result<ClauseId, Error> {
    debug_assert!(!self.finished);

    let c = self.clause_lit.len();
    if c + 1 >= MAX_CLAUSES {
      return Err(Error::InstanceTooLarge { vars: self.num_vars, clauses: c + 1 });
    }
    if literals.is_empty() {
      return Err(Error::EmptyClause(c));
    }

    let mut lits = Vec::with_capacity(literals.len() + 1);
    for literal in literals {
      let v = literal.var();
      if v == NULL_BOOL_VAR || v > self.num_vars {
        return Err(Error::LiteralOutOfRange { clause: c, var: v, num_vars: self.num_vars });
      }
      lits.push(Lit { clause_num: c, var_num: v, sense: !literal.sign() });
    }

    let count = lits.len();
    lits.push(Lit::SENTINEL);

    self.clause_lit.push(lits);
    self.clause_lit_count.push(count);
    self.clause_delete.push(false);

    if count == 1 {
      let unit = self.clause_lit[c][0];
      self.unit_queue.push(unit);
      self.clause_delete[c] = true;
    }

    self.formula_len += count;
    if count > self.max_clause_len {
      self.max_clause_len = count;
    } else if count < self.min_clause_len {
      self.min_clause_len = count;
    }

    Ok(c)
  }

  /// Closes ingestion: snapshots the original clause set if any unit clause was seen
  /// (the verifier must judge solutions against the unsimplified formula), then builds
  /// the per-variable occurrence lists.
  pub fn finish(&mut self) {
    if self.finished {
      return;
    }
    self.finished = true;

    if !self.unit_queue.is_empty() {
      self.simplified           = true;
      self.org_clause_lit       = self.clause_lit.clone();
      self.org_clause_lit_count = self.clause_lit_count.clone();
    }

    self.build_var_lits();
  }

  /// Rebuilds `var_lit` from the surviving clauses. Every list gets its sentinel back.
  pub(crate) fn build_var_lits(&mut self) {
    for v in 1..=self.num_vars {
      self.var_lit[v].clear();
    }

    for c in 0..self.clause_lit.len() {
      if self.clause_delete[c] {
        continue;
      }
      for i in 0..self.clause_lit_count[c] {
        let lit = self.clause_lit[c][i];
        self.var_lit[lit.var_num].push(lit);
      }
    }

    for v in 1..=self.num_vars {
      self.var_lit_count[v] = self.var_lit[v].len();
      self.var_lit[v].push(Lit::SENTINEL);
    }
  }

  /// Recomputes formula length and clause-length extremes over the surviving clauses.
  pub(crate) fn recount_clause_stats(&mut self) {
    self.formula_len    = 0;
    self.max_clause_len = 0;
    self.min_clause_len = self.num_vars;

    for c in 0..self.clause_lit.len() {
      if self.clause_delete[c] {
        continue;
      }
      let count = self.clause_lit_count[c];
      self.formula_len += count;
      if count > self.max_clause_len {
        self.max_clause_len = count;
      } else if count < self.min_clause_len {
        self.min_clause_len = count;
      }
    }
  }

  // region Read-only views

  pub fn num_vars(&self) -> usize {
    self.num_vars
  }

  pub fn num_clauses(&self) -> usize {
    self.clause_lit.len()
  }

  /// The literals of clause `c`, sentinel excluded.
  pub fn clause_lits(&self, c: ClauseId) -> &[Lit] {
    &self.clause_lit[c][..self.clause_lit_count[c]]
  }

  /// The literals of clause `c` as ingested, before unit propagation touched it.
  pub fn org_clause_lits(&self, c: ClauseId) -> &[Lit] {
    if self.simplified {
      &self.org_clause_lit[c][..self.org_clause_lit_count[c]]
    } else {
      self.clause_lits(c)
    }
  }

  /// The occurrences of variable `v`, sentinel excluded.
  pub fn var_lits(&self, v: BoolVariable) -> &[Lit] {
    &self.var_lit[v][..self.var_lit_count[v]]
  }

  pub fn is_deleted(&self, c: ClauseId) -> bool {
    self.clause_delete[c]
  }

  pub fn is_fixed(&self, v: BoolVariable) -> bool {
    self.fix[v]
  }

  pub fn is_simplified(&self) -> bool {
    self.simplified
  }

  pub(crate) fn has_units(&self) -> bool {
    !self.unit_queue.is_empty()
  }

  pub fn formula_len(&self) -> usize {
    self.formula_len
  }

  pub fn max_clause_len(&self) -> usize {
    self.max_clause_len
  }

  pub fn min_clause_len(&self) -> usize {
    self.min_clause_len
  }

  pub fn avg_clause_len(&self) -> f64 {
    self.formula_len as f64 / self.num_clauses() as f64
  }

  pub fn ratio(&self) -> f64 {
    self.num_clauses() as f64 / self.num_vars as f64
  }

  // endregion
}
