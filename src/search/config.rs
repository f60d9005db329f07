/*!

  Knobs governing the search: the restart and stagnation budgets, the smoothed
  clause-weighting scheme, and the aspiration tier. A configuration can also be patched
  from a JSON object, which is how embedding callers usually hand options over.

*/

use crate::errors::Error;


#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchConfig {
  /// Default RNG seed; `run` takes an explicit seed that overrides it.
  pub seed              : u32,
  /// Steps without improvement before a try gives up.
  pub ls_no_improv_steps: u64,
  /// Smoothing triggers once the average clause weight climbs past this.
  pub swt_threshold     : i64,
  /// Decay factor in `w <- w*p + ave*q`.
  pub swt_p             : f64,
  /// Floor factor in `w <- w*p + ave*q`.
  pub swt_q             : f64,
  /// Enables the aspiration tier of the variable picker.
  pub aspiration        : bool,
  /// Number of restarts beyond the first try.
  pub max_tries         : u64,
  /// Per-try flip cap. Stagnation drives termination; this is reported but not enforced.
  pub max_flips         : u64,

  weighting_tuned: bool,
}

impl SearchConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// The additive term of the smoothing formula, `(threshold+1)*q` truncated to integer.
  pub fn scale_ave(&self) -> i64 {
    ((self.swt_threshold + 1) as f64 * self.swt_q) as i64
  }

  /// Opt-in weighting tune for hard structured instances: raises the smoothing threshold
  /// to 300 and picks `q` from the clause/variable ratio on first use, toggling `q`
  /// between 0.7 and 0 on repeated calls.
  pub fn set_clause_weighting(&mut self, ratio: f64) {
    self.swt_threshold = 300;
    self.swt_p         = 0.3;

    if !self.weighting_tuned {
      self.swt_q = if ratio <= 15.0 { 0.0 } else { 0.7 };
    } else {
      self.swt_q = if self.swt_q < 0.5 { 0.7 } else { 0.0 };
    }

    self.weighting_tuned = true;
  }

  /// Patches fields from a JSON object such as `{"seed": 5, "aspiration": true}`.
  /// Unknown keys and ill-typed values are rejected.
  pub fn update_from_json(&mut self, source: &str) -> Result<(), Error> {
    let object = json::parse(source).map_err(| _ | Error::MalformedParameters)?;
    if !object.is_object() {
      return Err(Error::MalformedParameters);
    }

    for (key, value) in object.entries() {
      match key {
        "seed"               => self.seed = Self::require(key, value.as_u32())?,
        "ls_no_improv_steps" => self.ls_no_improv_steps = Self::require(key, value.as_u64())?,
        "swt_threshold"      => self.swt_threshold = Self::require(key, value.as_i64())?,
        "swt_p"              => self.swt_p = Self::require(key, value.as_f64())?,
        "swt_q"              => self.swt_q = Self::require(key, value.as_f64())?,
        "aspiration"         => self.aspiration = Self::require(key, value.as_bool())?,
        "max_tries"          => self.max_tries = Self::require(key, value.as_u64())?,
        "max_flips"          => self.max_flips = Self::require(key, value.as_u64())?,
        _other               => return Err(Error::UnknownParameter(key.to_owned())),
      }
    }

    Ok(())
  }

  fn require<T>(key: &str, value: Option<T>) -> Result<T, Error> {
    value.ok_or_else(| | Error::BadParameterValue(key.to_owned()))
  }
}

impl Default for SearchConfig {
  fn default() -> Self {
    SearchConfig {
      seed              : 1,
      ls_no_improv_steps: 200_000,
      swt_threshold     : 50,
      swt_p             : 0.3,
      swt_q             : 0.7,
      aspiration        : false,
      max_tries         : 0,
      max_flips         : 2_000_000_000,
      weighting_tuned   : false,
    }
  }
}
