/*!

  String-keyed counters and gauges a solver component can deposit its run statistics into.
  Keys are kept sorted so repeated reports render in a stable order.

*/

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;


#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Statistic {
  Integer(u64),
  Float(f64),
}

impl From<u64> for Statistic {
  fn from(n: u64) -> Self {
    Statistic::Integer(n)
  }
}

impl From<usize> for Statistic {
  fn from(n: usize) -> Self {
    Statistic::Integer(n as u64)
  }
}

impl From<u32> for Statistic {
  fn from(n: u32) -> Self {
    Statistic::Integer(n as u64)
  }
}

impl From<f64> for Statistic {
  fn from(r: f64) -> Self {
    Statistic::Float(r)
  }
}

impl Display for Statistic {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Statistic::Integer(n) => write!(f, "{}", n),
      Statistic::Float(r)   => write!(f, "{}", r),
    }
  }
}


#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statistics {
  entries: BTreeMap<&'static str, Statistic>,
}

impl Statistics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn update<S: Into<Statistic>>(&mut self, key: &'static str, value: S) {
    self.entries.insert(key, value.into());
  }

  pub fn get(&self, key: &str) -> Option<Statistic> {
    self.entries.get(key).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, Statistic)> + '_ {
    self.entries.iter().map(| (k, v) | (*k, *v))
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl Display for Statistics {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let rendered = self.entries
                       .iter()
                       .map(| (key, value) | format!(":{} {}", key, value))
                       .join("\n");
    write!(f, "{}", rendered)
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn update_overwrites_and_get_reads_back() {
    let mut statistics = Statistics::new();
    statistics.update("flips", 10u64);
    statistics.update("flips", 11u64);
    assert_eq!(statistics.get("flips"), Some(Statistic::Integer(11)));
    assert_eq!(statistics.get("absent"), None);
  }

  #[test]
  fn display_is_sorted_by_key() {
    let mut statistics = Statistics::new();
    statistics.update("restarts", 2u64);
    statistics.update("flips", 40u64);
    assert_eq!(format!("{}", statistics), ":flips 40\n:restarts 2");
  }
}
