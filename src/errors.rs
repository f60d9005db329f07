
use thiserror::Error as DeriveError;
use user_error::UFE;

#[derive(Clone, Eq, PartialEq, Debug, Hash, DeriveError)]
pub enum Error {
  #[error("The instance exceeds the static size limits ({vars} variables, {clauses} clauses).")]
  InstanceTooLarge { vars: usize, clauses: usize },

  #[error("Clause {clause} refers to variable {var}, but the instance declares only {num_vars} variables.")]
  LiteralOutOfRange { clause: usize, var: usize, num_vars: usize },

  #[error("Clause {0} is empty.")]
  EmptyClause(usize),

  #[error("The seed assignment has {got} entries, but the instance has {expected} variables.")]
  SeedAssignmentLength { got: usize, expected: usize },

  #[error("Configuration parameter `{0}` is not recognized.")]
  UnknownParameter(String),

  #[error("Configuration parameter `{0}` has the wrong type or an out-of-range value.")]
  BadParameterValue(String),

  #[error("Configuration must be a JSON object.")]
  MalformedParameters,
}

impl UFE for Error { /* User Facing Error - nothing to implement. */ }
