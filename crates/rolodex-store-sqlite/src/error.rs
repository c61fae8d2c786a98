//! Error type for `rolodex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A UNIQUE or FOREIGN KEY constraint fired. `field` names the offending
  /// payload field the way callers know it.
  #[error("constraint violated on field {field}")]
  Constraint { field: &'static str },

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<Error> for rolodex_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Constraint { field } => {
        rolodex_core::Error::ConstraintViolation { field }
      }
      other => rolodex_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
