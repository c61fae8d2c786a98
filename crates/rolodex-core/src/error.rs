//! Error taxonomy for `rolodex-core`.
//!
//! Every failure an operation can produce is a variant here; nothing
//! propagates as an unhandled fault. Storage backends convert their own
//! error types into this enum at the crate boundary.

use thiserror::Error;

use crate::entity::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  /// A field failed validation (bad format, bad length, duplicate value).
  #[error("{field}: {message}")]
  Validation { field: String, message: String },

  /// A required field was absent from the payload.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  /// The id does not resolve to a visible record.
  #[error("{kind} {id} not found")]
  NotFound { kind: EntityKind, id: i64 },

  /// Soft-delete was requested on a record already in the soft-deleted state.
  #[error("{kind} {id} is already deleted")]
  AlreadyDeleted { kind: EntityKind, id: i64 },

  /// Hard-delete found no row to remove.
  #[error("{kind} {id} does not exist")]
  NotExists { kind: EntityKind, id: i64 },

  /// A 1-indexed page number past the end of the result set.
  #[error("page {page} is out of range (last page is {pages})")]
  OutOfRange { page: u64, pages: u64 },

  /// A uniqueness or referential constraint fired inside the store.
  /// The lifecycle service rewords this into [`Error::Validation`] with a
  /// field-level message before it reaches a caller.
  #[error("constraint violated on field {field}")]
  ConstraintViolation { field: &'static str },

  /// Backend fault (I/O, corruption, codec). Terminal for the operation.
  #[error("storage error: {0}")]
  Storage(String),
}

impl Error {
  pub fn validation(
    field: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self::Validation { field: field.into(), message: message.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
