//! Entity records, write payloads, and the caller identity.
//!
//! Records carry the full audit trail (who created/changed them and when)
//! plus the soft-delete flag pair. Payloads are what mutating requests
//! deserialise into: every field optional, with required-ness enforced by
//! the lifecycle service so that create/full-update/partial-update can share
//! one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── EntityKind ──────────────────────────────────────────────────────────────

/// Which of the two resources an error or lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  ContactBook,
  Contact,
}

impl std::fmt::Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::ContactBook => write!(f, "contact book"),
      Self::Contact => write!(f, "contact"),
    }
  }
}

// ─── Caller identity ─────────────────────────────────────────────────────────

/// The authenticated actor attributed to `created_by`/`changed_by`.
///
/// Resolved by the auth layer and passed explicitly into every mutating
/// lifecycle operation; the core never consults ambient state for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
  pub username: String,
}

impl CallerIdentity {
  pub fn new(username: impl Into<String>) -> Self {
    Self { username: username.into() }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A named collection owning zero or more contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactBook {
  pub id:         i64,
  pub name:       String,
  pub created_by: Option<String>,
  pub changed_by: Option<String>,
  pub created_on: DateTime<Utc>,
  pub updated_on: DateTime<Utc>,
  pub deleted:    bool,
  pub deleted_on: Option<DateTime<Utc>>,
}

/// A name/email entry owned by exactly one contact book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
  pub id:              i64,
  pub name:            String,
  pub email:           String,
  #[serde(rename = "contact_book")]
  pub contact_book_id: i64,
  pub created_by:      Option<String>,
  pub changed_by:      Option<String>,
  pub created_on:      DateTime<Utc>,
  pub updated_on:      DateTime<Utc>,
  pub deleted:         bool,
  pub deleted_on:      Option<DateTime<Utc>>,
}

// ─── Write payloads ──────────────────────────────────────────────────────────

/// Body accepted by contact-book create, full update, and partial update.
///
/// Audit fields are deliberately absent: `created_by`/`changed_by` are always
/// overwritten server-side from the caller identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPayload {
  pub name:       Option<String>,
  pub deleted:    Option<bool>,
  pub deleted_on: Option<DateTime<Utc>>,
}

/// Body accepted by contact create, full update, and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPayload {
  pub name:            Option<String>,
  pub email:           Option<String>,
  #[serde(rename = "contact_book")]
  pub contact_book_id: Option<i64>,
  pub deleted:         Option<bool>,
  pub deleted_on:      Option<DateTime<Utc>>,
}

// ─── Store-facing rows ───────────────────────────────────────────────────────

/// Input to [`crate::store::EntityStore::insert_book`].
/// `id`, `created_on`, and `updated_on` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewBookRecord {
  pub name:       String,
  pub created_by: Option<String>,
  pub changed_by: Option<String>,
  pub deleted:    bool,
  pub deleted_on: Option<DateTime<Utc>>,
}

/// Full mutable-column write for an existing contact book.
/// `created_by` is immutable after creation and has no slot here.
#[derive(Debug, Clone)]
pub struct BookRecordUpdate {
  pub name:       String,
  pub changed_by: Option<String>,
  pub deleted:    bool,
  pub deleted_on: Option<DateTime<Utc>>,
}

/// Input to [`crate::store::EntityStore::insert_contact`].
#[derive(Debug, Clone)]
pub struct NewContactRecord {
  pub name:            String,
  pub email:           String,
  pub contact_book_id: i64,
  pub created_by:      Option<String>,
  pub changed_by:      Option<String>,
  pub deleted:         bool,
  pub deleted_on:      Option<DateTime<Utc>>,
}

/// Full mutable-column write for an existing contact.
#[derive(Debug, Clone)]
pub struct ContactRecordUpdate {
  pub name:            String,
  pub email:           String,
  pub contact_book_id: i64,
  pub changed_by:      Option<String>,
  pub deleted:         bool,
  pub deleted_on:      Option<DateTime<Utc>>,
}
