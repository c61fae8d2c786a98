//! The `EntityStore` trait and list filters.
//!
//! The trait is implemented by storage backends (e.g. `rolodex-store-sqlite`).
//! Higher layers (`rolodex-api`, the lifecycle service) depend on this
//! abstraction, not on any concrete backend.
//!
//! Uniqueness is the store's job: concurrent inserts racing on the same
//! unique key are resolved by the backend's atomic constraint check, and the
//! loser fails with a constraint error — never a silent overwrite.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::entity::{
  BookRecordUpdate, Contact, ContactBook, ContactRecordUpdate, NewBookRecord,
  NewContactRecord,
};

// ─── Filters ─────────────────────────────────────────────────────────────────

/// List filter for contact books. All conditions compose with logical AND.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
  /// Exact match on name, case-insensitive.
  pub name:            Option<String>,
  /// Substring match over `id` and `name`, case-insensitive.
  pub search:          Option<String>,
  /// Include soft-deleted rows. Off by default.
  pub include_deleted: bool,
}

/// List filter for contacts.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
  /// Exact match on name, case-insensitive.
  pub name:            Option<String>,
  /// Exact match on email, case-insensitive.
  pub email:           Option<String>,
  /// Substring match over `id` and `name`, case-insensitive.
  pub search:          Option<String>,
  /// Restrict to contacts owned by one book.
  pub contact_book_id: Option<i64>,
  /// Include soft-deleted rows. Off by default.
  pub include_deleted: bool,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over durable keyed storage for the two entity tables.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error
    + Into<crate::Error>
    + Send
    + Sync
    + 'static;

  // ── Contact books ─────────────────────────────────────────────────────

  /// Insert a book and return the stored record with its assigned id.
  /// Duplicate names fail with the backend's constraint error.
  fn insert_book(
    &self,
    record: NewBookRecord,
  ) -> impl Future<Output = Result<ContactBook, Self::Error>> + Send + '_;

  /// Fetch by id. Soft-deleted rows are invisible unless `include_deleted`.
  fn fetch_book(
    &self,
    id: i64,
    include_deleted: bool,
  ) -> impl Future<Output = Result<Option<ContactBook>, Self::Error>> + Send + '_;

  /// Write every mutable column and refresh `updated_on`. Targets the id
  /// regardless of deleted state. `None` when the id does not resolve.
  fn update_book(
    &self,
    id: i64,
    update: BookRecordUpdate,
  ) -> impl Future<Output = Result<Option<ContactBook>, Self::Error>> + Send + '_;

  /// Mark the book deleted and force every owned contact into the deleted
  /// state with the same timestamp, in one atomic unit. A concurrent reader
  /// never observes the book deleted while its contacts are still active,
  /// or vice versa. `None` when the id does not resolve.
  fn soft_delete_book(
    &self,
    id: i64,
    deleted_on: DateTime<Utc>,
    changed_by: Option<String>,
  ) -> impl Future<Output = Result<Option<ContactBook>, Self::Error>> + Send + '_;

  /// Physically remove the book and, via referential cascade, every owned
  /// contact. Returns whether a row was found.
  fn hard_delete_book(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// One window of the filtered result set, ordered id-descending.
  fn list_books(
    &self,
    filter: BookFilter,
    limit: u64,
    offset: u64,
  ) -> impl Future<Output = Result<Vec<ContactBook>, Self::Error>> + Send + '_;

  /// Total count of the filtered result set.
  fn count_books(
    &self,
    filter: BookFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Insert a contact. A duplicate `(contact_book, email)` pair or a
  /// reference to a missing book fails with the backend's constraint error.
  fn insert_contact(
    &self,
    record: NewContactRecord,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  fn fetch_contact(
    &self,
    id: i64,
    include_deleted: bool,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  fn update_contact(
    &self,
    id: i64,
    update: ContactRecordUpdate,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Mark a single contact deleted. No cascade.
  fn soft_delete_contact(
    &self,
    id: i64,
    deleted_on: DateTime<Utc>,
    changed_by: Option<String>,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  fn hard_delete_contact(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_contacts(
    &self,
    filter: ContactFilter,
    limit: u64,
    offset: u64,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  fn count_contacts(
    &self,
    filter: ContactFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
