//! The lifecycle service: create, update, patch, soft-delete, hard-delete,
//! retrieve, and list for both resources.
//!
//! State machine per entity: Active (deleted=false) → SoftDeleted
//! (deleted=true, deleted_on set) → Purged (row removed, terminal).
//!
//! Every mutating operation takes the caller identity as an explicit
//! parameter and stamps it into `changed_by` (and `created_by` on create).
//! Store constraint errors are reworded here into field-level validation
//! errors before they reach a caller.

use chrono::Utc;

use crate::{
  Error, Result,
  entity::{
    BookPayload, BookRecordUpdate, CallerIdentity, Contact, ContactBook,
    ContactPayload, ContactRecordUpdate, EntityKind, NewBookRecord,
    NewContactRecord,
  },
  query::{Page, PageRequest},
  store::{BookFilter, ContactFilter, EntityStore},
  validate,
};

/// The lifecycle service over a storage backend.
///
/// Cloning is as cheap as cloning the backend handle.
#[derive(Clone)]
pub struct Lifecycle<S> {
  store: S,
}

impl<S: EntityStore> Lifecycle<S> {
  pub fn new(store: S) -> Self { Self { store } }

  // ── Contact books ─────────────────────────────────────────────────────

  pub async fn create_book(
    &self,
    payload: BookPayload,
    caller: &CallerIdentity,
  ) -> Result<ContactBook> {
    let name = payload.name.ok_or(Error::MissingField("name"))?;
    let record = NewBookRecord {
      name:       validate::name("name", &name)?,
      created_by: Some(caller.username.clone()),
      changed_by: Some(caller.username.clone()),
      deleted:    payload.deleted.unwrap_or(false),
      deleted_on: payload.deleted_on,
    };
    self
      .store
      .insert_book(record)
      .await
      .map_err(|e| book_write_error(e.into()))
  }

  pub async fn retrieve_book(&self, id: i64) -> Result<ContactBook> {
    self
      .store
      .fetch_book(id, false)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind: EntityKind::ContactBook, id })
  }

  /// Full replacement: `name` is mandatory, the optional lifecycle fields
  /// default when absent. Targets the id regardless of deleted state.
  pub async fn update_book(
    &self,
    id: i64,
    payload: BookPayload,
    caller: &CallerIdentity,
  ) -> Result<ContactBook> {
    let name = payload.name.ok_or(Error::MissingField("name"))?;
    let update = BookRecordUpdate {
      name:       validate::name("name", &name)?,
      changed_by: Some(caller.username.clone()),
      deleted:    payload.deleted.unwrap_or(false),
      deleted_on: payload.deleted_on,
    };
    self
      .store
      .update_book(id, update)
      .await
      .map_err(|e| book_write_error(e.into()))?
      .ok_or(Error::NotFound { kind: EntityKind::ContactBook, id })
  }

  /// Sparse patch: only supplied fields are validated and applied.
  pub async fn patch_book(
    &self,
    id: i64,
    payload: BookPayload,
    caller: &CallerIdentity,
  ) -> Result<ContactBook> {
    let current = self
      .store
      .fetch_book(id, true)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind: EntityKind::ContactBook, id })?;

    let name = match payload.name {
      Some(raw) => validate::name("name", &raw)?,
      None => current.name,
    };
    let update = BookRecordUpdate {
      name,
      changed_by: Some(caller.username.clone()),
      deleted: payload.deleted.unwrap_or(current.deleted),
      deleted_on: payload.deleted_on.or(current.deleted_on),
    };
    self
      .store
      .update_book(id, update)
      .await
      .map_err(|e| book_write_error(e.into()))?
      .ok_or(Error::NotFound { kind: EntityKind::ContactBook, id })
  }

  /// Active → SoftDeleted, cascading to every owned contact in one atomic
  /// unit. Fails with `AlreadyDeleted` when the book is already soft-deleted.
  pub async fn soft_delete_book(
    &self,
    id: i64,
    caller: &CallerIdentity,
  ) -> Result<ContactBook> {
    let kind = EntityKind::ContactBook;
    let current = self
      .store
      .fetch_book(id, true)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind, id })?;
    if current.deleted {
      return Err(Error::AlreadyDeleted { kind, id });
    }
    self
      .store
      .soft_delete_book(id, Utc::now(), Some(caller.username.clone()))
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind, id })
  }

  /// Any state → Purged. Owned contacts are physically removed with it.
  pub async fn hard_delete_book(&self, id: i64) -> Result<()> {
    let removed =
      self.store.hard_delete_book(id).await.map_err(Into::into)?;
    if !removed {
      return Err(Error::NotExists { kind: EntityKind::ContactBook, id });
    }
    Ok(())
  }

  pub async fn list_books(
    &self,
    filter: BookFilter,
    request: PageRequest,
  ) -> Result<Page<ContactBook>> {
    let total =
      self.store.count_books(filter.clone()).await.map_err(Into::into)?;
    request.check_bounds(total)?;
    let items = self
      .store
      .list_books(filter, request.size, request.offset())
      .await
      .map_err(Into::into)?;
    Ok(Page { items, total, page: request.page, size: request.size })
  }

  // ── Contacts ──────────────────────────────────────────────────────────

  pub async fn create_contact(
    &self,
    payload: ContactPayload,
    caller: &CallerIdentity,
  ) -> Result<Contact> {
    let name = payload.name.ok_or(Error::MissingField("name"))?;
    let email = payload.email.ok_or(Error::MissingField("email"))?;
    let contact_book_id = payload
      .contact_book_id
      .ok_or(Error::MissingField("contact_book"))?;
    let record = NewContactRecord {
      name: validate::name("name", &name)?,
      email: validate::email(&email)?,
      contact_book_id,
      created_by: Some(caller.username.clone()),
      changed_by: Some(caller.username.clone()),
      deleted: payload.deleted.unwrap_or(false),
      deleted_on: payload.deleted_on,
    };
    self
      .store
      .insert_contact(record)
      .await
      .map_err(|e| contact_write_error(e.into()))
  }

  pub async fn retrieve_contact(&self, id: i64) -> Result<Contact> {
    self
      .store
      .fetch_contact(id, false)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind: EntityKind::Contact, id })
  }

  pub async fn update_contact(
    &self,
    id: i64,
    payload: ContactPayload,
    caller: &CallerIdentity,
  ) -> Result<Contact> {
    let name = payload.name.ok_or(Error::MissingField("name"))?;
    let email = payload.email.ok_or(Error::MissingField("email"))?;
    let contact_book_id = payload
      .contact_book_id
      .ok_or(Error::MissingField("contact_book"))?;
    let update = ContactRecordUpdate {
      name: validate::name("name", &name)?,
      email: validate::email(&email)?,
      contact_book_id,
      changed_by: Some(caller.username.clone()),
      deleted: payload.deleted.unwrap_or(false),
      deleted_on: payload.deleted_on,
    };
    self
      .store
      .update_contact(id, update)
      .await
      .map_err(|e| contact_write_error(e.into()))?
      .ok_or(Error::NotFound { kind: EntityKind::Contact, id })
  }

  pub async fn patch_contact(
    &self,
    id: i64,
    payload: ContactPayload,
    caller: &CallerIdentity,
  ) -> Result<Contact> {
    let current = self
      .store
      .fetch_contact(id, true)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind: EntityKind::Contact, id })?;

    let name = match payload.name {
      Some(raw) => validate::name("name", &raw)?,
      None => current.name,
    };
    let email = match payload.email {
      Some(raw) => validate::email(&raw)?,
      None => current.email,
    };
    let update = ContactRecordUpdate {
      name,
      email,
      contact_book_id: payload
        .contact_book_id
        .unwrap_or(current.contact_book_id),
      changed_by: Some(caller.username.clone()),
      deleted: payload.deleted.unwrap_or(current.deleted),
      deleted_on: payload.deleted_on.or(current.deleted_on),
    };
    self
      .store
      .update_contact(id, update)
      .await
      .map_err(|e| contact_write_error(e.into()))?
      .ok_or(Error::NotFound { kind: EntityKind::Contact, id })
  }

  /// Soft-delete a single contact, independent of its book's deleted flag.
  pub async fn soft_delete_contact(
    &self,
    id: i64,
    caller: &CallerIdentity,
  ) -> Result<Contact> {
    let kind = EntityKind::Contact;
    let current = self
      .store
      .fetch_contact(id, true)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind, id })?;
    if current.deleted {
      return Err(Error::AlreadyDeleted { kind, id });
    }
    self
      .store
      .soft_delete_contact(id, Utc::now(), Some(caller.username.clone()))
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind, id })
  }

  pub async fn hard_delete_contact(&self, id: i64) -> Result<()> {
    let removed =
      self.store.hard_delete_contact(id).await.map_err(Into::into)?;
    if !removed {
      return Err(Error::NotExists { kind: EntityKind::Contact, id });
    }
    Ok(())
  }

  pub async fn list_contacts(
    &self,
    filter: ContactFilter,
    request: PageRequest,
  ) -> Result<Page<Contact>> {
    let total =
      self.store.count_contacts(filter.clone()).await.map_err(Into::into)?;
    request.check_bounds(total)?;
    let items = self
      .store
      .list_contacts(filter, request.size, request.offset())
      .await
      .map_err(Into::into)?;
    Ok(Page { items, total, page: request.page, size: request.size })
  }

  /// Contacts owned by one book. The book must exist (any deleted state);
  /// its soft-deleted contacts are subject to the filter's visibility rule
  /// like any other list.
  pub async fn list_book_contacts(
    &self,
    book_id: i64,
    mut filter: ContactFilter,
    request: PageRequest,
  ) -> Result<Page<Contact>> {
    self
      .store
      .fetch_book(book_id, true)
      .await
      .map_err(Into::into)?
      .ok_or(Error::NotFound { kind: EntityKind::ContactBook, id: book_id })?;
    filter.contact_book_id = Some(book_id);
    self.list_contacts(filter, request).await
  }
}

// ─── Constraint rewording ────────────────────────────────────────────────────

fn book_write_error(err: Error) -> Error {
  match err {
    Error::ConstraintViolation { field: "name" } => Error::validation(
      "name",
      "contact book with this name already exists.",
    ),
    other => other,
  }
}

fn contact_write_error(err: Error) -> Error {
  match err {
    Error::ConstraintViolation { field: "email" } => Error::validation(
      "email",
      "the fields contact_book, email must make a unique set.",
    ),
    Error::ConstraintViolation { field: "contact_book" } => {
      Error::validation("contact_book", "contact book does not exist.")
    }
    other => other,
  }
}
