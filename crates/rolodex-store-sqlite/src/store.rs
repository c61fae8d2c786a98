//! [`SqliteStore`] — the SQLite implementation of [`EntityStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use rolodex_core::{
  entity::{
    BookRecordUpdate, Contact, ContactBook, ContactRecordUpdate,
    NewBookRecord, NewContactRecord,
  },
  store::{BookFilter, ContactFilter, EntityStore},
};

use crate::{
  Error, Result,
  encode::{RawBook, RawContact, encode_dt},
  schema::SCHEMA,
};

// ─── SQL fragments ───────────────────────────────────────────────────────────

const BOOK_COLS: &str = "id, name, created_by, changed_by, created_on, \
                         updated_on, deleted, deleted_on";

// NULL-guarded conditions keep one prepared shape for every filter
// combination; an unset filter collapses its clause to TRUE.
const BOOK_WHERE: &str = "(?1 IS NULL OR name = ?1 COLLATE NOCASE) \
   AND (?2 IS NULL OR CAST(id AS TEXT) LIKE ?2 OR name LIKE ?2) \
   AND (?3 OR deleted = 0)";

const CONTACT_COLS: &str = "id, name, email, contact_book_id, created_by, \
                            changed_by, created_on, updated_on, deleted, \
                            deleted_on";

const CONTACT_WHERE: &str = "(?1 IS NULL OR name = ?1 COLLATE NOCASE) \
   AND (?2 IS NULL OR email = ?2 COLLATE NOCASE) \
   AND (?3 IS NULL OR CAST(id AS TEXT) LIKE ?3 OR name LIKE ?3) \
   AND (?4 IS NULL OR contact_book_id = ?4) \
   AND (?5 OR deleted = 0)";

fn like_pattern(needle: &str) -> String { format!("%{needle}%") }

/// Map a write failure onto the offending payload field. Anything that is
/// not a recognised constraint stays a plain database error.
fn classify_write(err: tokio_rusqlite::Error) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    cause,
    Some(msg),
  )) = &err
    && cause.code == rusqlite::ErrorCode::ConstraintViolation
  {
    if msg.contains("contact_books.name") {
      return Error::Constraint { field: "name" };
    }
    if msg.contains("contacts.email") {
      return Error::Constraint { field: "email" };
    }
    if msg.contains("FOREIGN KEY") {
      return Error::Constraint { field: "contact_book" };
    }
  }
  Error::Database(err)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rolodex entity store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = Error;

  // ── Contact books ─────────────────────────────────────────────────────────

  async fn insert_book(&self, record: NewBookRecord) -> Result<ContactBook> {
    let now = Utc::now();
    let now_str        = encode_dt(now);
    let name           = record.name.clone();
    let created_by     = record.created_by.clone();
    let changed_by     = record.changed_by.clone();
    let deleted_on_str = record.deleted_on.map(encode_dt);
    let deleted        = record.deleted;

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contact_books (
             name, created_by, changed_by, created_on, updated_on,
             deleted, deleted_on
           ) VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6)",
          rusqlite::params![
            name,
            created_by,
            changed_by,
            now_str,
            deleted,
            deleted_on_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(classify_write)?;

    Ok(ContactBook {
      id,
      name:       record.name,
      created_by: record.created_by,
      changed_by: record.changed_by,
      created_on: now,
      updated_on: now,
      deleted:    record.deleted,
      deleted_on: record.deleted_on,
    })
  }

  async fn fetch_book(
    &self,
    id: i64,
    include_deleted: bool,
  ) -> Result<Option<ContactBook>> {
    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        let sql = if include_deleted {
          format!("SELECT {BOOK_COLS} FROM contact_books WHERE id = ?1")
        } else {
          format!(
            "SELECT {BOOK_COLS} FROM contact_books \
             WHERE id = ?1 AND deleted = 0"
          )
        };
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawBook::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn update_book(
    &self,
    id: i64,
    update: BookRecordUpdate,
  ) -> Result<Option<ContactBook>> {
    let now_str        = encode_dt(Utc::now());
    let deleted_on_str = update.deleted_on.map(encode_dt);

    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE contact_books
           SET name = ?1, changed_by = ?2, deleted = ?3, deleted_on = ?4,
               updated_on = ?5
           WHERE id = ?6",
          rusqlite::params![
            update.name,
            update.changed_by,
            update.deleted,
            deleted_on_str,
            now_str,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = conn.query_row(
          &format!("SELECT {BOOK_COLS} FROM contact_books WHERE id = ?1"),
          rusqlite::params![id],
          RawBook::from_row,
        )?;
        Ok(Some(raw))
      })
      .await
      .map_err(classify_write)?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn soft_delete_book(
    &self,
    id: i64,
    deleted_on: DateTime<Utc>,
    changed_by: Option<String>,
  ) -> Result<Option<ContactBook>> {
    let at_str = encode_dt(deleted_on);

    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        // One transaction covering the book row and all its contact rows:
        // readers see either no change or the full cascade.
        let tx = conn.transaction()?;
        let marked = tx.execute(
          "UPDATE contact_books
           SET deleted = 1, deleted_on = ?1, changed_by = ?2, updated_on = ?1
           WHERE id = ?3",
          rusqlite::params![at_str, changed_by, id],
        )?;
        if marked == 0 {
          return Ok(None);
        }
        // Unconditional overwrite: contacts already soft-deleted get the
        // book's timestamp too.
        tx.execute(
          "UPDATE contacts SET deleted = 1, deleted_on = ?1
           WHERE contact_book_id = ?2",
          rusqlite::params![at_str, id],
        )?;
        let raw = tx.query_row(
          &format!("SELECT {BOOK_COLS} FROM contact_books WHERE id = ?1"),
          rusqlite::params![id],
          RawBook::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn hard_delete_book(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        // Owned contacts go with it via ON DELETE CASCADE.
        Ok(conn.execute(
          "DELETE FROM contact_books WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn list_books(
    &self,
    filter: BookFilter,
    limit: u64,
    offset: u64,
  ) -> Result<Vec<ContactBook>> {
    let search = filter.search.as_deref().map(like_pattern);
    let raws: Vec<RawBook> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {BOOK_COLS} FROM contact_books WHERE {BOOK_WHERE}
           ORDER BY id DESC LIMIT ?4 OFFSET ?5"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              filter.name,
              search,
              filter.include_deleted,
              limit as i64,
              offset as i64,
            ],
            RawBook::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBook::into_book).collect()
  }

  async fn count_books(&self, filter: BookFilter) -> Result<u64> {
    let search = filter.search.as_deref().map(like_pattern);
    let total: i64 = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT COUNT(*) FROM contact_books WHERE {BOOK_WHERE}");
        Ok(conn.query_row(
          &sql,
          rusqlite::params![filter.name, search, filter.include_deleted],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(total as u64)
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn insert_contact(
    &self,
    record: NewContactRecord,
  ) -> Result<Contact> {
    let now = Utc::now();
    let now_str        = encode_dt(now);
    let name           = record.name.clone();
    let email          = record.email.clone();
    let created_by     = record.created_by.clone();
    let changed_by     = record.changed_by.clone();
    let deleted_on_str = record.deleted_on.map(encode_dt);
    let book_id        = record.contact_book_id;
    let deleted        = record.deleted;

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             name, email, contact_book_id, created_by, changed_by,
             created_on, updated_on, deleted, deleted_on
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?7, ?8)",
          rusqlite::params![
            name,
            email,
            book_id,
            created_by,
            changed_by,
            now_str,
            deleted,
            deleted_on_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(classify_write)?;

    Ok(Contact {
      id,
      name:            record.name,
      email:           record.email,
      contact_book_id: record.contact_book_id,
      created_by:      record.created_by,
      changed_by:      record.changed_by,
      created_on:      now,
      updated_on:      now,
      deleted:         record.deleted,
      deleted_on:      record.deleted_on,
    })
  }

  async fn fetch_contact(
    &self,
    id: i64,
    include_deleted: bool,
  ) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        let sql = if include_deleted {
          format!("SELECT {CONTACT_COLS} FROM contacts WHERE id = ?1")
        } else {
          format!(
            "SELECT {CONTACT_COLS} FROM contacts \
             WHERE id = ?1 AND deleted = 0"
          )
        };
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawContact::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn update_contact(
    &self,
    id: i64,
    update: ContactRecordUpdate,
  ) -> Result<Option<Contact>> {
    let now_str        = encode_dt(Utc::now());
    let deleted_on_str = update.deleted_on.map(encode_dt);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE contacts
           SET name = ?1, email = ?2, contact_book_id = ?3, changed_by = ?4,
               deleted = ?5, deleted_on = ?6, updated_on = ?7
           WHERE id = ?8",
          rusqlite::params![
            update.name,
            update.email,
            update.contact_book_id,
            update.changed_by,
            update.deleted,
            deleted_on_str,
            now_str,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = conn.query_row(
          &format!("SELECT {CONTACT_COLS} FROM contacts WHERE id = ?1"),
          rusqlite::params![id],
          RawContact::from_row,
        )?;
        Ok(Some(raw))
      })
      .await
      .map_err(classify_write)?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn soft_delete_contact(
    &self,
    id: i64,
    deleted_on: DateTime<Utc>,
    changed_by: Option<String>,
  ) -> Result<Option<Contact>> {
    let at_str = encode_dt(deleted_on);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        let marked = conn.execute(
          "UPDATE contacts
           SET deleted = 1, deleted_on = ?1, changed_by = ?2, updated_on = ?1
           WHERE id = ?3",
          rusqlite::params![at_str, changed_by, id],
        )?;
        if marked == 0 {
          return Ok(None);
        }
        let raw = conn.query_row(
          &format!("SELECT {CONTACT_COLS} FROM contacts WHERE id = ?1"),
          rusqlite::params![id],
          RawContact::from_row,
        )?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn hard_delete_contact(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contacts WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn list_contacts(
    &self,
    filter: ContactFilter,
    limit: u64,
    offset: u64,
  ) -> Result<Vec<Contact>> {
    let search = filter.search.as_deref().map(like_pattern);
    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CONTACT_COLS} FROM contacts WHERE {CONTACT_WHERE}
           ORDER BY id DESC LIMIT ?6 OFFSET ?7"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              filter.name,
              filter.email,
              search,
              filter.contact_book_id,
              filter.include_deleted,
              limit as i64,
              offset as i64,
            ],
            RawContact::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn count_contacts(&self, filter: ContactFilter) -> Result<u64> {
    let search = filter.search.as_deref().map(like_pattern);
    let total: i64 = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT COUNT(*) FROM contacts WHERE {CONTACT_WHERE}");
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            filter.name,
            filter.email,
            search,
            filter.contact_book_id,
            filter.include_deleted,
          ],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(total as u64)
  }
}
