//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings; booleans as INTEGER 0/1.

use chrono::{DateTime, Utc};
use rolodex_core::entity::{Contact, ContactBook};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `contact_books` row.
pub struct RawBook {
  pub id:         i64,
  pub name:       String,
  pub created_by: Option<String>,
  pub changed_by: Option<String>,
  pub created_on: String,
  pub updated_on: String,
  pub deleted:    bool,
  pub deleted_on: Option<String>,
}

impl RawBook {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      created_by: row.get(2)?,
      changed_by: row.get(3)?,
      created_on: row.get(4)?,
      updated_on: row.get(5)?,
      deleted:    row.get(6)?,
      deleted_on: row.get(7)?,
    })
  }

  pub fn into_book(self) -> Result<ContactBook> {
    Ok(ContactBook {
      id:         self.id,
      name:       self.name,
      created_by: self.created_by,
      changed_by: self.changed_by,
      created_on: decode_dt(&self.created_on)?,
      updated_on: decode_dt(&self.updated_on)?,
      deleted:    self.deleted,
      deleted_on: decode_opt_dt(self.deleted_on.as_deref())?,
    })
  }
}

/// Raw values read directly from a `contacts` row.
pub struct RawContact {
  pub id:              i64,
  pub name:            String,
  pub email:           String,
  pub contact_book_id: i64,
  pub created_by:      Option<String>,
  pub changed_by:      Option<String>,
  pub created_on:      String,
  pub updated_on:      String,
  pub deleted:         bool,
  pub deleted_on:      Option<String>,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      email:           row.get(2)?,
      contact_book_id: row.get(3)?,
      created_by:      row.get(4)?,
      changed_by:      row.get(5)?,
      created_on:      row.get(6)?,
      updated_on:      row.get(7)?,
      deleted:         row.get(8)?,
      deleted_on:      row.get(9)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:              self.id,
      name:            self.name,
      email:           self.email,
      contact_book_id: self.contact_book_id,
      created_by:      self.created_by,
      changed_by:      self.changed_by,
      created_on:      decode_dt(&self.created_on)?,
      updated_on:      decode_dt(&self.updated_on)?,
      deleted:         self.deleted,
      deleted_on:      decode_opt_dt(self.deleted_on.as_deref())?,
    })
  }
}
