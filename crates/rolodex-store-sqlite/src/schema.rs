//! SQL schema for the Rolodex SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// AUTOINCREMENT keeps ids monotonic: a hard-deleted row's id is never
/// reissued to a later insert.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contact_books (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_by  TEXT,            -- NULL for system-created rows
    changed_by  TEXT,
    created_on  TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_on  TEXT NOT NULL,
    deleted     INTEGER NOT NULL DEFAULT 0,
    deleted_on  TEXT
);

CREATE TABLE IF NOT EXISTS contacts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    contact_book_id INTEGER NOT NULL
                    REFERENCES contact_books(id) ON DELETE CASCADE,
    created_by      TEXT,
    changed_by      TEXT,
    created_on      TEXT NOT NULL,
    updated_on      TEXT NOT NULL,
    deleted         INTEGER NOT NULL DEFAULT 0,
    deleted_on      TEXT,
    -- Same email may repeat across books, never within one.
    UNIQUE (contact_book_id, email)
);

CREATE INDEX IF NOT EXISTS contact_books_name_idx ON contact_books(name);
CREATE INDEX IF NOT EXISTS contacts_name_idx      ON contacts(name);
CREATE INDEX IF NOT EXISTS contacts_email_idx     ON contacts(email);
CREATE INDEX IF NOT EXISTS contacts_book_idx      ON contacts(contact_book_id);

PRAGMA user_version = 1;
";
