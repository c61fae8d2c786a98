//! SQLite backend for the Rolodex entity store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Uniqueness and referential integrity
//! are enforced by the database itself, which makes concurrent writers racing
//! on the same unique key resolve atomically at the constraint check.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
