//! Request handlers for the two resources.

pub mod books;
pub mod contacts;
