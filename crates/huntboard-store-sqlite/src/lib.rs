//! SQLite backend for the Huntboard tracker store — the "remote",
//! authenticated, multi-user side of the sync layer.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every row is scoped to a user id, and
//! every operation re-checks the session before touching the database.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
