//! Local (single-device, unauthenticated "demo") backend for Huntboard.
//!
//! A synchronous key-value store: one JSON file per fixed key under a data
//! directory. Reads never fail at the API surface — missing or malformed
//! data yields the documented default. Writes can be capped by an optional
//! byte capacity standing in for a storage quota.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::LocalStore;
