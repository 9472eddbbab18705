//! Dual-backend synchronization layer for Huntboard.
//!
//! [`SyncRouter`] dispatches every persistence operation to one of two
//! backends based on live authentication state: the remote SQLite store when
//! a session exists, the local file store otherwise. [`StateStore`] holds the
//! in-memory application state and is mutated only through [`Action`]s.

mod router;
mod state;

pub mod error;

pub use error::{Error, Result};
pub use router::{Mode, SyncRouter};
pub use state::{Action, Slice, SliceId, StateStore};

#[cfg(test)]
mod tests;
