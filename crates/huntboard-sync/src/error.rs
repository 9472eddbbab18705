//! Error type for `huntboard-sync`.
//!
//! Pure pass-through wrappers: the router never swallows or translates a
//! backend error, it only records which side produced it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("local store error: {0}")]
  Local(#[from] huntboard_store_local::Error),

  #[error("remote store error: {0}")]
  Remote(#[from] huntboard_store_sqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
