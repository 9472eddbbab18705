//! Error type for `huntboard-store-local`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The configured byte capacity would be exceeded by this write. Surfaced
  /// to callers of the store trait as a `false` save result, never as a
  /// crash.
  #[error("storage capacity of {capacity} bytes exceeded (write needs {needed})")]
  QuotaExceeded { needed: u64, capacity: u64 },

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
