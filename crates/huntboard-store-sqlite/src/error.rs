//! Error type for `huntboard-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No session exists. Checked before any database access; a sign-out
  /// between two calls fails the second call, never the first.
  #[error("authentication required")]
  AuthenticationRequired,

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("malformed row: {0}")]
  MalformedRow(String),

  /// Attempted to update an application that does not exist for this user.
  #[error("application not found: {0}")]
  ApplicationNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
