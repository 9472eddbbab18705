//! Error types for `huntboard-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("chart {0:?} has no series")]
  ChartWithoutSeries(String),

  #[error("chart {0:?} has {1} series; the maximum is 4")]
  TooManySeries(String, usize),

  #[error("series {0:?} reads a custom field but names none")]
  UnboundSeries(String),

  #[error("card {0:?} aggregates a custom field but names none")]
  UnboundCard(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
