//! Application records — the central entity of the tracker.
//!
//! An application has no fixed schema: its `data` map is keyed by the ids of
//! whatever [`CustomField`](crate::field::CustomField) definitions existed
//! when each value was written. Deleting a field definition never deletes the
//! corresponding keys from existing records; the values become orphaned but
//! stay present.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// The closed sum of value shapes an application's `data` map can hold.
///
/// Untagged on the wire, so persisted payloads stay plain JSON scalars.
/// Variant order matters for deserialisation: an ISO `YYYY-MM-DD` string
/// becomes [`FieldValue::Date`]; any other string stays [`FieldValue::Text`].
/// Numbers entered through text inputs arrive as strings and are kept as
/// text; [`FieldValue::as_number`] parses them on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
  Bool(bool),
  Number(f64),
  Date(NaiveDate),
  Text(String),
}

impl FieldValue {
  /// `true` for the values aggregation treats as "no value": empty or
  /// whitespace-only text. Every other variant counts as present.
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Text(s) => s.trim().is_empty(),
      _ => false,
    }
  }

  /// Numeric view of the value. Text is parsed, since number fields filled
  /// through forms historically stored their values as strings.
  pub fn as_number(&self) -> Option<f64> {
    match self {
      Self::Number(n) => Some(*n),
      Self::Text(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
      _ => None,
    }
  }

  /// Calendar-date view of the value. Accepts the `Date` variant directly,
  /// ISO `YYYY-MM-DD` text, and full RFC 3339 timestamps.
  pub fn as_date(&self) -> Option<NaiveDate> {
    match self {
      Self::Date(d) => Some(*d),
      Self::Text(s) => parse_date(s),
      _ => None,
    }
  }

  /// Stable string key used when grouping by distinct value (pie breakdowns).
  pub fn as_key(&self) -> String {
    match self {
      Self::Bool(b) => b.to_string(),
      Self::Number(n) => format_number(*n),
      Self::Date(d) => d.format("%Y-%m-%d").to_string(),
      Self::Text(s) => s.clone(),
    }
  }
}

/// Parse a date out of persisted text: ISO date first, RFC 3339 second.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  if s.is_empty() {
    return None;
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Render a number without a trailing `.0` when it is integral.
pub fn format_number(n: f64) -> String {
  if n.fract() == 0.0 && n.abs() < 1e15 {
    format!("{}", n as i64)
  } else {
    format!("{n}")
  }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// A note attached to an application. Owned by its parent in the domain
/// model regardless of how a backend chooses to store it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
  pub id:         String,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  /// Set only once a note has been edited.
  pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
  pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      id:         id.into(),
      content:    content.into(),
      created_at: Utc::now(),
      updated_at: None,
    }
  }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// One job application. `id` is opaque, unique, and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
  pub id:         String,
  /// Dynamic payload keyed by custom-field id.
  pub data:       BTreeMap<String, FieldValue>,
  pub notes:      Vec<Note>,
  pub created_at: DateTime<Utc>,
  /// Refreshed on any mutation to `data` or `notes`.
  pub updated_at: DateTime<Utc>,
}

impl Application {
  /// A fresh record with empty data and notes, stamped with the current time.
  pub fn new(id: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      id:         id.into(),
      data:       BTreeMap::new(),
      notes:      Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  /// The value stored under `field_id`, if any.
  pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
    self.data.get(field_id)
  }

  /// Refresh `updated_at`; call after any mutation to `data` or `notes`.
  pub fn touch(&mut self) {
    self.updated_at = Utc::now();
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
