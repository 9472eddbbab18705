//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Application data and select
//! options are stored as compact JSON. User ids are stored as hyphenated
//! lowercase UUID strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use huntboard_core::{
  application::{Application, FieldValue, Note},
  field::{CustomField, FieldOption, FieldType},
  preference::Theme,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── FieldType ───────────────────────────────────────────────────────────────

pub fn encode_field_type(t: FieldType) -> &'static str {
  match t {
    FieldType::Text => "text",
    FieldType::Textarea => "textarea",
    FieldType::Date => "date",
    FieldType::Select => "select",
    FieldType::Number => "number",
    FieldType::Checkbox => "checkbox",
  }
}

pub fn decode_field_type(s: &str) -> Result<FieldType> {
  match s {
    "text" => Ok(FieldType::Text),
    "textarea" => Ok(FieldType::Textarea),
    "date" => Ok(FieldType::Date),
    "select" => Ok(FieldType::Select),
    "number" => Ok(FieldType::Number),
    "checkbox" => Ok(FieldType::Checkbox),
    other => Err(Error::MalformedRow(format!("unknown field type: {other:?}"))),
  }
}

// ─── Theme ───────────────────────────────────────────────────────────────────

pub fn encode_theme(t: Theme) -> &'static str {
  match t {
    Theme::Light => "light",
    Theme::Dark => "dark",
  }
}

pub fn decode_theme(s: &str) -> Result<Theme> {
  match s {
    "light" => Ok(Theme::Light),
    "dark" => Ok(Theme::Dark),
    other => Err(Error::MalformedRow(format!("unknown theme: {other:?}"))),
  }
}

// ─── Application data ────────────────────────────────────────────────────────

pub fn encode_data(data: &BTreeMap<String, FieldValue>) -> Result<String> {
  Ok(serde_json::to_string(data)?)
}

pub fn decode_data(s: &str) -> Result<BTreeMap<String, FieldValue>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Select options ──────────────────────────────────────────────────────────

pub fn encode_options(options: &[FieldOption]) -> Result<String> {
  Ok(serde_json::to_string(options)?)
}

pub fn decode_options(s: &str) -> Result<Vec<FieldOption>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `applications` row.
pub struct RawApplication {
  pub id:         String,
  pub data:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawApplication {
  pub fn into_application(self, notes: Vec<Note>) -> Result<Application> {
    Ok(Application {
      id: self.id,
      data: decode_data(&self.data)?,
      notes,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `notes` row.
pub struct RawNote {
  pub id:         String,
  pub content:    String,
  pub created_at: String,
  pub updated_at: Option<String>,
}

impl RawNote {
  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:         self.id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      updated_at: self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from a `custom_fields` row.
pub struct RawCustomField {
  pub id:            String,
  pub name:          String,
  pub field_type:    String,
  pub required:      bool,
  pub field_order:   u32,
  pub show_in_table: bool,
  pub options:       Option<String>,
}

impl RawCustomField {
  pub fn into_field(self) -> Result<CustomField> {
    Ok(CustomField {
      id:            self.id,
      name:          self.name,
      field_type:    decode_field_type(&self.field_type)?,
      required:      self.required,
      order:         self.field_order,
      show_in_table: self.show_in_table,
      options:       self.options.as_deref().map(decode_options).transpose()?,
    })
  }
}
