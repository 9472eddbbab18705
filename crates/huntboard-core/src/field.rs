//! Custom field definitions — the user-configurable schema.
//!
//! Fields drive both form rendering and aggregation semantics. Their ids are
//! the keys of every application's `data` map, so deleting a definition
//! orphans (but never destroys) the values written under it.

use serde::{Deserialize, Serialize};

// ─── FieldType ───────────────────────────────────────────────────────────────

/// The shape of a field's value. Fixed at creation in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
  Text,
  Textarea,
  Date,
  Select,
  Number,
  Checkbox,
}

// ─── FieldOption ─────────────────────────────────────────────────────────────

/// One choice of a `select` field. `value` is the stable key stored in
/// application data; `label` and `color` are presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
  pub value: String,
  pub label: String,
  /// Hex colour used for badges and chart legends.
  pub color: Option<String>,
}

impl FieldOption {
  pub fn new(value: &str, label: &str, color: &str) -> Self {
    Self {
      value: value.into(),
      label: label.into(),
      color: Some(color.into()),
    }
  }
}

// ─── CustomField ─────────────────────────────────────────────────────────────

/// A user-defined column/property on application records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
  /// Stable id, referenced as a key in every application's `data` map.
  pub id:            String,
  /// Display label; mutable.
  pub name:          String,
  pub field_type:    FieldType,
  /// Enforced at write time only, never retroactively.
  pub required:      bool,
  /// Display/report position; kept dense 1..N by [`renumber`].
  pub order:         u32,
  /// Display hint only; irrelevant to aggregation. Data persisted before
  /// this attribute existed deserialises with `true` (read-time migration).
  #[serde(default = "default_show_in_table")]
  pub show_in_table: bool,
  /// Present only when `field_type` is [`FieldType::Select`].
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options:       Option<Vec<FieldOption>>,
}

fn default_show_in_table() -> bool {
  true
}

/// Restore the dense `1..N` order invariant after any add, delete, or
/// reorder. Positions follow the slice order.
pub fn renumber(fields: &mut [CustomField]) {
  for (i, field) in fields.iter_mut().enumerate() {
    field.order = (i + 1) as u32;
  }
}

// ─── Field roles ─────────────────────────────────────────────────────────────

/// Semantic roles the statistics engine needs to locate in a user-defined
/// schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
  ApplicationDate,
  ResponseDate,
  Status,
}

impl FieldRole {
  /// Fixed id used by older default schemas; checked before the heuristic.
  fn legacy_id(self) -> &'static str {
    match self {
      Self::ApplicationDate => "applicationDate",
      Self::ResponseDate => "responseDate",
      Self::Status => "status",
    }
  }

  fn field_type(self) -> FieldType {
    match self {
      Self::ApplicationDate | Self::ResponseDate => FieldType::Date,
      Self::Status => FieldType::Select,
    }
  }

  /// Case-insensitive substring the field name must contain.
  fn name_fragment(self) -> &'static str {
    match self {
      Self::ApplicationDate => "application",
      Self::ResponseDate => "response",
      Self::Status => "status",
    }
  }
}

/// Locate the field playing `role` in a user-defined schema.
///
/// Legacy fixed ids win outright; otherwise the first field matching the
/// role's type plus a case-insensitive name fragment is picked. The heuristic
/// can mis-pick between similarly-named fields or find nothing at all, so
/// callers must treat `None` as "produce an empty/zero result". This function
/// is the single seam to replace if explicit per-role bindings are ever
/// added.
pub fn resolve_role(fields: &[CustomField], role: FieldRole) -> Option<&CustomField> {
  if let Some(field) = fields.iter().find(|f| f.id == role.legacy_id()) {
    return Some(field);
  }
  let fragment = role.name_fragment();
  fields
    .iter()
    .find(|f| f.field_type == role.field_type() && f.name.to_lowercase().contains(fragment))
}

// ─── Default schema ──────────────────────────────────────────────────────────

/// The built-in field set a fresh (or wiped) local store reports.
pub fn default_fields() -> Vec<CustomField> {
  vec![
    CustomField {
      id:            "companyName".into(),
      name:          "Company Name".into(),
      field_type:    FieldType::Text,
      required:      true,
      order:         1,
      show_in_table: true,
      options:       None,
    },
    CustomField {
      id:            "jobPosition".into(),
      name:          "Job Position".into(),
      field_type:    FieldType::Text,
      required:      true,
      order:         2,
      show_in_table: true,
      options:       None,
    },
    CustomField {
      id:            "jobDescription".into(),
      name:          "Job Description".into(),
      field_type:    FieldType::Textarea,
      required:      false,
      order:         3,
      // Long text; better viewed in a detail pane.
      show_in_table: false,
      options:       None,
    },
    CustomField {
      id:            "applicationDate".into(),
      name:          "Application Date".into(),
      field_type:    FieldType::Date,
      required:      true,
      order:         4,
      show_in_table: true,
      options:       None,
    },
    CustomField {
      id:            "status".into(),
      name:          "Status".into(),
      field_type:    FieldType::Select,
      required:      true,
      order:         5,
      show_in_table: true,
      options:       Some(vec![
        FieldOption::new("applied", "Applied", "#0070F3"),
        FieldOption::new("screening", "Screening", "#7928CA"),
        FieldOption::new("interview_scheduled", "Interview Scheduled", "#F5A623"),
        FieldOption::new("interview_completed", "Interview Completed", "#50E3C2"),
        FieldOption::new("offer_received", "Offer Received", "#00C853"),
        FieldOption::new("rejected", "Rejected", "#E00"),
        FieldOption::new("withdrawn", "Withdrawn", "#A3A3A3"),
      ]),
    },
    CustomField {
      id:            "responseDate".into(),
      name:          "First Response Date".into(),
      field_type:    FieldType::Date,
      required:      false,
      order:         6,
      show_in_table: true,
      options:       None,
    },
  ]
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn date_field(id: &str, name: &str, order: u32) -> CustomField {
    CustomField {
      id:            id.into(),
      name:          name.into(),
      field_type:    FieldType::Date,
      required:      false,
      order,
      show_in_table: true,
      options:       None,
    }
  }

  #[test]
  fn renumber_restores_dense_order() {
    let mut fields = vec![
      date_field("a", "A", 4),
      date_field("b", "B", 9),
      date_field("c", "C", 2),
    ];
    renumber(&mut fields);
    let orders: Vec<u32> = fields.iter().map(|f| f.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
  }

  #[test]
  fn legacy_id_wins_over_name_match() {
    let fields = vec![
      date_field("someOther", "Date of application", 1),
      date_field("applicationDate", "Submitted", 2),
    ];
    let found = resolve_role(&fields, FieldRole::ApplicationDate).unwrap();
    assert_eq!(found.id, "applicationDate");
  }

  #[test]
  fn falls_back_to_type_and_name_fragment() {
    let fields = vec![
      date_field("f1", "Date Applied", 1),
      date_field("f2", "First Response", 2),
    ];
    let found = resolve_role(&fields, FieldRole::ResponseDate).unwrap();
    assert_eq!(found.id, "f2");
  }

  #[test]
  fn no_candidate_resolves_to_none() {
    let fields = vec![date_field("f1", "Deadline", 1)];
    assert!(resolve_role(&fields, FieldRole::Status).is_none());
  }

  #[test]
  fn show_in_table_defaults_true_for_old_payloads() {
    let json = r#"{
      "id": "companyName",
      "name": "Company Name",
      "field_type": "text",
      "required": true,
      "order": 1
    }"#;
    let field: CustomField = serde_json::from_str(json).unwrap();
    assert!(field.show_in_table);
  }
}
