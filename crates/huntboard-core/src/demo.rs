//! Built-in demo data offered to first-time users.
//!
//! Fixed ids and timestamps, so seeding the same backend twice is
//! idempotent under bulk-replace semantics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
  application::{Application, FieldValue, Note},
  chart::{
    ChartConfig, ChartConfigSet, OverviewCardConfig, default_chart_configs,
    default_overview_cards,
  },
  field::{CustomField, default_fields},
  preference::UserPreference,
};

fn ts(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s)
    .expect("demo timestamps are well-formed")
    .with_timezone(&Utc)
}

fn demo_app(
  id: &str,
  company: &str,
  position: &str,
  description: &str,
  applied: &str,
  status: &str,
  responded: &str,
  notes: Vec<Note>,
) -> Application {
  let mut data = BTreeMap::new();
  data.insert("companyName".into(), FieldValue::Text(company.into()));
  data.insert("jobPosition".into(), FieldValue::Text(position.into()));
  data.insert("jobDescription".into(), FieldValue::Text(description.into()));
  data.insert("applicationDate".into(), FieldValue::Text(applied.into()));
  data.insert("status".into(), FieldValue::Text(status.into()));
  data.insert("responseDate".into(), FieldValue::Text(responded.into()));

  let created_at = ts(&format!("{applied}T09:00:00Z"));
  Application {
    id: id.into(),
    data,
    notes,
    created_at,
    updated_at: created_at,
  }
}

/// Sample applications covering the common status mix: some unanswered, one
/// interview pipeline, one offer, one rejection.
pub fn demo_applications() -> Vec<Application> {
  vec![
    demo_app(
      "demo-app-1",
      "Google",
      "Senior Software Engineer",
      "Distributed storage team; strong systems focus.",
      "2025-10-26",
      "applied",
      "",
      Vec::new(),
    ),
    demo_app(
      "demo-app-2",
      "Meta",
      "Frontend Developer",
      "Build scalable systems that impact millions of users.",
      "2025-10-27",
      "applied",
      "",
      Vec::new(),
    ),
    demo_app(
      "demo-app-3",
      "Amazon",
      "Full Stack Engineer",
      "Fast-growing team, broad ownership.",
      "2025-10-28",
      "interview_scheduled",
      "2025-10-31",
      Vec::new(),
    ),
    demo_app(
      "demo-app-4",
      "Apple",
      "Backend Developer",
      "Services infrastructure role.",
      "2025-10-29",
      "interview_completed",
      "2025-11-01",
      vec![Note {
        id:         "demo-note-1".into(),
        content:    "Interview went well; many questions about my current \
                     role. Follow up next week."
          .into(),
        created_at: ts("2025-11-06T14:38:15Z"),
        updated_at: None,
      }],
    ),
    demo_app(
      "demo-app-5",
      "Microsoft",
      "Platform Engineer",
      "Developer tooling org.",
      "2025-11-02",
      "offer_received",
      "2025-11-05",
      Vec::new(),
    ),
    demo_app(
      "demo-app-6",
      "Netflix",
      "Site Reliability Engineer",
      "Streaming infrastructure.",
      "2025-11-03",
      "rejected",
      "2025-11-07",
      Vec::new(),
    ),
  ]
}

/// The demo schema is the built-in default field set.
pub fn demo_custom_fields() -> Vec<CustomField> {
  default_fields()
}

/// Demo charts and overview cards: the defaults, pointed at the demo
/// schema's status field.
pub fn demo_chart_configs() -> ChartConfigSet {
  let now = ts("2025-11-06T12:00:00Z");
  ChartConfigSet {
    charts:         demo_charts_at(now),
    overview_cards: demo_cards_at(now),
  }
}

fn demo_charts_at(now: DateTime<Utc>) -> Vec<ChartConfig> {
  default_chart_configs(Some("status"), now)
}

fn demo_cards_at(now: DateTime<Utc>) -> Vec<OverviewCardConfig> {
  default_overview_cards(now)
}

/// Preferences seeded alongside the demo data.
pub fn demo_preferences() -> UserPreference {
  UserPreference {
    default_pagination: 10,
    ..UserPreference::default()
  }
}
