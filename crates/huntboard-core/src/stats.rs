//! The statistics engine — pure functions over the current applications and
//! field definitions.
//!
//! Nothing here mutates its inputs or touches a clock, so results are
//! deterministic for a given input and callers can memoise on input
//! identity. Functions that need "today" (trailing month windows, range
//! presets) take it as an argument.
//!
//! The schema is user-defined, so semantic roles ("the application date",
//! "the status field") are located through [`resolve_role`]; when no field
//! matches, every function returns an empty or zero result rather than
//! failing.

use chrono::{Datelike, NaiveDate};

use crate::{
  application::Application,
  chart::DateRangePreset,
  field::{CustomField, FieldRole, resolve_role},
};

// ─── Date ranges ─────────────────────────────────────────────────────────────

/// An inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateRange {
  /// Materialise a preset relative to `today`. `All` means no filter.
  pub fn preset(preset: DateRangePreset, today: NaiveDate) -> Option<Self> {
    let days = match preset {
      DateRangePreset::Last7 => 7,
      DateRangePreset::Last30 => 30,
      DateRangePreset::Last90 => 90,
      DateRangePreset::All => return None,
    };
    Some(Self {
      // Window includes today.
      start: today - chrono::Duration::days(days - 1),
      end:   today,
    })
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    date >= self.start && date <= self.end
  }
}

// ─── Buckets ─────────────────────────────────────────────────────────────────

/// One calendar-day bucket, carrying its applications for drill-down.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
  pub date:         NaiveDate,
  pub count:        usize,
  pub applications: Vec<Application>,
}

/// One calendar-month bucket of a fixed trailing window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
  /// Zero-padded `YYYY-MM` key.
  pub month: String,
  /// Human-readable label, e.g. `Jan 2025`.
  pub label: String,
  pub count: usize,
}

/// One slice of a status breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
  /// The option's stable value key.
  pub value:      String,
  pub label:      String,
  pub count:      usize,
  /// Independently rounded per slice; the column need not sum to 100.
  pub percentage: u32,
  pub color:      Option<String>,
}

// ─── Scalar metrics ──────────────────────────────────────────────────────────

pub fn total_applications(applications: &[Application]) -> usize {
  applications.len()
}

/// Applications with a non-empty value in the response-date field.
pub fn total_responses(applications: &[Application], fields: &[CustomField]) -> usize {
  let Some(field) = resolve_role(fields, FieldRole::ResponseDate) else {
    return 0;
  };
  applications
    .iter()
    .filter(|app| app.value(&field.id).is_some_and(|v| !v.is_empty()))
    .count()
}

/// `round(responses / total × 100)`; 0 when there are no applications.
pub fn response_rate(applications: &[Application], fields: &[CustomField]) -> u32 {
  let total = total_applications(applications);
  if total == 0 {
    return 0;
  }
  let responses = total_responses(applications, fields);
  percentage(responses, total)
}

/// Mean gap in whole days between application date and response date.
///
/// Only pairs where both dates parse and the response is not earlier than
/// the application contribute; invalid and negative pairs are excluded
/// outright, never clamped. 0 when no valid pair exists.
pub fn average_response_time(applications: &[Application], fields: &[CustomField]) -> i64 {
  let Some(applied) = resolve_role(fields, FieldRole::ApplicationDate) else {
    return 0;
  };
  let Some(responded) = resolve_role(fields, FieldRole::ResponseDate) else {
    return 0;
  };

  let gaps: Vec<i64> = applications
    .iter()
    .filter_map(|app| {
      let applied_on = app.value(&applied.id)?.as_date()?;
      let responded_on = app.value(&responded.id)?.as_date()?;
      (responded_on >= applied_on).then(|| (responded_on - applied_on).num_days())
    })
    .collect();

  if gaps.is_empty() {
    return 0;
  }
  let sum: i64 = gaps.iter().sum();
  (sum as f64 / gaps.len() as f64).round() as i64
}

// ─── Per-day series ──────────────────────────────────────────────────────────

/// Applications grouped by their application date. Only days with data
/// appear; buckets are sorted ascending.
pub fn applications_per_day(
  applications: &[Application],
  fields: &[CustomField],
  range: Option<&DateRange>,
) -> Vec<DayBucket> {
  per_day(applications, fields, FieldRole::ApplicationDate, range)
}

/// Responses grouped by their response date.
pub fn responses_per_day(
  applications: &[Application],
  fields: &[CustomField],
  range: Option<&DateRange>,
) -> Vec<DayBucket> {
  per_day(applications, fields, FieldRole::ResponseDate, range)
}

fn per_day(
  applications: &[Application],
  fields: &[CustomField],
  role: FieldRole,
  range: Option<&DateRange>,
) -> Vec<DayBucket> {
  let Some(field) = resolve_role(fields, role) else {
    return Vec::new();
  };

  let mut days: Vec<DayBucket> = Vec::new();
  for app in applications {
    let Some(date) = app.value(&field.id).and_then(|v| v.as_date()) else {
      continue;
    };
    if let Some(range) = range {
      if !range.contains(date) {
        continue;
      }
    }
    match days.iter_mut().find(|b| b.date == date) {
      Some(bucket) => {
        bucket.count += 1;
        bucket.applications.push(app.clone());
      }
      None => days.push(DayBucket { date, count: 1, applications: vec![app.clone()] }),
    }
  }

  days.sort_by_key(|b| b.date);
  days
}

// ─── Per-month series ────────────────────────────────────────────────────────

/// Applications per calendar month over a fixed trailing window of
/// `months` months ending at `today`'s month. Months with no data are
/// explicit zero buckets.
pub fn applications_per_month(
  applications: &[Application],
  fields: &[CustomField],
  months: usize,
  today: NaiveDate,
) -> Vec<MonthBucket> {
  per_month(applications, fields, FieldRole::ApplicationDate, months, today)
}

/// Responses per calendar month over the same trailing window.
pub fn responses_per_month(
  applications: &[Application],
  fields: &[CustomField],
  months: usize,
  today: NaiveDate,
) -> Vec<MonthBucket> {
  per_month(applications, fields, FieldRole::ResponseDate, months, today)
}

fn per_month(
  applications: &[Application],
  fields: &[CustomField],
  role: FieldRole,
  months: usize,
  today: NaiveDate,
) -> Vec<MonthBucket> {
  let Some(field) = resolve_role(fields, role) else {
    return Vec::new();
  };

  let mut counts: Vec<(String, usize)> = Vec::new();
  for app in applications {
    let Some(date) = app.value(&field.id).and_then(|v| v.as_date()) else {
      continue;
    };
    let key = month_key(date.year(), date.month());
    match counts.iter_mut().find(|(k, _)| *k == key) {
      Some((_, n)) => *n += 1,
      None => counts.push((key, 1)),
    }
  }

  (0..months)
    .rev()
    .map(|back| {
      let first = shift_month(today, back as i32);
      let key = month_key(first.year(), first.month());
      let count = counts
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(0, |(_, n)| *n);
      MonthBucket {
        month: key,
        label: first.format("%b %Y").to_string(),
        count,
      }
    })
    .collect()
}

fn month_key(year: i32, month: u32) -> String {
  format!("{year:04}-{month:02}")
}

/// First day of the month `back` months before `date`'s month.
fn shift_month(date: NaiveDate, back: i32) -> NaiveDate {
  let total = date.year() * 12 + date.month() as i32 - 1 - back;
  let (year, month) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
  NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid")
}

// ─── Status breakdown ────────────────────────────────────────────────────────

/// Occurrences of each declared status option across all applications.
///
/// Zero-count options are dropped and slices are sorted by count descending.
/// Percentages are rounded independently per slice, so they are not
/// guaranteed to sum to exactly 100 — an accepted property.
pub fn status_breakdown(
  applications: &[Application],
  fields: &[CustomField],
) -> Vec<StatusCount> {
  let Some(field) = resolve_role(fields, FieldRole::Status) else {
    return Vec::new();
  };
  let Some(options) = &field.options else {
    return Vec::new();
  };
  let total = applications.len();
  if total == 0 {
    return Vec::new();
  }

  let mut slices: Vec<StatusCount> = options
    .iter()
    .map(|option| {
      let count = applications
        .iter()
        .filter(|app| {
          app
            .value(&field.id)
            .is_some_and(|v| !v.is_empty() && v.as_key() == option.value)
        })
        .count();
      StatusCount {
        value:      option.value.clone(),
        label:      option.label.clone(),
        count,
        percentage: percentage(count, total),
        color:      option.color.clone(),
      }
    })
    .filter(|s| s.count > 0)
    .collect();

  slices.sort_by(|a, b| b.count.cmp(&a.count));
  slices
}

fn percentage(part: usize, total: usize) -> u32 {
  (part as f64 / total as f64 * 100.0).round() as u32
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use crate::{
    application::FieldValue,
    field::default_fields,
  };

  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn app(id: &str, pairs: &[(&str, FieldValue)]) -> Application {
    let mut application = Application::new(id);
    let mut data = BTreeMap::new();
    for (k, v) in pairs {
      data.insert((*k).to_string(), v.clone());
    }
    application.data = data;
    application
  }

  fn dated(id: &str, applied: &str, responded: Option<&str>) -> Application {
    let mut pairs = vec![("applicationDate", FieldValue::Text(applied.into()))];
    if let Some(r) = responded {
      pairs.push(("responseDate", FieldValue::Text(r.into())));
    }
    app(id, &pairs)
  }

  // ── Per-day ───────────────────────────────────────────────────────────────

  #[test]
  fn per_day_buckets_and_sorts() {
    let fields = default_fields();
    let apps = vec![
      dated("a", "2024-01-16", None),
      dated("b", "2024-01-15", None),
      dated("c", "2024-01-15", None),
    ];
    let days = applications_per_day(&apps, &fields, None);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, ymd(2024, 1, 15));
    assert_eq!(days[0].count, 2);
    assert_eq!(days[1].date, ymd(2024, 1, 16));
    assert_eq!(days[1].count, 1);
  }

  #[test]
  fn per_day_clips_to_range() {
    let fields = default_fields();
    let apps = vec![
      dated("a", "2024-01-10", None),
      dated("b", "2024-01-20", None),
    ];
    let range = DateRange { start: ymd(2024, 1, 15), end: ymd(2024, 1, 31) };
    let days = applications_per_day(&apps, &fields, Some(&range));
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].date, ymd(2024, 1, 20));
  }

  #[test]
  fn per_day_without_date_field_is_empty() {
    let apps = vec![dated("a", "2024-01-10", None)];
    assert!(applications_per_day(&apps, &[], None).is_empty());
  }

  #[test]
  fn responses_per_day_skips_blank_values() {
    let fields = default_fields();
    let apps = vec![
      dated("a", "2024-01-10", Some("2024-01-12")),
      dated("b", "2024-01-10", Some("")),
      dated("c", "2024-01-10", None),
    ];
    let days = responses_per_day(&apps, &fields, None);
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].count, 1);
  }

  // ── Per-month ─────────────────────────────────────────────────────────────

  #[test]
  fn per_month_zero_fills_trailing_window() {
    let fields = default_fields();
    let apps = vec![
      dated("a", "2024-03-05", None),
      dated("b", "2024-03-20", None),
      dated("c", "2024-01-02", None),
    ];
    let months = applications_per_month(&apps, &fields, 4, ymd(2024, 4, 15));
    let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03", "2024-04"]);
    let counts: Vec<usize> = months.iter().map(|m| m.count).collect();
    assert_eq!(counts, vec![1, 0, 2, 0]);
    assert_eq!(months[0].label, "Jan 2024");
  }

  #[test]
  fn per_month_window_crosses_year_boundary() {
    let fields = default_fields();
    let months = applications_per_month(&[], &fields, 3, ymd(2024, 1, 10));
    let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01"]);
  }

  // ── Scalars ───────────────────────────────────────────────────────────────

  #[test]
  fn response_rate_rounds() {
    let fields = default_fields();
    let apps = vec![
      dated("a", "2024-01-01", Some("2024-01-03")),
      dated("b", "2024-01-01", Some("2024-01-04")),
      dated("c", "2024-01-01", None),
    ];
    assert_eq!(total_responses(&apps, &fields), 2);
    assert_eq!(response_rate(&apps, &fields), 67);
  }

  #[test]
  fn response_rate_is_zero_with_no_applications() {
    assert_eq!(response_rate(&[], &default_fields()), 0);
  }

  #[test]
  fn average_response_time_means_valid_pairs() {
    let fields = default_fields();
    let apps = vec![
      dated("a", "2024-01-15", Some("2024-01-20")), // 5 days
      dated("b", "2024-01-16", Some("2024-01-25")), // 9 days
      dated("c", "2024-01-17", None),               // excluded
    ];
    assert_eq!(average_response_time(&apps, &fields), 7);
  }

  #[test]
  fn negative_pairs_are_excluded_not_clamped() {
    let fields = default_fields();
    let apps = vec![
      dated("a", "2024-01-15", Some("2024-01-10")), // response before application
      dated("b", "2024-01-15", Some("2024-01-19")), // 4 days
    ];
    assert_eq!(average_response_time(&apps, &fields), 4);
  }

  #[test]
  fn unparseable_dates_are_excluded() {
    let fields = default_fields();
    let apps = vec![dated("a", "not a date", Some("2024-01-19"))];
    assert_eq!(average_response_time(&apps, &fields), 0);
  }

  // ── Status breakdown ──────────────────────────────────────────────────────

  #[test]
  fn breakdown_counts_declared_options_only() {
    let fields = default_fields();
    let apps = vec![
      app("a", &[("status", FieldValue::Text("applied".into()))]),
      app("b", &[("status", FieldValue::Text("applied".into()))]),
      app("c", &[("status", FieldValue::Text("rejected".into()))]),
      app("d", &[("status", FieldValue::Text("not_an_option".into()))]),
    ];
    let slices = status_breakdown(&apps, &fields);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].value, "applied");
    assert_eq!(slices[0].count, 2);
    assert_eq!(slices[0].percentage, 50);
    assert_eq!(slices[1].value, "rejected");
    assert_eq!(slices[1].percentage, 25);
  }

  #[test]
  fn breakdown_percentages_round_independently() {
    let fields = default_fields();
    let apps = vec![
      app("a", &[("status", FieldValue::Text("applied".into()))]),
      app("b", &[("status", FieldValue::Text("screening".into()))]),
      app("c", &[("status", FieldValue::Text("rejected".into()))]),
    ];
    let slices = status_breakdown(&apps, &fields);
    // Each of three equal slices rounds to 33; the sum is 99, not 100.
    let total: u32 = slices.iter().map(|s| s.percentage).sum();
    assert_eq!(total, 99);
  }

  // ── Date ranges ───────────────────────────────────────────────────────────

  #[test]
  fn preset_windows_include_today() {
    let today = ymd(2024, 6, 30);
    let range = DateRange::preset(DateRangePreset::Last7, today).unwrap();
    assert_eq!(range.start, ymd(2024, 6, 24));
    assert_eq!(range.end, today);
    assert!(DateRange::preset(DateRangePreset::All, today).is_none());
  }

  // ── Determinism / purity ──────────────────────────────────────────────────

  #[test]
  fn aggregation_does_not_mutate_inputs() {
    let fields = default_fields();
    let apps = vec![dated("a", "2024-01-15", Some("2024-01-20"))];
    let before = apps.clone();
    let _ = applications_per_day(&apps, &fields, None);
    let _ = status_breakdown(&apps, &fields);
    let _ = average_response_time(&apps, &fields);
    assert_eq!(apps, before);
  }
}
