//! The report engine — aggregation for user-configured charts and cards.
//!
//! Where [`crate::stats`] computes the fixed dashboard metrics, this module
//! interprets [`SeriesSource`] and [`Aggregation`] descriptors against the
//! dynamic schema. Same rules as stats: pure, non-mutating, tolerant of a
//! schema that lacks the fields a descriptor points at.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::{
  application::{Application, FieldValue, format_number},
  chart::{Aggregation, ChartType, SeriesSource},
  field::{CustomField, FieldRole, FieldType, resolve_role},
  stats::DateRange,
};

// ─── Output types ────────────────────────────────────────────────────────────

/// One point of a day or month series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
  /// `YYYY-MM-DD` for day grouping, `Mon YYYY` for month grouping.
  pub label:        String,
  pub value:        f64,
  /// Bucket date (first of month for month grouping), for sorting and
  /// drill-down navigation.
  pub date:         NaiveDate,
  pub applications: Vec<Application>,
}

/// One slice of a value-breakdown (pie) aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiePoint {
  pub label:      String,
  pub value:      usize,
  /// Independently rounded; slices need not sum to 100.
  pub percentage: u32,
  pub color:      Option<String>,
}

/// Result of a per-field aggregate. `NotApplicable` is the sentinel for an
/// aggregation that does not fit the field's type (e.g. `sum` over text).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateValue {
  Number(f64),
  Date(NaiveDate),
  NotApplicable,
}

impl fmt::Display for AggregateValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(n) => write!(f, "{}", format_number(*n)),
      Self::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
      Self::NotApplicable => write!(f, "N/A"),
    }
  }
}

// ─── Row dating ──────────────────────────────────────────────────────────────

/// The date a record contributes under: its application-date field when the
/// schema has one, its creation timestamp otherwise.
fn row_date(app: &Application, fields: &[CustomField]) -> Option<NaiveDate> {
  match resolve_role(fields, FieldRole::ApplicationDate) {
    Some(field) => app
      .value(&field.id)
      .and_then(|v| v.as_date())
      .or_else(|| Some(app.created_at.date_naive())),
    None => Some(app.created_at.date_naive()),
  }
}

/// A record's contribution to a bucket: 1 for counting, the numeric value
/// for number fields, 1 per non-empty occurrence otherwise. `None` means the
/// record contributes nothing.
fn contribution(
  app: &Application,
  fields: &[CustomField],
  source: &SeriesSource,
) -> Option<f64> {
  match source {
    SeriesSource::ApplicationsCount => Some(1.0),
    SeriesSource::CustomField { field_id } => {
      let field = fields.iter().find(|f| f.id == *field_id)?;
      let value = app.value(field_id).filter(|v| !v.is_empty())?;
      if field.field_type == FieldType::Number {
        if let Some(n) = value.as_number() {
          return Some(n);
        }
      }
      Some(1.0)
    }
  }
}

// ─── Day / month aggregation ─────────────────────────────────────────────────

/// Aggregate a series into calendar-day buckets, sorted ascending. Only days
/// with data appear; `range`, when given, clips the output.
pub fn aggregate_by_day(
  applications: &[Application],
  fields: &[CustomField],
  source: &SeriesSource,
  range: Option<&DateRange>,
) -> Vec<SeriesPoint> {
  let mut points: Vec<SeriesPoint> = Vec::new();

  for app in applications {
    let Some(date) = row_date(app, fields) else {
      continue;
    };
    if let Some(range) = range {
      if !range.contains(date) {
        continue;
      }
    }
    let Some(amount) = contribution(app, fields, source) else {
      continue;
    };
    match points.iter_mut().find(|p| p.date == date) {
      Some(point) => {
        point.value += amount;
        point.applications.push(app.clone());
      }
      None => points.push(SeriesPoint {
        label:        date.format("%Y-%m-%d").to_string(),
        value:        amount,
        date,
        applications: vec![app.clone()],
      }),
    }
  }

  points.sort_by_key(|p| p.date);
  points
}

/// Aggregate a series into calendar-month buckets and keep the trailing
/// `months` months that actually have data, sorted ascending.
pub fn aggregate_by_month(
  applications: &[Application],
  fields: &[CustomField],
  source: &SeriesSource,
  months: usize,
) -> Vec<SeriesPoint> {
  let mut points: Vec<SeriesPoint> = Vec::new();

  for app in applications {
    let Some(date) = row_date(app, fields) else {
      continue;
    };
    let Some(amount) = contribution(app, fields, source) else {
      continue;
    };
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
      .expect("first of month is always valid");
    match points.iter_mut().find(|p| p.date == first) {
      Some(point) => {
        point.value += amount;
        point.applications.push(app.clone());
      }
      None => points.push(SeriesPoint {
        label:        first.format("%b %Y").to_string(),
        value:        amount,
        date:         first,
        applications: vec![app.clone()],
      }),
    }
  }

  points.sort_by_key(|p| p.date);
  if points.len() > months {
    points.drain(..points.len() - months);
  }
  points
}

// ─── Value breakdown ─────────────────────────────────────────────────────────

/// Count occurrences of each distinct value of `field_id`, for pie charts.
///
/// Select values map through their declared option to a label and colour;
/// checkbox values read `Yes`/`No`; anything else groups by its raw key.
/// Sorted by count descending; percentages round independently.
pub fn aggregate_by_value(
  applications: &[Application],
  fields: &[CustomField],
  field_id: &str,
) -> Vec<PiePoint> {
  let Some(field) = fields.iter().find(|f| f.id == field_id) else {
    return Vec::new();
  };

  let mut points: Vec<PiePoint> = Vec::new();
  let mut total = 0usize;

  for app in applications {
    let Some(value) = app.value(field_id).filter(|v| !v.is_empty()) else {
      continue;
    };
    let (label, color) = describe(field, value);
    total += 1;
    match points.iter_mut().find(|p| p.label == label) {
      Some(point) => point.value += 1,
      None => points.push(PiePoint { label, value: 1, percentage: 0, color }),
    }
  }

  for point in &mut points {
    point.percentage = (point.value as f64 / total as f64 * 100.0).round() as u32;
  }
  points.sort_by(|a, b| b.value.cmp(&a.value));
  points
}

fn describe(field: &CustomField, value: &FieldValue) -> (String, Option<String>) {
  match field.field_type {
    FieldType::Select => {
      let key = value.as_key();
      match field
        .options
        .as_deref()
        .and_then(|opts| opts.iter().find(|o| o.value == key))
      {
        Some(option) => (option.label.clone(), option.color.clone()),
        None => (key, None),
      }
    }
    FieldType::Checkbox => {
      let yes = matches!(value, FieldValue::Bool(true));
      ((if yes { "Yes" } else { "No" }).to_string(), None)
    }
    _ => (value.as_key(), None),
  }
}

// ─── Per-field aggregates ────────────────────────────────────────────────────

/// Compute `aggregation` over the non-empty values of `field_id`.
///
/// `sum`/`avg` apply to number fields only; `min`/`max` apply to number
/// fields (arithmetic) and date fields (chronological). Anything else is
/// [`AggregateValue::NotApplicable`]. An empty value set yields `Number(0)`.
pub fn field_aggregate(
  applications: &[Application],
  fields: &[CustomField],
  field_id: &str,
  aggregation: Aggregation,
) -> AggregateValue {
  let Some(field) = fields.iter().find(|f| f.id == field_id) else {
    return AggregateValue::NotApplicable;
  };

  let values: Vec<&FieldValue> = applications
    .iter()
    .filter_map(|app| app.value(field_id).filter(|v| !v.is_empty()))
    .collect();

  if values.is_empty() {
    return AggregateValue::Number(0.0);
  }

  let numbers = || -> Vec<f64> { values.iter().filter_map(|v| v.as_number()).collect() };
  let dates = || -> Vec<NaiveDate> { values.iter().filter_map(|v| v.as_date()).collect() };

  match aggregation {
    Aggregation::Count => AggregateValue::Number(values.len() as f64),

    Aggregation::Sum => {
      if field.field_type != FieldType::Number {
        return AggregateValue::NotApplicable;
      }
      AggregateValue::Number(numbers().iter().sum())
    }

    Aggregation::Avg => {
      if field.field_type != FieldType::Number {
        return AggregateValue::NotApplicable;
      }
      let ns = numbers();
      if ns.is_empty() {
        return AggregateValue::Number(0.0);
      }
      let mean = ns.iter().sum::<f64>() / ns.len() as f64;
      AggregateValue::Number(mean.round())
    }

    Aggregation::Min | Aggregation::Max => {
      let wants_max = aggregation == Aggregation::Max;
      match field.field_type {
        FieldType::Number => {
          let ns = numbers();
          if ns.is_empty() {
            return AggregateValue::Number(0.0);
          }
          let pick = ns
            .into_iter()
            .reduce(|a, b| if (b > a) == wants_max { b } else { a })
            .expect("non-empty");
          AggregateValue::Number(pick)
        }
        FieldType::Date => {
          let ds = dates();
          match if wants_max { ds.iter().max() } else { ds.iter().min() } {
            Some(d) => AggregateValue::Date(*d),
            None => AggregateValue::NotApplicable,
          }
        }
        _ => AggregateValue::NotApplicable,
      }
    }
  }
}

// ─── Recommendations ─────────────────────────────────────────────────────────

/// Chart types that make sense for a field, best first.
pub fn recommended_chart_types(field: &CustomField) -> Vec<ChartType> {
  match field.field_type {
    FieldType::Number => vec![ChartType::Line, ChartType::Bar, ChartType::Area],
    FieldType::Select | FieldType::Checkbox => vec![ChartType::Pie, ChartType::Bar],
    FieldType::Date => vec![ChartType::Line, ChartType::Bar],
    // Text can only be counted.
    FieldType::Text | FieldType::Textarea => vec![ChartType::Bar],
  }
}

/// Aggregations that make sense for a field.
pub fn recommended_aggregations(field: &CustomField) -> Vec<Aggregation> {
  match field.field_type {
    FieldType::Number => vec![
      Aggregation::Count,
      Aggregation::Sum,
      Aggregation::Avg,
      Aggregation::Min,
      Aggregation::Max,
    ],
    FieldType::Date => vec![Aggregation::Count, Aggregation::Min, Aggregation::Max],
    _ => vec![Aggregation::Count],
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
