//! User-defined report descriptors: chart configurations and overview cards.
//!
//! These describe *what* to compute, not computed data. The report engine
//! ([`crate::report`]) and statistics engine ([`crate::stats`]) interpret
//! them against the current applications and field definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Policy cap on configured charts and on overview cards, each.
pub const MAX_CHARTS: usize = 4;
pub const MAX_OVERVIEW_CARDS: usize = 4;

/// A chart carries at most this many series.
pub const MAX_SERIES: usize = 4;

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
  Line,
  Bar,
  Pie,
  Area,
}

/// How a chart groups its rows into buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
  Day,
  Month,
  Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRangePreset {
  Last7,
  Last30,
  Last90,
  All,
}

/// Aggregation applied to a field's non-empty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
  Count,
  Sum,
  Avg,
  Min,
  Max,
}

// ─── Chart series ────────────────────────────────────────────────────────────

/// What a series reads: the application count, or one custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SeriesSource {
  ApplicationsCount,
  CustomField { field_id: String },
}

/// One series within a chart (a chart carries one to four).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
  pub id:     String,
  pub label:  String,
  pub source: SeriesSource,
  /// Hex colour for rendering.
  pub color:  Option<String>,
}

// ─── ChartConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
  pub id:         String,
  pub title:      String,
  pub chart_type: ChartType,
  pub series:     Vec<ChartSeries>,
  pub group_by:   GroupBy,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_range: Option<DateRangePreset>,
  /// Display position; kept dense 1..N.
  pub order:      u32,
  pub created_at: DateTime<Utc>,
}

impl ChartConfig {
  /// Check structural validity: one to four series, and every custom-field
  /// series actually bound to a field id.
  pub fn validate(&self) -> Result<()> {
    if self.series.is_empty() {
      return Err(Error::ChartWithoutSeries(self.id.clone()));
    }
    if self.series.len() > MAX_SERIES {
      return Err(Error::TooManySeries(self.id.clone(), self.series.len()));
    }
    for series in &self.series {
      if let SeriesSource::CustomField { field_id } = &series.source {
        if field_id.is_empty() {
          return Err(Error::UnboundSeries(series.id.clone()));
        }
      }
    }
    Ok(())
  }
}

// ─── OverviewCardConfig ──────────────────────────────────────────────────────

/// What an overview card displays: a built-in metric or a field aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum CardMetric {
  TotalApplications,
  TotalResponses,
  ResponseRate,
  AvgResponseTime,
  FieldAggregate {
    field_id:    String,
    aggregation: Aggregation,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewCardConfig {
  pub id:         String,
  pub title:      String,
  pub metric:     CardMetric,
  /// Display position; kept dense 1..N.
  pub order:      u32,
  pub created_at: DateTime<Utc>,
}

impl OverviewCardConfig {
  pub fn validate(&self) -> Result<()> {
    if let CardMetric::FieldAggregate { field_id, .. } = &self.metric {
      if field_id.is_empty() {
        return Err(Error::UnboundCard(self.id.clone()));
      }
    }
    Ok(())
  }
}

// ─── ChartConfigSet ──────────────────────────────────────────────────────────

/// The unit persisted by both backends: all charts plus all overview cards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartConfigSet {
  pub charts:         Vec<ChartConfig>,
  pub overview_cards: Vec<OverviewCardConfig>,
}

/// Restore the dense `1..N` order invariant over charts.
pub fn renumber_charts(charts: &mut [ChartConfig]) {
  for (i, chart) in charts.iter_mut().enumerate() {
    chart.order = (i + 1) as u32;
  }
}

/// Restore the dense `1..N` order invariant over overview cards.
pub fn renumber_cards(cards: &mut [OverviewCardConfig]) {
  for (i, card) in cards.iter_mut().enumerate() {
    card.order = (i + 1) as u32;
  }
}

// ─── Defaults ────────────────────────────────────────────────────────────────

/// Starter charts: daily line, monthly bar, and a status pie when the schema
/// has a status field to point it at.
pub fn default_chart_configs(
  status_field_id: Option<&str>,
  now: DateTime<Utc>,
) -> Vec<ChartConfig> {
  let mut charts = vec![
    ChartConfig {
      id:         "default-apps-daily".into(),
      title:      "Applications Per Day".into(),
      chart_type: ChartType::Line,
      series:     vec![ChartSeries {
        id:     "default-apps-daily-s1".into(),
        label:  "Applications".into(),
        source: SeriesSource::ApplicationsCount,
        color:  Some("#000000".into()),
      }],
      group_by:   GroupBy::Day,
      date_range: Some(DateRangePreset::Last30),
      order:      1,
      created_at: now,
    },
    ChartConfig {
      id:         "default-apps-monthly".into(),
      title:      "Applications Per Month".into(),
      chart_type: ChartType::Bar,
      series:     vec![ChartSeries {
        id:     "default-apps-monthly-s1".into(),
        label:  "Applications".into(),
        source: SeriesSource::ApplicationsCount,
        color:  Some("#000000".into()),
      }],
      group_by:   GroupBy::Month,
      date_range: None,
      order:      2,
      created_at: now,
    },
  ];

  if let Some(field_id) = status_field_id {
    charts.push(ChartConfig {
      id:         "default-status-breakdown".into(),
      title:      "Status Breakdown".into(),
      chart_type: ChartType::Pie,
      series:     vec![ChartSeries {
        id:     "default-status-breakdown-s1".into(),
        label:  "Status".into(),
        source: SeriesSource::CustomField { field_id: field_id.into() },
        color:  None,
      }],
      group_by:   GroupBy::Value,
      date_range: None,
      order:      3,
      created_at: now,
    });
  }

  charts
}

/// The four built-in overview cards.
pub fn default_overview_cards(now: DateTime<Utc>) -> Vec<OverviewCardConfig> {
  let card = |id: &str, title: &str, metric: CardMetric, order: u32| OverviewCardConfig {
    id: id.into(),
    title: title.into(),
    metric,
    order,
    created_at: now,
  };
  vec![
    card("default-total-apps", "Total Applications", CardMetric::TotalApplications, 1),
    card("default-total-responses", "Total Responses", CardMetric::TotalResponses, 2),
    card("default-response-rate", "Response Rate", CardMetric::ResponseRate, 3),
    card(
      "default-avg-response-time",
      "Avg Response Time",
      CardMetric::AvgResponseTime,
      4,
    ),
  ]
}

// ─── Tests ───────────────────────────────────────────────────────────────────
