//! [`StateStore`] — the in-memory application state, mutated only through
//! [`Action`]s.
//!
//! Four slices, each carrying its own `loading` flag and last `error` string
//! for the UI. Conflict policy is last-writer-wins at slice level: unknown-id
//! updates and out-of-range moves are silent no-ops, and nothing here retries
//! or reconciles.

use chrono::Utc;

use huntboard_core::{
  application::{Application, Note},
  chart::{
    ChartConfig, ChartConfigSet, MAX_CHARTS, MAX_OVERVIEW_CARDS, OverviewCardConfig,
    renumber_cards, renumber_charts,
  },
  field::{CustomField, renumber},
  preference::{Theme, UserPreference},
};

// ─── Slices ──────────────────────────────────────────────────────────────────

/// One slice of state plus its UI bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Slice<T> {
  pub data:    T,
  pub loading: bool,
  pub error:   Option<String>,
}

/// Which slice a loading/error action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceId {
  Applications,
  CustomFields,
  Preferences,
  Charts,
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// Every mutation the state store accepts.
#[derive(Debug, Clone)]
pub enum Action {
  // Applications
  SetApplications(Vec<Application>),
  AddApplication(Application),
  UpdateApplication(Application),
  DeleteApplication(String),
  AddNote { application_id: String, note: Note },
  UpdateNote { application_id: String, note_id: String, content: String },
  DeleteNote { application_id: String, note_id: String },

  // Custom fields
  SetCustomFields(Vec<CustomField>),
  AddCustomField(CustomField),
  UpdateCustomField(CustomField),
  DeleteCustomField(String),
  /// Full desired id order; ids not listed keep their relative order at the
  /// end.
  ReorderCustomFields(Vec<String>),

  // Preferences
  SetPreferences(UserPreference),
  SetTheme(Theme),
  SetPagination(u32),

  // Chart configs
  SetChartConfigs(ChartConfigSet),
  AddChart(ChartConfig),
  UpdateChart(ChartConfig),
  DeleteChart(String),
  MoveChartUp(String),
  MoveChartDown(String),
  AddOverviewCard(OverviewCardConfig),
  UpdateOverviewCard(OverviewCardConfig),
  DeleteOverviewCard(String),
  MoveCardUp(String),
  MoveCardDown(String),

  // UI bookkeeping
  SetLoading(SliceId, bool),
  SetError(SliceId, Option<String>),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The whole in-memory state. Constructed once at startup; read freely,
/// written only through [`StateStore::apply`].
#[derive(Debug, Clone, Default)]
pub struct StateStore {
  pub applications:  Slice<Vec<Application>>,
  pub custom_fields: Slice<Vec<CustomField>>,
  pub preferences:   Slice<UserPreference>,
  pub charts:        Slice<ChartConfigSet>,
}

impl StateStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn apply(&mut self, action: Action) {
    match action {
      // ── Applications ──────────────────────────────────────────────────
      Action::SetApplications(apps) => self.applications.data = apps,
      Action::AddApplication(app) => self.applications.data.push(app),
      Action::UpdateApplication(app) => {
        if let Some(slot) = self.applications.data.iter_mut().find(|a| a.id == app.id) {
          *slot = app;
        }
      }
      Action::DeleteApplication(id) => {
        self.applications.data.retain(|a| a.id != id);
      }
      Action::AddNote { application_id, note } => {
        if let Some(app) = self.application_mut(&application_id) {
          app.notes.push(note);
          app.touch();
        }
      }
      Action::UpdateNote { application_id, note_id, content } => {
        if let Some(app) = self.application_mut(&application_id) {
          if let Some(note) = app.notes.iter_mut().find(|n| n.id == note_id) {
            note.content = content;
            note.updated_at = Some(Utc::now());
            app.touch();
          }
        }
      }
      Action::DeleteNote { application_id, note_id } => {
        if let Some(app) = self.application_mut(&application_id) {
          let before = app.notes.len();
          app.notes.retain(|n| n.id != note_id);
          if app.notes.len() != before {
            app.touch();
          }
        }
      }

      // ── Custom fields ─────────────────────────────────────────────────
      Action::SetCustomFields(fields) => self.custom_fields.data = fields,
      Action::AddCustomField(field) => {
        self.custom_fields.data.push(field);
        renumber(&mut self.custom_fields.data);
      }
      Action::UpdateCustomField(field) => {
        if let Some(slot) = self.custom_fields.data.iter_mut().find(|f| f.id == field.id) {
          *slot = field;
        }
      }
      // Values written under the deleted field stay in application data.
      Action::DeleteCustomField(id) => {
        self.custom_fields.data.retain(|f| f.id != id);
        renumber(&mut self.custom_fields.data);
      }
      Action::ReorderCustomFields(ids) => {
        let fields = &mut self.custom_fields.data;
        fields.sort_by_key(|f| {
          ids
            .iter()
            .position(|id| *id == f.id)
            .unwrap_or(ids.len() + f.order as usize)
        });
        renumber(fields);
      }

      // ── Preferences ───────────────────────────────────────────────────
      Action::SetPreferences(prefs) => self.preferences.data = prefs,
      Action::SetTheme(theme) => self.preferences.data.theme = theme,
      Action::SetPagination(n) => self.preferences.data.default_pagination = n,

      // ── Chart configs ─────────────────────────────────────────────────
      Action::SetChartConfigs(configs) => self.charts.data = configs,
      Action::AddChart(chart) => {
        let charts = &mut self.charts.data.charts;
        if charts.len() >= MAX_CHARTS {
          tracing::warn!(id = %chart.id, cap = MAX_CHARTS, "chart cap reached, add ignored");
          return;
        }
        charts.push(chart);
        renumber_charts(charts);
      }
      Action::UpdateChart(chart) => {
        if let Some(slot) = self.charts.data.charts.iter_mut().find(|c| c.id == chart.id) {
          *slot = chart;
        }
      }
      Action::DeleteChart(id) => {
        self.charts.data.charts.retain(|c| c.id != id);
        renumber_charts(&mut self.charts.data.charts);
      }
      Action::MoveChartUp(id) => {
        let charts = &mut self.charts.data.charts;
        if let Some(i) = charts.iter().position(|c| c.id == id) {
          if i > 0 {
            charts.swap(i, i - 1);
            renumber_charts(charts);
          }
        }
      }
      Action::MoveChartDown(id) => {
        let charts = &mut self.charts.data.charts;
        if let Some(i) = charts.iter().position(|c| c.id == id) {
          if i + 1 < charts.len() {
            charts.swap(i, i + 1);
            renumber_charts(charts);
          }
        }
      }
      Action::AddOverviewCard(card) => {
        let cards = &mut self.charts.data.overview_cards;
        if cards.len() >= MAX_OVERVIEW_CARDS {
          tracing::warn!(id = %card.id, cap = MAX_OVERVIEW_CARDS, "card cap reached, add ignored");
          return;
        }
        cards.push(card);
        renumber_cards(cards);
      }
      Action::UpdateOverviewCard(card) => {
        if let Some(slot) = self
          .charts
          .data
          .overview_cards
          .iter_mut()
          .find(|c| c.id == card.id)
        {
          *slot = card;
        }
      }
      Action::DeleteOverviewCard(id) => {
        self.charts.data.overview_cards.retain(|c| c.id != id);
        renumber_cards(&mut self.charts.data.overview_cards);
      }
      Action::MoveCardUp(id) => {
        let cards = &mut self.charts.data.overview_cards;
        if let Some(i) = cards.iter().position(|c| c.id == id) {
          if i > 0 {
            cards.swap(i, i - 1);
            renumber_cards(cards);
          }
        }
      }
      Action::MoveCardDown(id) => {
        let cards = &mut self.charts.data.overview_cards;
        if let Some(i) = cards.iter().position(|c| c.id == id) {
          if i + 1 < cards.len() {
            cards.swap(i, i + 1);
            renumber_cards(cards);
          }
        }
      }

      // ── UI bookkeeping ────────────────────────────────────────────────
      Action::SetLoading(slice, loading) => match slice {
        SliceId::Applications => self.applications.loading = loading,
        SliceId::CustomFields => self.custom_fields.loading = loading,
        SliceId::Preferences => self.preferences.loading = loading,
        SliceId::Charts => self.charts.loading = loading,
      },
      Action::SetError(slice, error) => match slice {
        SliceId::Applications => self.applications.error = error,
        SliceId::CustomFields => self.custom_fields.error = error,
        SliceId::Preferences => self.preferences.error = error,
        SliceId::Charts => self.charts.error = error,
      },
    }
  }

  fn application_mut(&mut self, id: &str) -> Option<&mut Application> {
    self.applications.data.iter_mut().find(|a| a.id == id)
  }
}
