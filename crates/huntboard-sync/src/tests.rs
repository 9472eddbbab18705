//! Tests for the router's dispatch behaviour and the state store's actions.

use chrono::Utc;
use tempfile::tempdir;
use uuid::Uuid;

use huntboard_core::{
  application::{Application, FieldValue, Note},
  chart::{
    Aggregation, CardMetric, ChartConfig, ChartSeries, ChartType, GroupBy, MAX_CHARTS,
    OverviewCardConfig, SeriesSource,
  },
  field::{CustomField, FieldType},
  preference::Theme,
  session::StaticSessions,
};
use huntboard_store_local::LocalStore;
use huntboard_store_sqlite::SqliteStore;

use crate::{Action, Mode, SliceId, StateStore, SyncRouter};

// ─── Router ──────────────────────────────────────────────────────────────────

async fn router(sessions: StaticSessions) -> (SyncRouter<StaticSessions>, tempfile::TempDir) {
  let dir = tempdir().unwrap();
  let local = LocalStore::open(dir.path()).unwrap();
  let remote = SqliteStore::open_in_memory(sessions.clone()).await.unwrap();
  (SyncRouter::new(local, remote, sessions), dir)
}

fn application(id: &str, company: &str) -> Application {
  let mut app = Application::new(id);
  app
    .data
    .insert("companyName".into(), FieldValue::Text(company.into()));
  app
}

#[tokio::test]
async fn signed_out_operations_land_locally() {
  let sessions = StaticSessions::signed_out();
  let (r, _dir) = router(sessions.clone()).await;

  assert!(!r.is_authenticated().await);
  assert_eq!(r.current_mode().await, Mode::Demo);
  r.save_application(application("a1", "Acme")).await.unwrap();
  assert_eq!(r.load_applications().await.unwrap().len(), 1);

  // The remote store never saw the write: after signing in, the same router
  // reads the (empty) authenticated collection instead.
  sessions.sign_in(Uuid::new_v4());
  assert!(r.is_authenticated().await);
  assert_eq!(r.current_mode().await, Mode::Authenticated);
  assert!(r.load_applications().await.unwrap().is_empty());
}

#[tokio::test]
async fn signed_in_operations_land_remotely() {
  let sessions = StaticSessions::signed_in(Uuid::new_v4());
  let (r, _dir) = router(sessions.clone()).await;

  r.save_application(application("a1", "Acme")).await.unwrap();
  assert_eq!(r.load_applications().await.unwrap().len(), 1);

  sessions.sign_out();
  assert_eq!(r.current_mode().await, Mode::Demo);
  assert!(r.load_applications().await.unwrap().is_empty());
}

#[tokio::test]
async fn session_is_probed_per_call_not_cached() {
  let sessions = StaticSessions::signed_out();
  let (r, _dir) = router(sessions.clone()).await;

  r.save_application(application("local-1", "Acme")).await.unwrap();
  sessions.sign_in(Uuid::new_v4());
  r.save_application(application("remote-1", "Globex")).await.unwrap();

  let remote_view = r.load_applications().await.unwrap();
  assert_eq!(remote_view.len(), 1);
  assert_eq!(remote_view[0].id, "remote-1");

  sessions.sign_out();
  let local_view = r.load_applications().await.unwrap();
  assert_eq!(local_view.len(), 1);
  assert_eq!(local_view[0].id, "local-1");
}

#[tokio::test]
async fn demo_lifecycle_ops_always_hit_the_local_store() {
  let sessions = StaticSessions::signed_in(Uuid::new_v4());
  let (r, _dir) = router(sessions.clone()).await;

  // Authenticated, yet the first-visit marker lands on the device.
  r.mark_first_visit_complete().unwrap();
  sessions.sign_out();
  assert!(!r.is_first_visit().await.unwrap());

  r.start_from_scratch().unwrap();
  assert!(r.load_applications().await.unwrap().is_empty());
  assert!(!r.load_custom_fields().await.unwrap().is_empty());
}

#[tokio::test]
async fn demo_seed_routes_by_mode() {
  let sessions = StaticSessions::signed_out();
  let (r, _dir) = router(sessions.clone()).await;

  assert!(r.is_first_visit().await.unwrap());
  assert!(r.load_demo_data().await.unwrap());
  assert!(!r.is_first_visit().await.unwrap());
  assert!(!r.load_applications().await.unwrap().is_empty());
}

// ─── State store: applications ───────────────────────────────────────────────

#[test]
fn application_crud_actions() {
  let mut state = StateStore::new();

  state.apply(Action::AddApplication(application("a1", "Acme")));
  state.apply(Action::AddApplication(application("a2", "Globex")));
  assert_eq!(state.applications.data.len(), 2);

  let mut edited = application("a1", "Acme");
  edited
    .data
    .insert("jobPosition".into(), FieldValue::Text("Engineer".into()));
  state.apply(Action::UpdateApplication(edited));
  assert!(state.applications.data[0].data.contains_key("jobPosition"));

  // Unknown id is a silent no-op.
  state.apply(Action::UpdateApplication(application("ghost", "Nobody")));
  assert_eq!(state.applications.data.len(), 2);

  state.apply(Action::DeleteApplication("a2".into()));
  assert_eq!(state.applications.data.len(), 1);
}

#[test]
fn note_actions_touch_the_parent() {
  let mut state = StateStore::new();
  state.apply(Action::AddApplication(application("a1", "Acme")));
  let before = state.applications.data[0].updated_at;

  state.apply(Action::AddNote {
    application_id: "a1".into(),
    note:           Note::new("n1", "called the recruiter"),
  });
  let app = &state.applications.data[0];
  assert_eq!(app.notes.len(), 1);
  assert!(app.updated_at >= before);
  assert!(app.notes[0].updated_at.is_none());

  state.apply(Action::UpdateNote {
    application_id: "a1".into(),
    note_id:        "n1".into(),
    content:        "they called back".into(),
  });
  let note = &state.applications.data[0].notes[0];
  assert_eq!(note.content, "they called back");
  assert!(note.updated_at.is_some());

  state.apply(Action::DeleteNote {
    application_id: "a1".into(),
    note_id:        "n1".into(),
  });
  assert!(state.applications.data[0].notes.is_empty());

  // Note actions against a missing parent are no-ops.
  state.apply(Action::AddNote {
    application_id: "ghost".into(),
    note:           Note::new("n2", "dropped"),
  });
  assert!(state.applications.data[0].notes.is_empty());
}

// ─── State store: custom fields ──────────────────────────────────────────────

fn field(id: &str, order: u32) -> CustomField {
  CustomField {
    id:            id.into(),
    name:          id.to_uppercase(),
    field_type:    FieldType::Text,
    required:      false,
    order,
    show_in_table: true,
    options:       None,
  }
}

#[test]
fn field_order_stays_dense_through_add_delete_reorder() {
  let mut state = StateStore::new();

  state.apply(Action::SetCustomFields(vec![field("a", 1), field("b", 2), field("c", 3)]));
  state.apply(Action::AddCustomField(field("d", 99)));
  let orders: Vec<u32> = state.custom_fields.data.iter().map(|f| f.order).collect();
  assert_eq!(orders, vec![1, 2, 3, 4]);

  state.apply(Action::DeleteCustomField("b".into()));
  let orders: Vec<u32> = state.custom_fields.data.iter().map(|f| f.order).collect();
  assert_eq!(orders, vec![1, 2, 3]);

  state.apply(Action::ReorderCustomFields(vec!["d".into(), "a".into(), "c".into()]));
  let ids: Vec<&str> = state.custom_fields.data.iter().map(|f| f.id.as_str()).collect();
  assert_eq!(ids, vec!["d", "a", "c"]);
  let orders: Vec<u32> = state.custom_fields.data.iter().map(|f| f.order).collect();
  assert_eq!(orders, vec![1, 2, 3]);
}

#[test]
fn deleting_a_field_leaves_application_data_alone() {
  let mut state = StateStore::new();
  state.apply(Action::AddApplication(application("a1", "Acme")));
  state.apply(Action::SetCustomFields(vec![field("companyName", 1)]));

  state.apply(Action::DeleteCustomField("companyName".into()));
  assert!(state.custom_fields.data.is_empty());
  assert!(state.applications.data[0].data.contains_key("companyName"));
}

// ─── State store: preferences ────────────────────────────────────────────────

#[test]
fn preference_actions() {
  let mut state = StateStore::new();
  assert_eq!(state.preferences.data.theme, Theme::Light);

  state.apply(Action::SetTheme(Theme::Dark));
  state.apply(Action::SetPagination(50));
  assert_eq!(state.preferences.data.theme, Theme::Dark);
  assert_eq!(state.preferences.data.default_pagination, 50);
}

// ─── State store: charts ─────────────────────────────────────────────────────

fn chart(id: &str) -> ChartConfig {
  ChartConfig {
    id:         id.into(),
    title:      id.to_uppercase(),
    chart_type: ChartType::Line,
    series:     vec![ChartSeries {
      id:     format!("{id}-s1"),
      label:  "Applications".into(),
      source: SeriesSource::ApplicationsCount,
      color:  Some("#0070F3".into()),
    }],
    group_by:   GroupBy::Day,
    date_range: None,
    order:      0,
    created_at: Utc::now(),
  }
}

fn card(id: &str) -> OverviewCardConfig {
  OverviewCardConfig {
    id:         id.into(),
    title:      id.to_uppercase(),
    metric:     CardMetric::FieldAggregate {
      field_id:    "salary".into(),
      aggregation: Aggregation::Avg,
    },
    order:      0,
    created_at: Utc::now(),
  }
}

#[test]
fn chart_cap_makes_the_fifth_add_a_no_op() {
  let mut state = StateStore::new();

  for i in 0..MAX_CHARTS {
    state.apply(Action::AddChart(chart(&format!("c{i}"))));
  }
  assert_eq!(state.charts.data.charts.len(), MAX_CHARTS);

  state.apply(Action::AddChart(chart("one-too-many")));
  assert_eq!(state.charts.data.charts.len(), MAX_CHARTS);
  assert!(!state.charts.data.charts.iter().any(|c| c.id == "one-too-many"));
}

#[test]
fn chart_moves_swap_and_renumber() {
  let mut state = StateStore::new();
  state.apply(Action::AddChart(chart("c1")));
  state.apply(Action::AddChart(chart("c2")));
  state.apply(Action::AddChart(chart("c3")));

  state.apply(Action::MoveChartUp("c2".into()));
  let ids: Vec<&str> = state.charts.data.charts.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, vec!["c2", "c1", "c3"]);
  let orders: Vec<u32> = state.charts.data.charts.iter().map(|c| c.order).collect();
  assert_eq!(orders, vec![1, 2, 3]);

  // Moving the edges outward is a no-op.
  state.apply(Action::MoveChartUp("c2".into()));
  state.apply(Action::MoveChartDown("c3".into()));
  let ids: Vec<&str> = state.charts.data.charts.iter().map(|c| c.id.as_str()).collect();
  assert_eq!(ids, vec!["c2", "c1", "c3"]);
}

#[test]
fn card_cap_and_delete_renumbering() {
  let mut state = StateStore::new();

  for i in 0..4 {
    state.apply(Action::AddOverviewCard(card(&format!("k{i}"))));
  }
  state.apply(Action::AddOverviewCard(card("overflow")));
  assert_eq!(state.charts.data.overview_cards.len(), 4);

  state.apply(Action::DeleteOverviewCard("k1".into()));
  let orders: Vec<u32> = state
    .charts
    .data
    .overview_cards
    .iter()
    .map(|c| c.order)
    .collect();
  assert_eq!(orders, vec![1, 2, 3]);
}

// ─── State store: UI bookkeeping ─────────────────────────────────────────────

#[test]
fn loading_and_error_flags_per_slice() {
  let mut state = StateStore::new();

  state.apply(Action::SetLoading(SliceId::Applications, true));
  state.apply(Action::SetError(SliceId::Charts, Some("save failed".into())));

  assert!(state.applications.loading);
  assert!(!state.custom_fields.loading);
  assert_eq!(state.charts.error.as_deref(), Some("save failed"));

  state.apply(Action::SetLoading(SliceId::Applications, false));
  state.apply(Action::SetError(SliceId::Charts, None));
  assert!(!state.applications.loading);
  assert!(state.charts.error.is_none());
}
