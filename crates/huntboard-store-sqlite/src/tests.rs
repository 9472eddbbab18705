//! Integration tests for `SqliteStore` against an in-memory database.

use tempfile::tempdir;
use uuid::Uuid;

use huntboard_core::{
  application::{Application, FieldValue, Note},
  chart::default_overview_cards,
  field::default_fields,
  preference::{Theme, UserPreference},
  session::StaticSessions,
  store::TrackerStore,
};

use crate::{Error, SqliteStore};

async fn store() -> (SqliteStore<StaticSessions>, StaticSessions) {
  let sessions = StaticSessions::signed_in(Uuid::new_v4());
  let store = SqliteStore::open_in_memory(sessions.clone())
    .await
    .expect("in-memory store");
  (store, sessions)
}

fn application(id: &str, company: &str) -> Application {
  let mut app = Application::new(id);
  app
    .data
    .insert("companyName".into(), FieldValue::Text(company.into()));
  app
}

// ─── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthenticated_reads_fail() {
  let (s, sessions) = store().await;
  sessions.sign_out();

  assert!(matches!(
    s.load_applications().await,
    Err(Error::AuthenticationRequired)
  ));
  assert!(matches!(
    s.load_preferences().await,
    Err(Error::AuthenticationRequired)
  ));
}

#[tokio::test]
async fn sign_out_between_calls_fails_the_second_call() {
  let (s, sessions) = store().await;

  s.save_application(application("a1", "Acme")).await.unwrap();

  sessions.sign_out();
  assert!(matches!(
    s.save_application(application("a2", "Globex")).await,
    Err(Error::AuthenticationRequired)
  ));

  sessions.sign_in(Uuid::new_v4());
  // A different user sees none of the first user's rows.
  assert!(s.load_applications().await.unwrap().is_empty());
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_load_applications() {
  let (s, _) = store().await;

  let mut app = application("a1", "Acme");
  app.notes.push(Note::new("n1", "phone screen went well"));
  s.save_application(app.clone()).await.unwrap();

  let loaded = s.load_applications().await.unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0].id, "a1");
  assert_eq!(loaded[0].data, app.data);
  assert_eq!(loaded[0].notes.len(), 1);
  assert_eq!(loaded[0].notes[0].content, "phone screen went well");
}

#[tokio::test]
async fn update_replaces_notes_wholesale() {
  let (s, _) = store().await;

  let mut app = application("a1", "Acme");
  app.notes.push(Note::new("n1", "first note"));
  app.notes.push(Note::new("n2", "second note"));
  s.save_application(app.clone()).await.unwrap();

  app.notes.retain(|n| n.id != "n1");
  app.notes.push(Note::new("n3", "third note"));
  s.update_application(app).await.unwrap();

  let loaded = s.load_applications().await.unwrap();
  let ids: Vec<&str> = loaded[0].notes.iter().map(|n| n.id.as_str()).collect();
  assert_eq!(ids, vec!["n2", "n3"]);
}

#[tokio::test]
async fn broken_notes_table_degrades_to_empty_notes() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("tracker.sqlite");
  let sessions = StaticSessions::signed_in(Uuid::new_v4());
  let s = SqliteStore::open(&path, sessions).await.unwrap();

  let mut app = application("a1", "Acme");
  app.notes.push(Note::new("n1", "recruiter call"));
  s.save_application(app).await.unwrap();

  // Break the notes fetch behind the store's back.
  let raw = rusqlite::Connection::open(&path).unwrap();
  raw.execute_batch("DROP TABLE notes").unwrap();
  drop(raw);

  // The applications still load; only their notes are gone.
  let loaded = s.load_applications().await.unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0].id, "a1");
  assert!(loaded[0].notes.is_empty());
}

#[tokio::test]
async fn updating_a_missing_application_errors() {
  let (s, _) = store().await;

  let err = s.update_application(application("ghost", "Acme")).await;
  assert!(matches!(err, Err(Error::ApplicationNotFound(id)) if id == "ghost"));
}

#[tokio::test]
async fn delete_cascades_to_notes() {
  let (s, _) = store().await;

  let mut app = application("a1", "Acme");
  app.notes.push(Note::new("n1", "note"));
  s.save_application(app).await.unwrap();

  s.delete_application("a1").await.unwrap();
  assert!(s.load_applications().await.unwrap().is_empty());

  // A fresh insert under the same note id must not hit a stale row.
  let mut again = application("a2", "Globex");
  again.notes.push(Note::new("n1", "new note"));
  s.save_application(again).await.unwrap();
  assert_eq!(s.load_applications().await.unwrap()[0].notes.len(), 1);
}

#[tokio::test]
async fn bulk_save_replaces_the_whole_collection() {
  let (s, _) = store().await;

  s.save_application(application("old", "Old Corp")).await.unwrap();

  let replacement = vec![application("a1", "Acme"), application("a2", "Globex")];
  assert!(s.save_applications(&replacement).await.unwrap());

  let loaded = s.load_applications().await.unwrap();
  let mut ids: Vec<&str> = loaded.iter().map(|a| a.id.as_str()).collect();
  ids.sort_unstable();
  assert_eq!(ids, vec!["a1", "a2"]);

  // Saving the same collection again changes nothing; the reinsert does not
  // collide with the rows it just deleted.
  assert!(s.save_applications(&replacement).await.unwrap());
  let again = s.load_applications().await.unwrap();
  let mut ids: Vec<&str> = again.iter().map(|a| a.id.as_str()).collect();
  ids.sort_unstable();
  assert_eq!(ids, vec!["a1", "a2"]);
}

// ─── Custom fields ───────────────────────────────────────────────────────────

#[tokio::test]
async fn custom_fields_round_trip_in_order() {
  let (s, _) = store().await;

  let fields = default_fields();
  assert!(s.save_custom_fields(&fields).await.unwrap());
  assert_eq!(s.load_custom_fields().await.unwrap(), fields);
}

#[tokio::test]
async fn empty_custom_fields_load_as_empty_not_default() {
  let (s, _) = store().await;
  // Unlike the local backend, the remote store has no built-in fallback.
  assert!(s.load_custom_fields().await.unwrap().is_empty());
}

// ─── Preferences & chart configs ─────────────────────────────────────────────

#[tokio::test]
async fn preferences_default_then_upsert() {
  let (s, _) = store().await;

  assert_eq!(s.load_preferences().await.unwrap(), UserPreference::default());

  let prefs = UserPreference { theme: Theme::Dark, default_pagination: 50 };
  assert!(s.save_preferences(&prefs).await.unwrap());
  assert_eq!(s.load_preferences().await.unwrap(), prefs);

  let prefs = UserPreference { theme: Theme::Light, default_pagination: 10 };
  assert!(s.save_preferences(&prefs).await.unwrap());
  assert_eq!(s.load_preferences().await.unwrap(), prefs);
}

#[tokio::test]
async fn chart_configs_round_trip() {
  let (s, _) = store().await;

  let mut configs = s.load_chart_configs().await.unwrap();
  assert!(configs.charts.is_empty());

  configs.overview_cards = default_overview_cards(chrono::Utc::now());
  assert!(s.save_chart_configs(&configs).await.unwrap());
  assert_eq!(s.load_chart_configs().await.unwrap(), configs);
}

// ─── First visit & demo data ─────────────────────────────────────────────────

#[tokio::test]
async fn first_visit_until_anything_is_stored() {
  let (s, _) = store().await;

  assert!(s.is_first_visit().await.unwrap());

  s.save_custom_fields(&default_fields()).await.unwrap();
  assert!(!s.is_first_visit().await.unwrap());
}

#[tokio::test]
async fn demo_data_seeds_every_collection() {
  let (s, _) = store().await;

  assert!(s.load_demo_data().await.unwrap());
  assert!(!s.is_first_visit().await.unwrap());
  assert!(!s.load_applications().await.unwrap().is_empty());
  assert!(!s.load_custom_fields().await.unwrap().is_empty());
  assert!(!s.load_chart_configs().await.unwrap().charts.is_empty());
}

#[tokio::test]
async fn users_are_isolated() {
  let (s, sessions) = store().await;

  s.load_demo_data().await.unwrap();

  sessions.sign_in(Uuid::new_v4());
  assert!(s.is_first_visit().await.unwrap());
  assert!(s.load_applications().await.unwrap().is_empty());
}
