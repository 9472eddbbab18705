//! [`SqliteStore`] — the SQLite implementation of [`TrackerStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::OptionalExtension as _;

use huntboard_core::{
  application::{Application, Note},
  chart::{ChartConfigSet, ChartConfig, OverviewCardConfig},
  demo,
  field::CustomField,
  preference::UserPreference,
  session::SessionProvider,
  store::TrackerStore,
};

use crate::{
  encode::{
    RawApplication, RawCustomField, RawNote, decode_theme, encode_data, encode_dt,
    encode_field_type, encode_options, encode_theme, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Encoded rows ────────────────────────────────────────────────────────────

/// An application pre-encoded into column values, ready to move into a
/// connection closure.
struct AppRow {
  id:         String,
  data:       String,
  created_at: String,
  updated_at: String,
  notes:      Vec<NoteRow>,
}

struct NoteRow {
  id:         String,
  content:    String,
  created_at: String,
  updated_at: Option<String>,
}

fn encode_application(app: &Application) -> Result<AppRow> {
  Ok(AppRow {
    id:         app.id.clone(),
    data:       encode_data(&app.data)?,
    created_at: encode_dt(app.created_at),
    updated_at: encode_dt(app.updated_at),
    notes:      app
      .notes
      .iter()
      .map(|n| NoteRow {
        id:         n.id.clone(),
        content:    n.content.clone(),
        created_at: encode_dt(n.created_at),
        updated_at: n.updated_at.map(encode_dt),
      })
      .collect(),
  })
}

fn insert_application(
  conn: &rusqlite::Connection,
  user: &str,
  row: &AppRow,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO applications (id, user_id, data, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![row.id, user, row.data, row.created_at, row.updated_at],
  )?;
  for note in &row.notes {
    conn.execute(
      "INSERT INTO notes (id, application_id, content, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      rusqlite::params![note.id, row.id, note.content, note.created_at, note.updated_at],
    )?;
  }
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Huntboard store backed by a single SQLite file, scoped per user.
///
/// Every operation asks the [`SessionProvider`] for the current user before
/// touching the database; with no session it fails with
/// [`Error::AuthenticationRequired`] and issues no queries. Cloning is cheap,
/// the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore<S> {
  conn:     tokio_rusqlite::Connection,
  sessions: S,
}

impl<S: SessionProvider> SqliteStore<S> {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, sessions: S) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, sessions };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(sessions: S) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, sessions };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The current user as an encoded id column value. Probed fresh per call;
  /// a sign-out between two operations fails the second one.
  async fn require_user(&self) -> Result<String> {
    self
      .sessions
      .current_user()
      .await
      .map(encode_uuid)
      .ok_or(Error::AuthenticationRequired)
  }

  /// Downgrade a post-auth failure to a `false` save result. Matches the
  /// local backend's quota refusals so the router can treat both backends
  /// uniformly.
  fn recover_save(result: Result<()>, collection: &'static str) -> Result<bool> {
    match result {
      Ok(()) => Ok(true),
      Err(Error::AuthenticationRequired) => Err(Error::AuthenticationRequired),
      Err(e) => {
        tracing::warn!(collection, error = %e, "save failed");
        Ok(false)
      }
    }
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn fetch_applications(&self, user: String) -> Result<Vec<Application>> {
    type NoteRows = Vec<(String, RawNote)>;

    let (raw_apps, raw_notes): (Vec<RawApplication>, NoteRows) = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, data, created_at, updated_at FROM applications
           WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let raw_apps = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawApplication {
              id:         row.get(0)?,
              data:       row.get(1)?,
              created_at: row.get(2)?,
              updated_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // Notes are best-effort: a failure here degrades to applications
        // without notes rather than failing the whole load.
        let notes_result = (|| -> rusqlite::Result<NoteRows> {
          let mut stmt = conn.prepare(
            "SELECT application_id, id, content, created_at, updated_at FROM notes
             WHERE application_id IN (SELECT id FROM applications WHERE user_id = ?1)
             ORDER BY created_at ASC",
          )?;
          stmt
            .query_map(rusqlite::params![user], |row| {
              Ok((
                row.get(0)?,
                RawNote {
                  id:         row.get(1)?,
                  content:    row.get(2)?,
                  created_at: row.get(3)?,
                  updated_at: row.get(4)?,
                },
              ))
            })?
            .collect()
        })();

        let raw_notes = match notes_result {
          Ok(rows) => rows,
          Err(e) => {
            tracing::warn!(error = %e, "failed to load notes, returning applications without them");
            Vec::new()
          }
        };

        Ok((raw_apps, raw_notes))
      })
      .await?;

    let mut notes_by_app: HashMap<String, Vec<Note>> = HashMap::new();
    for (app_id, raw) in raw_notes {
      notes_by_app.entry(app_id).or_default().push(raw.into_note()?);
    }

    raw_apps
      .into_iter()
      .map(|raw| {
        let notes = notes_by_app.remove(&raw.id).unwrap_or_default();
        raw.into_application(notes)
      })
      .collect()
  }

  async fn insert_one(&self, user: String, app: &Application) -> Result<()> {
    let row = encode_application(app)?;
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_application(&tx, &user, &row)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_all(&self, user: String, apps: &[Application]) -> Result<()> {
    let rows = apps.iter().map(encode_application).collect::<Result<Vec<_>>>()?;
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // ON DELETE CASCADE clears the notes of every deleted row.
        tx.execute(
          "DELETE FROM applications WHERE user_id = ?1",
          rusqlite::params![user],
        )?;
        for row in &rows {
          insert_application(&tx, &user, row)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl<S: SessionProvider> TrackerStore for SqliteStore<S> {
  type Error = Error;

  async fn load_applications(&self) -> Result<Vec<Application>> {
    let user = self.require_user().await?;
    self.fetch_applications(user).await
  }

  async fn save_application(&self, application: Application) -> Result<Application> {
    let user = self.require_user().await?;
    self.insert_one(user, &application).await?;
    Ok(application)
  }

  /// Notes are replaced wholesale with the incoming set, matching the
  /// replace-all contract at the per-record level.
  async fn update_application(&self, application: Application) -> Result<Application> {
    let user = self.require_user().await?;
    let row = encode_application(&application)?;

    let updated: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "UPDATE applications SET data = ?1, updated_at = ?2
           WHERE id = ?3 AND user_id = ?4",
          rusqlite::params![row.data, row.updated_at, row.id, user],
        )?;
        if n == 0 {
          return Ok(false);
        }
        tx.execute(
          "DELETE FROM notes WHERE application_id = ?1",
          rusqlite::params![row.id],
        )?;
        for note in &row.notes {
          tx.execute(
            "INSERT INTO notes (id, application_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![note.id, row.id, note.content, note.created_at, note.updated_at],
          )?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !updated {
      return Err(Error::ApplicationNotFound(application.id));
    }
    Ok(application)
  }

  async fn delete_application(&self, id: &str) -> Result<()> {
    let user = self.require_user().await?;
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM applications WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id, user],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn save_applications(&self, applications: &[Application]) -> Result<bool> {
    let user = self.require_user().await?;
    Self::recover_save(self.replace_all(user, applications).await, "applications")
  }

  async fn load_custom_fields(&self) -> Result<Vec<CustomField>> {
    let user = self.require_user().await?;

    let raws: Vec<RawCustomField> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, field_type, required, field_order, show_in_table, options
           FROM custom_fields WHERE user_id = ?1 ORDER BY field_order ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawCustomField {
              id:            row.get(0)?,
              name:          row.get(1)?,
              field_type:    row.get(2)?,
              required:      row.get(3)?,
              field_order:   row.get(4)?,
              show_in_table: row.get(5)?,
              options:       row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCustomField::into_field).collect()
  }

  async fn save_custom_fields(&self, fields: &[CustomField]) -> Result<bool> {
    let user = self.require_user().await?;

    let rows = fields
      .iter()
      .map(|f| {
        Ok((
          f.id.clone(),
          f.name.clone(),
          encode_field_type(f.field_type).to_owned(),
          f.required,
          f.order,
          f.show_in_table,
          f.options.as_deref().map(encode_options).transpose()?,
        ))
      })
      .collect::<Result<Vec<_>>>()?;

    let result: Result<()> = async {
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;
          tx.execute(
            "DELETE FROM custom_fields WHERE user_id = ?1",
            rusqlite::params![user],
          )?;
          for (id, name, field_type, required, order, show, options) in &rows {
            tx.execute(
              "INSERT INTO custom_fields (
                 id, user_id, name, field_type, required, field_order, show_in_table, options
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
              rusqlite::params![id, user, name, field_type, required, order, show, options],
            )?;
          }
          tx.commit()?;
          Ok(())
        })
        .await?;
      Ok(())
    }
    .await;

    Self::recover_save(result, "custom_fields")
  }

  async fn load_preferences(&self) -> Result<UserPreference> {
    let user = self.require_user().await?;

    let raw: Option<(String, u32)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT theme, default_pagination FROM preferences WHERE user_id = ?1",
              rusqlite::params![user],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some((theme, default_pagination)) => Ok(UserPreference {
        theme: decode_theme(&theme)?,
        default_pagination,
      }),
      None => Ok(UserPreference::default()),
    }
  }

  async fn save_preferences(&self, preferences: &UserPreference) -> Result<bool> {
    let user = self.require_user().await?;
    let theme = encode_theme(preferences.theme).to_owned();
    let pagination = preferences.default_pagination;

    let result: Result<()> = async {
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO preferences (user_id, theme, default_pagination)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
               theme = excluded.theme,
               default_pagination = excluded.default_pagination",
            rusqlite::params![user, theme, pagination],
          )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
    .await;

    Self::recover_save(result, "preferences")
  }

  async fn load_chart_configs(&self) -> Result<ChartConfigSet> {
    let user = self.require_user().await?;

    let raw: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT charts, overview_cards FROM chart_configs WHERE user_id = ?1",
              rusqlite::params![user],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some((charts, cards)) => {
        let charts: Vec<ChartConfig> = serde_json::from_str(&charts)?;
        let overview_cards: Vec<OverviewCardConfig> = serde_json::from_str(&cards)?;
        Ok(ChartConfigSet { charts, overview_cards })
      }
      None => Ok(ChartConfigSet::default()),
    }
  }

  async fn save_chart_configs(&self, configs: &ChartConfigSet) -> Result<bool> {
    let user = self.require_user().await?;
    let charts = serde_json::to_string(&configs.charts)?;
    let cards = serde_json::to_string(&configs.overview_cards)?;

    let result: Result<()> = async {
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO chart_configs (user_id, charts, overview_cards)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
               charts = excluded.charts,
               overview_cards = excluded.overview_cards",
            rusqlite::params![user, charts, cards],
          )?;
          Ok(())
        })
        .await?;
      Ok(())
    }
    .await;

    Self::recover_save(result, "chart_configs")
  }

  /// The remote side keeps no explicit marker; an account with no
  /// applications, no custom fields, and no chart configs has never stored
  /// anything here.
  async fn is_first_visit(&self) -> Result<bool> {
    let user = self.require_user().await?;

    let (apps, fields, charts): (i64, i64, i64) = self
      .conn
      .call(move |conn| {
        let apps: i64 = conn.query_row(
          "SELECT COUNT(*) FROM applications WHERE user_id = ?1",
          rusqlite::params![user],
          |row| row.get(0),
        )?;
        let fields: i64 = conn.query_row(
          "SELECT COUNT(*) FROM custom_fields WHERE user_id = ?1",
          rusqlite::params![user],
          |row| row.get(0),
        )?;
        let charts: i64 = conn.query_row(
          "SELECT COUNT(*) FROM chart_configs WHERE user_id = ?1",
          rusqlite::params![user],
          |row| row.get(0),
        )?;
        Ok((apps, fields, charts))
      })
      .await?;

    Ok(apps == 0 && fields == 0 && charts == 0)
  }

  async fn load_demo_data(&self) -> Result<bool> {
    let mut ok = self.save_applications(&demo::demo_applications()).await?;
    ok &= self.save_custom_fields(&demo::demo_custom_fields()).await?;
    ok &= self.save_chart_configs(&demo::demo_chart_configs()).await?;
    ok &= self.save_preferences(&demo::demo_preferences()).await?;
    Ok(ok)
  }
}
