//! [`SyncRouter`] — authentication-aware dispatch between the two backends.

use huntboard_core::{
  application::Application,
  chart::ChartConfigSet,
  field::CustomField,
  preference::UserPreference,
  session::SessionProvider,
  store::TrackerStore,
};
use huntboard_store_local::LocalStore;
use huntboard_store_sqlite::SqliteStore;

use crate::Result;

/// Which backend the router would use for the next operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// A session exists; operations go to the remote SQLite store.
  Authenticated,
  /// No session; operations go to the local file store.
  Demo,
}

/// Routes every persistence operation to the remote store when a session
/// exists and to the local store otherwise.
///
/// The session is probed fresh on every call, never cached: a sign-in or
/// sign-out between two operations changes where the second one lands. The
/// two backends are not reconciled; whichever is active is authoritative.
#[derive(Clone)]
pub struct SyncRouter<S> {
  local:    LocalStore,
  remote:   SqliteStore<S>,
  sessions: S,
}

impl<S: SessionProvider + Clone> SyncRouter<S> {
  pub fn new(local: LocalStore, remote: SqliteStore<S>, sessions: S) -> Self {
    Self { local, remote, sessions }
  }

  /// Whether a session exists right now. Probed fresh, never cached.
  pub async fn is_authenticated(&self) -> bool {
    let authenticated = self.sessions.current_user().await.is_some();
    tracing::debug!(authenticated, "routing");
    authenticated
  }

  pub async fn current_mode(&self) -> Mode {
    if self.is_authenticated().await {
      Mode::Authenticated
    } else {
      Mode::Demo
    }
  }

  // ── Applications ──────────────────────────────────────────────────────────

  pub async fn load_applications(&self) -> Result<Vec<Application>> {
    if self.is_authenticated().await {
      Ok(self.remote.load_applications().await?)
    } else {
      Ok(self.local.load_applications().await?)
    }
  }

  pub async fn save_application(&self, application: Application) -> Result<Application> {
    if self.is_authenticated().await {
      Ok(self.remote.save_application(application).await?)
    } else {
      Ok(self.local.save_application(application).await?)
    }
  }

  pub async fn update_application(&self, application: Application) -> Result<Application> {
    if self.is_authenticated().await {
      Ok(self.remote.update_application(application).await?)
    } else {
      Ok(self.local.update_application(application).await?)
    }
  }

  pub async fn delete_application(&self, id: &str) -> Result<()> {
    if self.is_authenticated().await {
      Ok(self.remote.delete_application(id).await?)
    } else {
      Ok(self.local.delete_application(id).await?)
    }
  }

  pub async fn save_applications(&self, applications: &[Application]) -> Result<bool> {
    if self.is_authenticated().await {
      Ok(self.remote.save_applications(applications).await?)
    } else {
      Ok(self.local.save_applications(applications).await?)
    }
  }

  // ── Custom fields ─────────────────────────────────────────────────────────

  pub async fn load_custom_fields(&self) -> Result<Vec<CustomField>> {
    if self.is_authenticated().await {
      Ok(self.remote.load_custom_fields().await?)
    } else {
      Ok(self.local.load_custom_fields().await?)
    }
  }

  pub async fn save_custom_fields(&self, fields: &[CustomField]) -> Result<bool> {
    if self.is_authenticated().await {
      Ok(self.remote.save_custom_fields(fields).await?)
    } else {
      Ok(self.local.save_custom_fields(fields).await?)
    }
  }

  // ── Preferences ───────────────────────────────────────────────────────────

  pub async fn load_preferences(&self) -> Result<UserPreference> {
    if self.is_authenticated().await {
      Ok(self.remote.load_preferences().await?)
    } else {
      Ok(self.local.load_preferences().await?)
    }
  }

  pub async fn save_preferences(&self, preferences: &UserPreference) -> Result<bool> {
    if self.is_authenticated().await {
      Ok(self.remote.save_preferences(preferences).await?)
    } else {
      Ok(self.local.save_preferences(preferences).await?)
    }
  }

  // ── Chart configs ─────────────────────────────────────────────────────────

  pub async fn load_chart_configs(&self) -> Result<ChartConfigSet> {
    if self.is_authenticated().await {
      Ok(self.remote.load_chart_configs().await?)
    } else {
      Ok(self.local.load_chart_configs().await?)
    }
  }

  pub async fn save_chart_configs(&self, configs: &ChartConfigSet) -> Result<bool> {
    if self.is_authenticated().await {
      Ok(self.remote.save_chart_configs(configs).await?)
    } else {
      Ok(self.local.save_chart_configs(configs).await?)
    }
  }

  // ── First visit & seeding ─────────────────────────────────────────────────

  pub async fn is_first_visit(&self) -> Result<bool> {
    if self.is_authenticated().await {
      Ok(self.remote.is_first_visit().await?)
    } else {
      Ok(self.local.is_first_visit().await?)
    }
  }

  pub async fn load_demo_data(&self) -> Result<bool> {
    if self.is_authenticated().await {
      Ok(self.remote.load_demo_data().await?)
    } else {
      Ok(self.local.load_demo_data().await?)
    }
  }

  // ── Demo-only lifecycle ───────────────────────────────────────────────────
  //
  // These operate on the local device state regardless of authentication;
  // the remote side has no notion of them.

  pub fn mark_first_visit_complete(&self) -> Result<()> {
    Ok(self.local.mark_first_visit_complete()?)
  }

  pub fn initialize_default_data(&self) -> Result<()> {
    Ok(self.local.initialize_default_data()?)
  }

  pub fn start_from_scratch(&self) -> Result<()> {
    Ok(self.local.start_from_scratch()?)
  }

  pub fn clear_all_data(&self) -> Result<()> {
    Ok(self.local.clear_all_data()?)
  }
}
