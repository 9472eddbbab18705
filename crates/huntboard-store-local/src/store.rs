//! [`LocalStore`] — the file-backed implementation of [`TrackerStore`].

use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use huntboard_core::{
  application::Application,
  chart::ChartConfigSet,
  demo,
  field::{CustomField, default_fields},
  preference::UserPreference,
  store::TrackerStore,
};

use crate::{Error, Result};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// The fixed keys (file names) the store persists under.
mod keys {
  pub const APPLICATIONS: &str = "applications.json";
  pub const CUSTOM_FIELDS: &str = "custom_fields.json";
  pub const PREFERENCES: &str = "preferences.json";
  pub const CHART_CONFIGS: &str = "chart_configs.json";
  /// Boolean marker; deliberately excluded from "clear all data".
  pub const FIRST_VISIT: &str = "first_visit";

  /// The data keys counted against the capacity and wiped by a reset.
  pub const DATA: [&str; 4] = [APPLICATIONS, CUSTOM_FIELDS, PREFERENCES, CHART_CONFIGS];
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Huntboard store backed by JSON files in a single directory.
///
/// All operations run synchronously; the [`TrackerStore`] impl wraps them in
/// immediately-ready futures so both backends share one contract.
#[derive(Debug, Clone)]
pub struct LocalStore {
  dir:      PathBuf,
  capacity: Option<u64>,
}

impl LocalStore {
  /// Open (or create) a store rooted at `dir`, with no capacity limit.
  pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
    fs::create_dir_all(dir.as_ref())?;
    Ok(Self { dir: dir.as_ref().to_owned(), capacity: None })
  }

  /// Open a store whose data keys may not exceed `capacity` bytes in total.
  /// Stands in for the storage quota of the original medium.
  pub fn with_capacity(dir: impl AsRef<Path>, capacity: u64) -> Result<Self> {
    let mut store = Self::open(dir)?;
    store.capacity = Some(capacity);
    Ok(store)
  }

  /// Probe whether the backing directory is writable at all.
  pub fn is_available(&self) -> bool {
    let probe = self.dir.join(".probe");
    let ok = fs::write(&probe, b"probe").is_ok();
    let _ = fs::remove_file(&probe);
    ok
  }

  // ── Raw key access ────────────────────────────────────────────────────────

  /// Read and deserialise a key. Missing and malformed data both read as
  /// absent; malformed data additionally logs a warning.
  fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let bytes = fs::read(self.dir.join(key)).ok()?;
    match serde_json::from_slice(&bytes) {
      Ok(value) => Some(value),
      Err(e) => {
        tracing::warn!(key, error = %e, "malformed local data, falling back to default");
        None
      }
    }
  }

  fn write_key(&self, key: &str, payload: &[u8]) -> Result<()> {
    if let Some(capacity) = self.capacity {
      let others: u64 = keys::DATA
        .iter()
        .filter(|k| **k != key)
        .map(|k| fs::metadata(self.dir.join(k)).map_or(0, |m| m.len()))
        .sum();
      let needed = others + payload.len() as u64;
      if needed > capacity {
        return Err(Error::QuotaExceeded { needed, capacity });
      }
    }
    fs::write(self.dir.join(key), payload)?;
    Ok(())
  }

  /// Serialise and write a key. A capacity refusal reports `false`; hard
  /// faults propagate.
  fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<bool> {
    let payload = serde_json::to_vec_pretty(value)?;
    match self.write_key(key, &payload) {
      Ok(()) => Ok(true),
      Err(Error::QuotaExceeded { needed, capacity }) => {
        tracing::warn!(key, needed, capacity, "write refused: storage capacity exceeded");
        Ok(false)
      }
      Err(e) => Err(e),
    }
  }

  // ── Collections ───────────────────────────────────────────────────────────

  fn applications(&self) -> Vec<Application> {
    self.read_key(keys::APPLICATIONS).unwrap_or_default()
  }

  fn write_applications(&self, applications: &[Application]) -> Result<bool> {
    self.write_json(keys::APPLICATIONS, &applications)
  }

  /// Custom fields, or the built-in default set when none were ever saved.
  /// Records persisted before `show_in_table` existed deserialise with it
  /// set to `true` (read-time migration; nothing is rewritten).
  fn custom_fields(&self) -> Vec<CustomField> {
    self.read_key(keys::CUSTOM_FIELDS).unwrap_or_else(default_fields)
  }

  fn write_custom_fields(&self, fields: &[CustomField]) -> Result<bool> {
    self.write_json(keys::CUSTOM_FIELDS, &fields)
  }

  fn preferences(&self) -> UserPreference {
    self.read_key(keys::PREFERENCES).unwrap_or_default()
  }

  fn write_preferences(&self, preferences: &UserPreference) -> Result<bool> {
    self.write_json(keys::PREFERENCES, preferences)
  }

  fn chart_configs(&self) -> ChartConfigSet {
    self.read_key(keys::CHART_CONFIGS).unwrap_or_default()
  }

  fn write_chart_configs(&self, configs: &ChartConfigSet) -> Result<bool> {
    self.write_json(keys::CHART_CONFIGS, configs)
  }

  // ── First visit & lifecycle ───────────────────────────────────────────────

  /// First visit means the marker has never been written.
  pub fn first_visit(&self) -> bool {
    !self.dir.join(keys::FIRST_VISIT).exists()
  }

  pub fn mark_first_visit_complete(&self) -> Result<()> {
    fs::write(self.dir.join(keys::FIRST_VISIT), b"true")?;
    Ok(())
  }

  /// Seed custom fields and preferences when absent. Applications start
  /// empty and need no initialisation.
  pub fn initialize_default_data(&self) -> Result<()> {
    if !self.dir.join(keys::CUSTOM_FIELDS).exists() {
      self.write_custom_fields(&default_fields())?;
    }
    if !self.dir.join(keys::PREFERENCES).exists() {
      self.write_preferences(&UserPreference::default())?;
    }
    Ok(())
  }

  /// Start with the default schema and no applications.
  pub fn start_from_scratch(&self) -> Result<()> {
    self.write_applications(&[])?;
    self.write_custom_fields(&default_fields())?;
    self.write_chart_configs(&ChartConfigSet::default())?;
    self.write_preferences(&UserPreference::default())?;
    self.mark_first_visit_complete()
  }

  /// Remove the four data keys. The first-visit marker survives a reset.
  pub fn clear_all_data(&self) -> Result<()> {
    for key in keys::DATA {
      let path = self.dir.join(key);
      if path.exists() {
        fs::remove_file(path)?;
      }
    }
    Ok(())
  }

  fn seed_demo_data(&self) -> Result<bool> {
    let mut ok = self.write_applications(&demo::demo_applications())?;
    ok &= self.write_custom_fields(&demo::demo_custom_fields())?;
    ok &= self.write_chart_configs(&demo::demo_chart_configs())?;
    ok &= self.write_preferences(&demo::demo_preferences())?;
    self.mark_first_visit_complete()?;
    Ok(ok)
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for LocalStore {
  type Error = Error;

  async fn load_applications(&self) -> Result<Vec<Application>> {
    Ok(self.applications())
  }

  /// Append to the existing collection; the input echoes back unchanged.
  async fn save_application(&self, application: Application) -> Result<Application> {
    let mut all = self.applications();
    all.push(application.clone());
    self.write_applications(&all)?;
    Ok(application)
  }

  async fn update_application(&self, application: Application) -> Result<Application> {
    let mut all = self.applications();
    for slot in all.iter_mut() {
      if slot.id == application.id {
        *slot = application.clone();
      }
    }
    self.write_applications(&all)?;
    Ok(application)
  }

  async fn delete_application(&self, id: &str) -> Result<()> {
    let mut all = self.applications();
    all.retain(|app| app.id != id);
    self.write_applications(&all)?;
    Ok(())
  }

  async fn save_applications(&self, applications: &[Application]) -> Result<bool> {
    self.write_applications(applications)
  }

  async fn load_custom_fields(&self) -> Result<Vec<CustomField>> {
    Ok(self.custom_fields())
  }

  async fn save_custom_fields(&self, fields: &[CustomField]) -> Result<bool> {
    self.write_custom_fields(fields)
  }

  async fn load_preferences(&self) -> Result<UserPreference> {
    Ok(self.preferences())
  }

  async fn save_preferences(&self, preferences: &UserPreference) -> Result<bool> {
    self.write_preferences(preferences)
  }

  async fn load_chart_configs(&self) -> Result<ChartConfigSet> {
    Ok(self.chart_configs())
  }

  async fn save_chart_configs(&self, configs: &ChartConfigSet) -> Result<bool> {
    self.write_chart_configs(configs)
  }

  async fn is_first_visit(&self) -> Result<bool> {
    Ok(self.first_visit())
  }

  async fn load_demo_data(&self) -> Result<bool> {
    self.seed_demo_data()
  }
}
