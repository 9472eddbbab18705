//! The `TrackerStore` trait — the contract both persistence backends honour.
//!
//! The trait is implemented by storage backends (`huntboard-store-local`,
//! `huntboard-store-sqlite`). The sync router depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  application::Application,
  chart::ChartConfigSet,
  field::CustomField,
  preference::UserPreference,
};

/// Abstraction over a Huntboard persistence backend.
///
/// Bulk `save_*` operations are replace-all: the backend discards its prior
/// collection and persists exactly what it is given, so callers must pass the
/// complete desired collection, never a delta. Calling them twice with the
/// same input leaves the same persisted state both times.
///
/// `save_*` operations returning `bool` report recoverable write refusals
/// (e.g. a local capacity limit) as `Ok(false)`; hard faults are errors.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Applications ──────────────────────────────────────────────────────

  /// Load every application, newest first.
  fn load_applications(
    &self,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  /// Persist a new application and return it as stored (a backend may
  /// normalise server-assigned fields).
  fn save_application(
    &self,
    application: Application,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Replace an existing application (matched by id), notes included.
  fn update_application(
    &self,
    application: Application,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Delete an application; its notes go with it.
  fn delete_application<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Replace the whole collection (delete-all-then-reinsert).
  fn save_applications<'a>(
    &'a self,
    applications: &'a [Application],
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Custom fields ─────────────────────────────────────────────────────

  fn load_custom_fields(
    &self,
  ) -> impl Future<Output = Result<Vec<CustomField>, Self::Error>> + Send + '_;

  fn save_custom_fields<'a>(
    &'a self,
    fields: &'a [CustomField],
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Preferences ───────────────────────────────────────────────────────

  fn load_preferences(
    &self,
  ) -> impl Future<Output = Result<UserPreference, Self::Error>> + Send + '_;

  fn save_preferences<'a>(
    &'a self,
    preferences: &'a UserPreference,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Chart configs ─────────────────────────────────────────────────────

  fn load_chart_configs(
    &self,
  ) -> impl Future<Output = Result<ChartConfigSet, Self::Error>> + Send + '_;

  fn save_chart_configs<'a>(
    &'a self,
    configs: &'a ChartConfigSet,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── First visit & seeding ─────────────────────────────────────────────

  /// Whether this user/device has no persisted domain data yet. How that is
  /// decided is backend-specific: the local backend keeps an explicit
  /// marker, the remote backend checks all collections for emptiness.
  fn is_first_visit(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Seed the backend with the built-in demo data set.
  fn load_demo_data(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
