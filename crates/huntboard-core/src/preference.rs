//! User preferences — a singleton per user (remote) or device (local).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreference {
  pub theme:              Theme,
  /// Page size for the applications table.
  pub default_pagination: u32,
}

impl Default for UserPreference {
  fn default() -> Self {
    Self {
      theme:              Theme::Light,
      default_pagination: 20,
    }
  }
}
