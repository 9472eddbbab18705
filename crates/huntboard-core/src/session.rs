//! The `SessionProvider` trait — the authentication collaborator.
//!
//! The real provider is an external identity service; this crate only needs
//! to know whether a session exists right now and which user id it carries.
//! Routing decisions probe the provider on every call because sessions can
//! appear or vanish between calls (sign-in/out in another tab).

use std::{
  future::Future,
  sync::{Arc, Mutex},
};

use uuid::Uuid;

/// Supplies the current authentication state. Must be probed fresh per
/// operation; implementations should not be wrapped in caches.
pub trait SessionProvider: Send + Sync {
  /// The signed-in user's id, or `None` when unauthenticated.
  fn current_user(&self) -> impl Future<Output = Option<Uuid>> + Send + '_;
}

/// An in-process provider whose session can be flipped at runtime. Used by
/// tests and the demo binary; a production deployment wires in a real
/// identity service instead.
#[derive(Debug, Clone, Default)]
pub struct StaticSessions {
  user: Arc<Mutex<Option<Uuid>>>,
}

impl StaticSessions {
  /// Start signed out.
  pub fn signed_out() -> Self {
    Self::default()
  }

  /// Start signed in as `user`.
  pub fn signed_in(user: Uuid) -> Self {
    Self { user: Arc::new(Mutex::new(Some(user))) }
  }

  pub fn sign_in(&self, user: Uuid) {
    *self.user.lock().expect("session lock") = Some(user);
  }

  pub fn sign_out(&self) {
    *self.user.lock().expect("session lock") = None;
  }
}

impl SessionProvider for StaticSessions {
  async fn current_user(&self) -> Option<Uuid> {
    *self.user.lock().expect("session lock")
  }
}
