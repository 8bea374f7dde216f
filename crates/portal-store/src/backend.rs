//! Storage backend trait and the persisted record shape.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::types::User;

/// The record a backend persists for an authenticated session.
///
/// A backend either holds a complete record or nothing; there is no
/// partial state. `remember_me` is only ever `true` for records written
/// to the durable backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Opaque bearer token.
    pub token: String,
    /// Serialized user profile.
    pub user: User,
    /// Absolute expiry timestamp, if the server supplied one.
    pub token_expires_at: Option<DateTime<Utc>>,
    /// Durability marker written by "remember me" logins.
    pub remember_me: bool,
}

/// A single session persistence backend.
///
/// Operations are infallible by contract: a failing save or load is
/// logged by the implementation and observed by callers as absence.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persist the record, replacing any previous one.
    async fn save(&self, record: &StoredSession);

    /// Return the stored record, or `None` if absent or unreadable.
    async fn load(&self) -> Option<StoredSession>;

    /// Remove any stored record. Idempotent.
    async fn clear(&self);
}
