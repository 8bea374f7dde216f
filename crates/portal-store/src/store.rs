//! The token store facade over the volatile and durable backends.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use portal_core::types::{SessionData, User};

use super::backend::{StorageBackend, StoredSession};
use super::file::FileBackend;
use super::memory::MemoryBackend;

/// Facade enforcing the one-live-copy invariant across both backends.
///
/// All persistence goes through [`save`](TokenStore::save) and
/// [`clear`](TokenStore::clear); nothing else writes the backends, so a
/// record can never exist in both at once.
#[derive(Clone)]
pub struct TokenStore {
    /// Cleared at process end.
    volatile: Arc<dyn StorageBackend>,
    /// Survives process restart.
    durable: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish()
    }
}

impl TokenStore {
    /// Create a store with the default backends: in-memory volatile and
    /// a JSON file at `storage_path` for the durable side.
    pub fn new(storage_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            volatile: Arc::new(MemoryBackend::new()),
            durable: Arc::new(FileBackend::new(storage_path)),
        }
    }

    /// Create a store over explicit backends. Used by tests.
    pub fn with_backends(
        volatile: Arc<dyn StorageBackend>,
        durable: Arc<dyn StorageBackend>,
    ) -> Self {
        Self { volatile, durable }
    }

    /// Persist a session into the backend selected by `persistent` and
    /// erase any stale copy from the other backend.
    pub async fn save(
        &self,
        token: &str,
        user: &User,
        expires_at: Option<DateTime<Utc>>,
        persistent: bool,
    ) {
        let record = StoredSession {
            token: token.to_string(),
            user: user.clone(),
            token_expires_at: expires_at,
            remember_me: persistent,
        };

        if persistent {
            self.durable.save(&record).await;
            self.volatile.clear().await;
        } else {
            self.volatile.save(&record).await;
            self.durable.clear().await;
        }
        debug!(persistent, "Session persisted");
    }

    /// Load the live session, checking the volatile backend first.
    ///
    /// Returns an empty [`SessionData`] if neither backend holds a token.
    pub async fn load(&self) -> SessionData {
        let record = match self.volatile.load().await {
            Some(record) => Some(record),
            None => self.durable.load().await,
        };

        match record {
            Some(record) => SessionData {
                token: Some(record.token),
                user: Some(record.user),
                expires_at: record.token_expires_at,
                persistent: record.remember_me,
            },
            None => SessionData::default(),
        }
    }

    /// Remove the session from both backends. Idempotent.
    pub async fn clear(&self) {
        self.volatile.clear().await;
        self.durable.clear().await;
    }

    /// Whether the durable backend currently holds a "remember me"
    /// session. Decides where profile refreshes are persisted.
    pub async fn is_persistent_active(&self) -> bool {
        self.durable
            .load()
            .await
            .map(|record| record.remember_me)
            .unwrap_or(false)
    }
}
