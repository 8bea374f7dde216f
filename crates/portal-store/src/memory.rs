//! Volatile in-memory backend, confined to the current process lifetime.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::backend::{StorageBackend, StoredSession};

/// In-memory backend behind a Tokio mutex.
///
/// The Rust analog of browser `sessionStorage`: the record disappears
/// when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    /// The held record, if any.
    slot: Arc<Mutex<Option<StoredSession>>>,
}

impl MemoryBackend {
    /// Create an empty volatile backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn save(&self, record: &StoredSession) {
        *self.slot.lock().await = Some(record.clone());
    }

    async fn load(&self) -> Option<StoredSession> {
        self.slot.lock().await.clone()
    }

    async fn clear(&self) {
        *self.slot.lock().await = None;
    }
}
