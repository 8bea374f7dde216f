//! Durable file backend, surviving process restarts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::backend::{StorageBackend, StoredSession};

/// JSON file backend.
///
/// The Rust analog of browser `localStorage`: a "remember me" session is
/// written here and restored by the next process. Writes go through a
/// temp file plus rename so a concurrent load never observes a
/// half-written record.
#[derive(Debug, Clone)]
pub struct FileBackend {
    /// Location of the session file.
    path: PathBuf,
}

impl FileBackend {
    /// Create a file backend rooted at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The session file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone();
        path.set_extension("json.tmp");
        path
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn save(&self, record: &StoredSession) {
        let payload = match serde_json::to_vec_pretty(record) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session record");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    warn!(error = %e, path = %parent.display(), "Failed to create session directory");
                    return;
                }
            }
        }

        let temp = self.temp_path();
        if let Err(e) = tokio::fs::write(&temp, &payload).await {
            warn!(error = %e, path = %temp.display(), "Failed to write session file");
            return;
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            warn!(error = %e, path = %self.path.display(), "Failed to commit session file");
        }
    }

    async fn load(&self) -> Option<StoredSession> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "Failed to read session file");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "Corrupt session file, ignoring");
                None
            }
        }
    }

    async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Session file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %self.path.display(), "Failed to remove session file"),
        }
    }
}
