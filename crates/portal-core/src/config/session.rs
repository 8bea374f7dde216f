//! Session persistence configuration.

use serde::{Deserialize, Serialize};

/// Settings for session persistence across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path to the durable session file ("remember me" backend).
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "data/session.json".to_string()
}
