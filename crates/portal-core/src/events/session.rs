//! Session-related domain events.

use serde::{Deserialize, Serialize};

/// Events related to the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A login completed and a session was established.
    Established {
        /// The authenticated user's id.
        user_id: i64,
        /// Whether the session was persisted to the durable backend.
        persistent: bool,
    },
    /// The session was cleared locally.
    Cleared {
        /// Why the session ended ("logout", "expired", "invalidated").
        reason: String,
    },
    /// The user profile was refetched and replaced.
    Refreshed {
        /// The user's id.
        user_id: i64,
    },
    /// The server rejected the current token (HTTP 401).
    ///
    /// Emitted by the request pipeline regardless of which endpoint
    /// produced the response. A single top-level subscriber clears the
    /// session and performs the redirect to the login view.
    Invalidated {
        /// Path of the request that triggered the invalidation.
        path: String,
    },
}
