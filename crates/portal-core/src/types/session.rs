//! Session data snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;
use super::user::User;

/// A point-in-time copy of the session owned by the session manager.
///
/// The same shape is used for the record persisted by the token store,
/// so a restore at process start is a straight adoption of this value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Opaque bearer token, present iff the session is authenticated.
    pub token: Option<String>,
    /// The authenticated user; present whenever `token` is.
    pub user: Option<User>,
    /// Absolute expiry; `None` means no known expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether this session was created with "remember me".
    pub persistent: bool,
}

impl SessionData {
    /// An authenticated session holds a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current user's role, if authenticated.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Whether the session is expired as of `now`.
    ///
    /// A session whose expiry equals `now` is already expired; a session
    /// with no known expiry never is.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }
}
