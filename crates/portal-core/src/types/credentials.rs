//! Login credentials.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Credentials submitted to the authentication endpoint.
///
/// Validated locally before any network call so an empty form never
/// reaches the server.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginCredentials {
    /// Login name.
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    /// Plain password; only ever sent over the wire, never stored.
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl LoginCredentials {
    /// Build credentials from user input.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
