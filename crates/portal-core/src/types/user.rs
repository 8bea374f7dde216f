//! User profile entity.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// The authenticated user's profile as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Role used to gate route access.
    pub role: Role,
    /// Relative or absolute URL of the profile photo.
    #[serde(default)]
    pub profile_photo: Option<String>,
}
