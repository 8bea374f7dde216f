//! Route declarations consumed by the navigation guard.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Path of the login view, the destination of every auth redirect.
pub const LOGIN_PATH: &str = "/login";

/// Path of the unauthorized view, the destination of role mismatches.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Access requirements attached to a declared route.
///
/// Absence of `requires_auth` in the declaration means the route is
/// public. These are static routing data, not owned by the session core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRequirement {
    /// Whether an authenticated session is required to enter.
    #[serde(default)]
    pub requires_auth: bool,
    /// If set, the authenticated user's role must match exactly.
    #[serde(default)]
    pub role: Option<Role>,
    /// Whether entry requires a pending password-reset request.
    #[serde(default)]
    pub requires_reset_request: bool,
}

/// A declared route: a path, a name, and its access requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Navigation path, e.g. `/admin/users`.
    pub path: String,
    /// Stable route name.
    pub name: String,
    /// Access requirements evaluated by the guard.
    #[serde(default)]
    pub requirement: RouteRequirement,
}

impl Route {
    /// Declare a public route.
    pub fn public(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requirement: RouteRequirement::default(),
        }
    }

    /// Declare a route requiring an authenticated session.
    pub fn authenticated(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requirement: RouteRequirement {
                requires_auth: true,
                ..Default::default()
            },
        }
    }

    /// Declare a route requiring a specific role.
    pub fn role_gated(path: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requirement: RouteRequirement {
                requires_auth: true,
                role: Some(role),
                requires_reset_request: false,
            },
        }
    }

    /// Declare a route gated behind a pending password-reset request.
    pub fn reset_gated(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requirement: RouteRequirement {
                requires_auth: false,
                role: None,
                requires_reset_request: true,
            },
        }
    }
}
