//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the console.
///
/// The set is closed on the client side, but the server owns the source of
/// truth: a role string the client does not recognize deserializes as
/// [`Role::Unknown`] rather than failing the whole profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Day-to-day administrator of the procurement data.
    Admin,
    /// Super administrator; manages admin accounts and reset requests.
    Superadmin,
    /// A role this client version does not know about.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
            Self::Unknown => "unknown",
        }
    }

    /// The landing path for this role after login.
    ///
    /// Unrecognized roles fall back to the application root.
    pub fn home_path(&self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Superadmin => "/superadmin",
            Self::Unknown => "/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(crate::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, superadmin"
            ))),
        }
    }
}
