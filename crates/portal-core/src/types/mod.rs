//! Entity and value types shared across the Portal crates.

pub mod credentials;
pub mod role;
pub mod route;
pub mod session;
pub mod user;

pub use credentials::LoginCredentials;
pub use role::Role;
pub use route::{LOGIN_PATH, Route, RouteRequirement, UNAUTHORIZED_PATH};
pub use session::SessionData;
pub use user::User;
