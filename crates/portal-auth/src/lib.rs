//! # portal-auth
//!
//! Session lifecycle and route authorization for Portal.
//!
//! ## Modules
//!
//! - `session` — the authoritative session state machine (login, logout,
//!   profile refresh, expiry enforcement, restore at startup)
//! - `guard` — the per-navigation authorization decision procedure
//! - `router` — route table, current location, and the single subscriber
//!   that enacts invalidation signals
//! - `reset` — password-reset request state feeding the guard snapshot

pub mod guard;
pub mod reset;
pub mod router;
pub mod session;

pub use guard::{Decision, GuardSnapshot, RouteGuard, decide};
pub use reset::{ResetFlow, ResetState};
pub use router::{Navigation, Router};
pub use session::SessionManager;
