//! Route authorization guard.

pub mod checker;

pub use checker::{Decision, GuardSnapshot, RouteGuard, decide};
