//! # portal-client
//!
//! The single shared request pipeline wrapping all server calls.
//!
//! Every outgoing request carries the current bearer token read from the
//! token store; every incoming response is inspected for the
//! authentication-invalidation signal (HTTP 401). The pipeline never
//! navigates: on invalidation it emits [`SessionEvent::Invalidated`] on
//! the broadcast bus and returns the classified error to the caller, and
//! a single top-level subscriber performs the actual redirect.
//!
//! [`SessionEvent::Invalidated`]: portal_core::events::SessionEvent

pub mod api;
pub mod client;

pub use api::{LoginResponse, ResetOutcome};
pub use client::ApiClient;
