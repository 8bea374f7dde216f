//! # portal-core
//!
//! Core crate for Portal. Contains configuration schemas, domain events,
//! entity types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Portal crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
