//! # portal-store
//!
//! Token persistence for Portal: a volatile in-memory backend (cleared at
//! process end) and a durable file backend (survives restarts), selected
//! per save by the "remember me" choice. The [`TokenStore`] facade owns
//! both and enforces that at most one holds the live copy.
//!
//! Pure storage; no policy. Storage failures are logged and treated as
//! absence, never surfaced to callers.

pub mod backend;
pub mod file;
pub mod memory;
pub mod store;

pub use backend::{StorageBackend, StoredSession};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use store::TokenStore;
