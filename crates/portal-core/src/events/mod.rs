//! Domain events emitted by Portal operations.
//!
//! Events are dispatched through a broadcast bus created at wiring time.
//! The network layer emits them; top-level subscribers (the router, the
//! console shell) react to them. This keeps navigation policy out of the
//! request pipeline.

pub mod session;

pub use session::SessionEvent;
