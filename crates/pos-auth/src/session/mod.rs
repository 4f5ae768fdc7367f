//! Session store port, in-memory store, and expiry sweep.

pub mod cleanup;
pub mod memory;
pub mod store;

pub use cleanup::SessionCleanup;
pub use memory::MemorySessionStore;
pub use store::SessionStore;
