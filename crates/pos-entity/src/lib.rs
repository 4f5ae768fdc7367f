//! # pos-entity
//!
//! Entity models for the POS authentication subsystem. Every struct here
//! represents a database row or a value passed to a persistence port.
//! All entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! row types additionally derive `sqlx::FromRow`.

pub mod role;
pub mod session;
pub mod tenant;
pub mod user;
