//! # pos-database
//!
//! PostgreSQL connection management and the Postgres implementations of
//! the `UserDirectory` and `SessionStore` ports.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{PgSessionStore, PgUserDirectory};
