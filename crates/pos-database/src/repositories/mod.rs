//! Postgres implementations of the persistence ports.

pub mod session;
pub mod user;

pub use session::PgSessionStore;
pub use user::PgUserDirectory;
