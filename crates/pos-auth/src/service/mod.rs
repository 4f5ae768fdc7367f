//! Authentication orchestration.

pub mod auth;
pub mod types;

#[cfg(test)]
mod tests;

pub use auth::AuthService;
pub use types::{AuthenticatedUser, LoginRequest, LoginResult, RegisterRequest};
