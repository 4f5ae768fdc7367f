//! # pos-api
//!
//! HTTP adapter for the POS authentication subsystem built on Axum.
//!
//! Translates wire requests into `AuthService` calls and maps the error
//! taxonomy onto generic wire responses that never reveal which
//! credential or token check failed.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
