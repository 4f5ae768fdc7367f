//! # pos-core
//!
//! Core crate for the POS backend. Contains configuration schemas,
//! typed numeric identifiers, authentication domain events and the
//! publisher port, the cancellable request context, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other POS crates.

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use context::RequestContext;
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
