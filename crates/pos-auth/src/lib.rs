//! # pos-auth
//!
//! Authentication and session identity for the POS backend.
//!
//! ## Modules
//!
//! - `jwt`: typed claims, HMAC-SHA256 signing and verification
//! - `password`: bcrypt hashing and password policy
//! - `session`: the session store port, its in-memory implementation, and the expiry sweep
//! - `directory`: the user directory port and its in-memory implementation
//! - `service`: `AuthService`, the orchestrator every other module calls

pub mod directory;
pub mod jwt;
pub mod password;
pub mod service;
pub mod session;

pub use directory::{MemoryUserDirectory, UserDirectory};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenKind, TokenPair, TokenService};
pub use password::{PasswordHasher, PasswordValidator};
pub use service::{AuthService, AuthenticatedUser, LoginRequest, LoginResult, RegisterRequest};
pub use session::{MemorySessionStore, SessionCleanup, SessionStore};
