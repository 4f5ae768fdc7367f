//! Unified application error types.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The [`ErrorKind`] is what callers
//! match on; the message is for logs and must never be shown verbatim at
//! the wire boundary for authentication or persistence failures.

use std::fmt;
use thiserror::Error;

/// Error categories raised by the authentication subsystem and its adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Unknown identity label or wrong password. The two cases are not distinguished.
    InvalidCredentials,
    /// The identity (or its tenant) exists but is deactivated.
    AccountInactive,
    /// The token's `exp` is in the past.
    TokenExpired,
    /// The token is structurally broken or a required claim is missing or mistyped.
    TokenMalformed,
    /// The token was tampered with or signed by a foreign key.
    TokenSignatureInvalid,
    /// An access token was presented where a refresh token was expected, or vice versa.
    WrongTokenKind,
    /// The session the token was issued for no longer exists.
    SessionRevoked,
    /// The identity referenced by a token or request does not exist.
    IdentityNotFound,
    /// The identity label is already taken within the tenant.
    DuplicateIdentity,
    /// Input validation failed.
    Validation,
    /// A directory or session store operation failed.
    PersistenceFailure,
    /// The requested operation is not implemented.
    NotImplemented,
    /// The caller cancelled the request or its deadline elapsed.
    Cancelled,
    /// A configuration error occurred.
    Configuration,
    /// An unexpected internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Credential-level rejections that must look identical to the caller.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::AccountInactive)
    }

    /// Token-level rejections that collapse to a single "invalid or expired" signal.
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            Self::TokenExpired
                | Self::TokenMalformed
                | Self::TokenSignatureInvalid
                | Self::WrongTokenKind
                | Self::SessionRevoked
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::TokenSignatureInvalid => "TOKEN_SIGNATURE_INVALID",
            Self::WrongTokenKind => "WRONG_TOKEN_KIND",
            Self::SessionRevoked => "SESSION_REVOKED",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::DuplicateIdentity => "DUPLICATE_IDENTITY",
            Self::Validation => "VALIDATION",
            Self::PersistenceFailure => "PERSISTENCE_FAILURE",
            Self::NotImplemented => "NOT_IMPLEMENTED",
            Self::Cancelled => "CANCELLED",
            Self::Configuration => "CONFIGURATION",
            Self::Internal => "INTERNAL",
        };
        f.write_str(s)
    }
}

/// The unified application error.
///
/// Crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message (log-facing).
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Message shared by every credential rejection so that "no such user" and
/// "wrong password" are byte-identical.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create the credential rejection error.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, INVALID_CREDENTIALS_MESSAGE)
    }

    /// Create an inactive-account error.
    pub fn account_inactive(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountInactive, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a malformed-token error.
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenMalformed, message)
    }

    /// Create a bad-signature error.
    pub fn token_signature_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenSignatureInvalid, message)
    }

    /// Create a wrong-token-kind error.
    pub fn wrong_token_kind(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongTokenKind, message)
    }

    /// Create a revoked-session error.
    pub fn session_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionRevoked, message)
    }

    /// Create an identity-not-found error.
    pub fn identity_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IdentityNotFound, message)
    }

    /// Create a duplicate-identity error.
    pub fn duplicate_identity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateIdentity, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PersistenceFailure, message)
    }

    /// Create a not-implemented error.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    /// Create a cancellation error.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Prefix the message with additional context, keeping kind and source.
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::with_source(ErrorKind::Internal, format!("Background task failed: {err}"), err)
    }
}
