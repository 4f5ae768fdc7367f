//! Request and result types of [`AuthService`](super::AuthService).

use std::fmt;

use pos_core::types::{RoleId, TenantId};
use pos_entity::role::Role;
use pos_entity::user::User;

use crate::jwt::{Claims, TokenPair};

/// Credentials presented at login.
#[derive(Clone)]
pub struct LoginRequest {
    /// Tenant the identity label is resolved in.
    pub tenant_id: TenantId,
    /// Username or email.
    pub identity_label: String,
    /// Plaintext password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("tenant_id", &self.tenant_id)
            .field("identity_label", &self.identity_label)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Data for self-registration into an existing tenant.
#[derive(Clone)]
pub struct RegisterRequest {
    /// Tenant to register into.
    pub tenant_id: TenantId,
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Requested role; the configured default when absent.
    pub role_id: Option<RoleId>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("tenant_id", &self.tenant_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("role_id", &self.role_id)
            .finish()
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The issued token pair.
    pub tokens: TokenPair,
    /// The authenticated identity.
    pub user: User,
    /// The identity's role, if it still exists.
    pub role: Option<Role>,
}

/// The identity behind a validated access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The freshly loaded identity.
    pub user: User,
    /// The verified token claims.
    pub claims: Claims,
}
