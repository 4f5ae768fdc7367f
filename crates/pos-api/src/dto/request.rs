//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use pos_core::types::{RoleId, TenantId};

/// Login request.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Tenant the identity belongs to.
    pub tenant_id: TenantId,
    /// Username or email.
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, max = 255))]
    pub identity_label: String,
    /// Password.
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("tenant_id", &self.tenant_id)
            .field("identity_label", &self.identity_label)
            .finish_non_exhaustive()
    }
}

/// Self-registration request.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Tenant to join.
    pub tenant_id: TenantId,
    /// Username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Password; strength rules are enforced by the service.
    #[validate(length(min = 1))]
    pub password: String,
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    /// Phone number.
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    /// Requested role.
    pub role_id: Option<RoleId>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("tenant_id", &self.tenant_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Token refresh request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Change password request.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1))]
    pub old_password: String,
    /// New password.
    #[validate(length(min = 1))]
    pub new_password: String,
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChangePasswordRequest { .. }")
    }
}

/// Password reset request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Tenant the identity belongs to.
    pub tenant_id: TenantId,
    /// Username or email.
    #[serde(alias = "email", alias = "username")]
    #[validate(length(min = 1, max = 255))]
    pub identity_label: String,
}

/// Email verification request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    /// Verification token from the email link.
    #[validate(length(min = 1))]
    pub token: String,
}
