//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pos_auth::{LoginResult, TokenPair};
use pos_core::types::{RoleId, TenantId, UserId};
use pos_entity::role::Role;
use pos_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token type for the Authorization header.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// User info.
    pub user: UserResponse,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            access_token: result.tokens.access_token,
            refresh_token: result.tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: result.tokens.expires_in,
            user: UserResponse::new(result.user, result.role),
        }
    }
}

/// Refreshed token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token type for the Authorization header.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: pair.expires_in,
        }
    }
}

/// Role summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    /// Role ID.
    pub id: RoleId,
    /// Machine name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Granted permissions.
    pub permissions: Vec<String>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            display_name: role.display_name,
            permissions: role.permissions,
        }
    }
}

/// User summary for responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: UserId,
    /// Tenant ID.
    pub tenant_id: TenantId,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Role ID.
    pub role_id: RoleId,
    /// Resolved role, when it still exists.
    pub role: Option<RoleResponse>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    /// Build from a user and its optional role.
    pub fn new(user: User, role: Option<Role>) -> Self {
        let email_verified = user.is_email_verified();
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            role_id: user.role_id,
            role: role.map(RoleResponse::from),
            is_active: user.is_active,
            email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Logout result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Number of sessions revoked.
    pub sessions_revoked: usize,
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Directory backend and its reachability.
    pub database: String,
    /// Round-trip time of the database ping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_latency_ms: Option<u64>,
}
