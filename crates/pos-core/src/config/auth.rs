//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Credential, token, and password-policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in hours.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_hours: u64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Clock-skew allowance applied to `exp`, in seconds.
    #[serde(default)]
    pub jwt_leeway_seconds: u64,
    /// bcrypt work factor.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Require the login session named in a token to still exist when the
    /// token is validated or refreshed.
    #[serde(default = "default_true")]
    pub bind_sessions: bool,
    /// Role assigned to self-registered users that don't name one.
    #[serde(default = "default_role_id")]
    pub default_role_id: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_ttl_hours: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            jwt_leeway_seconds: 0,
            bcrypt_cost: default_bcrypt_cost(),
            password_min_length: default_password_min(),
            bind_sessions: true,
            default_role_id: default_role_id(),
        }
    }
}

/// Upper bound on `access_token_ttl_hours` (one year).
pub const MAX_ACCESS_TOKEN_TTL_HOURS: u64 = 24 * 365;

/// Upper bound on `refresh_token_ttl_days` (ten years).
pub const MAX_REFRESH_TOKEN_TTL_DAYS: u64 = 365 * 10;

impl AuthConfig {
    /// Access token lifetime in seconds (the `expires_in` reported to clients).
    ///
    /// Clamped to [`MAX_ACCESS_TOKEN_TTL_HOURS`]; `AppConfig::validate`
    /// rejects larger values.
    pub fn access_token_ttl_seconds(&self) -> i64 {
        (self.access_token_ttl_hours.min(MAX_ACCESS_TOKEN_TTL_HOURS) * 3600) as i64
    }

    /// Refresh token lifetime in seconds, clamped to [`MAX_REFRESH_TOKEN_TTL_DAYS`].
    pub fn refresh_token_ttl_seconds(&self) -> i64 {
        (self.refresh_token_ttl_days.min(MAX_REFRESH_TOKEN_TTL_DAYS) * 24 * 3600) as i64
    }
}

fn default_jwt_secret() -> String {
    super::PLACEHOLDER_JWT_SECRET.to_string()
}

fn default_access_ttl() -> u64 {
    24
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_password_min() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_role_id() -> i64 {
    2
}
