//! JWT token creation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use pos_core::config::AuthConfig;
use pos_core::error::{AppError, ErrorKind};
use pos_core::result::AppResult;
use pos_entity::user::User;

use super::claims::{Claims, TokenKind};

/// Builds and signs access and refresh token claims.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL in seconds.
    access_ttl_seconds: i64,
    /// Refresh token TTL in seconds.
    refresh_ttl_seconds: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_seconds: config.access_token_ttl_seconds(),
            refresh_ttl_seconds: config.refresh_token_ttl_seconds(),
        }
    }

    /// Access token lifetime in seconds.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    /// Claims for a fresh access token.
    pub fn access_claims(&self, user: &User, session_id: Option<&str>) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            user_id: user.id,
            tenant_id: user.tenant_id,
            identity_label: Some(user.identity_label().to_string()),
            role_id: Some(user.role_id),
            sid: session_id.map(str::to_string),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + self.access_ttl_seconds,
            kind: TokenKind::Access,
        }
    }

    /// Claims for a fresh refresh token. Carries no role.
    pub fn refresh_claims(&self, user: &User, session_id: Option<&str>) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            user_id: user.id,
            tenant_id: user.tenant_id,
            identity_label: None,
            role_id: None,
            sid: session_id.map(str::to_string),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + self.refresh_ttl_seconds,
            kind: TokenKind::Refresh,
        }
    }

    /// Signs arbitrary claims with HS256.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to encode {} token", claims.kind),
                e,
            )
        })
    }
}
