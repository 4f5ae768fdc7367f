//! Token issuance and verification facade used by `AuthService`.

use serde::{Deserialize, Serialize};

use pos_core::config::AuthConfig;
use pos_core::result::AppResult;
use pos_entity::user::User;

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Longer-lived refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Signs and verifies the two token kinds.
///
/// Lifetimes are fixed at construction and applied to every issuance.
/// No revocation list is consulted here; revocation happens at the
/// session layer.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Creates a token service from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }

    /// Issue an access token for `user`, optionally bound to a session.
    pub fn generate_access_token(&self, user: &User, session_id: Option<&str>) -> AppResult<String> {
        self.encoder.sign(&self.encoder.access_claims(user, session_id))
    }

    /// Issue a refresh token for `user`, optionally bound to a session.
    pub fn generate_refresh_token(
        &self,
        user: &User,
        session_id: Option<&str>,
    ) -> AppResult<String> {
        self.encoder.sign(&self.encoder.refresh_claims(user, session_id))
    }

    /// Issue both tokens.
    pub fn generate_pair(&self, user: &User, session_id: Option<&str>) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user, session_id)?,
            refresh_token: self.generate_refresh_token(user, session_id)?,
            expires_in: self.encoder.access_ttl_seconds(),
        })
    }

    /// Sign explicit claims.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        self.encoder.sign(claims)
    }

    /// Verify an access token and return its claims.
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        self.decoder.decode_access_token(token)
    }

    /// Verify a refresh token and return its claims.
    pub fn validate_refresh_token(&self, token: &str) -> AppResult<Claims> {
        self.decoder.decode_refresh_token(token)
    }

    /// Access token lifetime in seconds.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.encoder.access_ttl_seconds()
    }
}
