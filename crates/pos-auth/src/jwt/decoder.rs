//! JWT token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use pos_core::config::AuthConfig;
use pos_core::error::AppError;
use pos_core::result::AppResult;

use super::claims::{Claims, TokenKind};

/// Verifies token signatures, expiry, and claim structure.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token.
    pub fn decode_access_token(&self, token: &str) -> AppResult<Claims> {
        self.decode_kind(token, TokenKind::Access)
    }

    /// Decodes and validates a refresh token.
    pub fn decode_refresh_token(&self, token: &str) -> AppResult<Claims> {
        self.decode_kind(token, TokenKind::Refresh)
    }

    fn decode_kind(&self, token: &str, expected: TokenKind) -> AppResult<Claims> {
        let claims = self.decode_token(token)?;
        claims.check(expected)?;
        Ok(claims)
    }

    /// Signature, expiry, and structural checks without a kind check.
    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::token_expired("Token has expired"),
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    AppError::token_signature_invalid("Invalid token signature")
                }
                _ => AppError::token_malformed(format!("Token validation failed: {e}")),
            })?;

        Ok(token_data.claims)
    }
}
