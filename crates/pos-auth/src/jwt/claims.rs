//! JWT claims carried by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pos_core::error::AppError;
use pos_core::result::AppResult;
use pos_core::types::{RoleId, TenantId, UserId};

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Longer-lived token used only to mint a new pair.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => f.write_str("access"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims payload of every token.
///
/// Unknown fields are rejected at decode time, and a claim with the wrong
/// JSON type fails deserialization, so a decoded `Claims` is always
/// structurally sound. Per-kind requirements are checked by [`Claims::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// The user the token was issued to.
    pub user_id: UserId,
    /// The user's tenant at issuance.
    pub tenant_id: TenantId,
    /// Username at issuance. Access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_label: Option<String>,
    /// Role at issuance. Access tokens only; refresh re-resolves it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    /// Login session the token belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Unique token ID.
    pub jti: Uuid,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Token kind.
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl Claims {
    /// Verify the token is of the `expected` kind and carries the claims
    /// that kind requires.
    pub fn check(&self, expected: TokenKind) -> AppResult<()> {
        if self.kind != expected {
            return Err(AppError::wrong_token_kind(format!(
                "Expected {expected} token, got {}",
                self.kind
            )));
        }

        match self.kind {
            TokenKind::Access => {
                if self.identity_label.as_deref().is_none_or(str::is_empty) {
                    return Err(AppError::token_malformed(
                        "Access token is missing identity_label",
                    ));
                }
                if self.role_id.is_none() {
                    return Err(AppError::token_malformed("Access token is missing role_id"));
                }
            }
            TokenKind::Refresh => {
                if self.role_id.is_some() {
                    return Err(AppError::token_malformed(
                        "Refresh token must not carry role_id",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the session ID, if the token is bound to one.
    pub fn session_id(&self) -> Option<&str> {
        self.sid.as_deref()
    }
}
