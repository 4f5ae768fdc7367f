//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pos_core::types::{TenantId, UserId};

/// A server-tracked login linking a user to the token pair issued for it.
///
/// Created at login; destroyed by logout, by a password change, or by
/// the expiry sweep. A user may hold several sessions at once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque unique session identifier.
    pub id: String,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// The user's tenant.
    pub tenant_id: TenantId,
    /// Access token issued at login.
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Refresh token issued at login.
    #[serde(skip_serializing)]
    pub refresh_token: String,
    /// Issuance time plus the session lifetime.
    pub expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against an explicit instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
