//! User (identity) entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pos_core::types::{RoleId, TenantId, UserId};

/// A user belonging to exactly one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Assigned role.
    pub role_id: RoleId,
    /// Login name, unique within the tenant (case-insensitive).
    pub username: String,
    /// Email address, unique within the tenant (case-insensitive).
    pub email: String,
    /// Bcrypt password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable name.
    pub full_name: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the email address was verified.
    pub email_verified_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `label` names this user, by username or by email.
    pub fn matches_label(&self, label: &str) -> bool {
        self.username.eq_ignore_ascii_case(label) || self.email.eq_ignore_ascii_case(label)
    }

    /// The label put into access tokens.
    pub fn identity_label(&self) -> &str {
        &self.username
    }

    /// Check whether the email address has been verified.
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Assigned role.
    pub role_id: RoleId,
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Phone number (optional).
    pub phone: Option<String>,
}
