//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pos_core::types::TenantId;

/// A business using the platform. Every user belongs to one tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: TenantId,
    /// Business name.
    pub name: String,
    /// Inactive tenants cannot log in.
    pub is_active: bool,
    /// End of the trial period, if any.
    pub trial_ends_at: Option<DateTime<Utc>>,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Check whether the tenant is still inside its trial window.
    pub fn is_in_trial(&self) -> bool {
        self.trial_ends_at.is_some_and(|end| Utc::now() < end)
    }
}
