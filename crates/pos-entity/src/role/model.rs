//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pos_core::types::RoleId;

/// A named role carrying opaque permission strings.
///
/// Permissions are stored and returned, never evaluated by the
/// authentication subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Machine name, e.g. `owner`.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Permission strings.
    #[sqlx(json)]
    pub permissions: Vec<String>,
    /// Built-in roles cannot be removed.
    pub is_system: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}
