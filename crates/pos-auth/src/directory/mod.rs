//! User directory port and its in-memory implementation.

pub mod memory;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pos_core::result::AppResult;
use pos_core::types::{RoleId, TenantId, UserId};
use pos_entity::role::Role;
use pos_entity::tenant::Tenant;
use pos_entity::user::{CreateUser, User};

pub use memory::MemoryUserDirectory;

/// Persistence of users, roles, and tenants as seen by authentication.
///
/// Identity labels (username and email) are unique per tenant, compared
/// case-insensitively.
#[async_trait]
pub trait UserDirectory: Send + Sync + fmt::Debug + 'static {
    /// Resolve a label within a tenant, trying username first, then email.
    async fn find_by_identity_label(
        &self,
        tenant_id: TenantId,
        label: &str,
    ) -> AppResult<Option<User>>;

    /// Look up a user by ID.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Insert a new active user. Fails with `DuplicateIdentity` when the
    /// username or email is already taken in the tenant.
    async fn create(&self, user: CreateUser) -> AppResult<User>;

    /// Persist the mutable profile fields of `user`, including its
    /// password hash. `last_login_at` is left untouched.
    async fn update(&self, user: &User) -> AppResult<()>;

    /// Set `last_login_at` and nothing else.
    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()>;

    /// Look up a role by ID.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Look up a tenant by ID.
    async fn find_tenant(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>>;
}
