//! In-process user directory.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use pos_core::error::AppError;
use pos_core::result::AppResult;
use pos_core::types::{RoleId, TenantId, UserId};
use pos_entity::role::Role;
use pos_entity::tenant::Tenant;
use pos_entity::user::{CreateUser, User};

use super::UserDirectory;

#[derive(Debug, Default)]
struct DirectoryState {
    users: BTreeMap<UserId, User>,
    roles: HashMap<RoleId, Role>,
    tenants: HashMap<TenantId, Tenant>,
    next_user_id: i64,
}

impl DirectoryState {
    /// Whether either label already resolves to someone in the tenant,
    /// through either column.
    fn label_taken(&self, tenant_id: TenantId, username: &str, email: &str) -> bool {
        self.users.values().any(|u| {
            u.tenant_id == tenant_id
                && [username, email]
                    .iter()
                    .any(|label| u.matches_label(label))
        })
    }
}

/// User directory held in memory behind a `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    state: RwLock<DirectoryState>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory holding one active tenant (ID 1) and the built-in
    /// `owner` (ID 1) and `cashier` (ID 2) roles.
    pub async fn with_defaults() -> Self {
        let directory = Self::new();
        let now = Utc::now();

        directory
            .insert_tenant(Tenant {
                id: TenantId::new(1),
                name: "Default".to_string(),
                is_active: true,
                trial_ends_at: None,
                created_at: now,
                updated_at: now,
            })
            .await;
        directory
            .insert_role(Role {
                id: RoleId::new(1),
                name: "owner".to_string(),
                display_name: "Owner".to_string(),
                permissions: vec!["*".to_string()],
                is_system: true,
                created_at: now,
            })
            .await;
        directory
            .insert_role(Role {
                id: RoleId::new(2),
                name: "cashier".to_string(),
                display_name: "Cashier".to_string(),
                permissions: vec!["pos.sell".to_string(), "products.read".to_string()],
                is_system: true,
                created_at: now,
            })
            .await;

        directory
    }

    /// Insert or replace a tenant.
    pub async fn insert_tenant(&self, tenant: Tenant) {
        self.state.write().await.tenants.insert(tenant.id, tenant);
    }

    /// Insert or replace a role.
    pub async fn insert_role(&self, role: Role) {
        self.state.write().await.roles.insert(role.id, role);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_identity_label(
        &self,
        tenant_id: TenantId,
        label: &str,
    ) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        let in_tenant: Vec<&User> = state
            .users
            .values()
            .filter(|u| u.tenant_id == tenant_id)
            .collect();

        let user = in_tenant
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(label))
            .or_else(|| in_tenant.iter().find(|u| u.email.eq_ignore_ascii_case(label)));

        Ok(user.map(|u| User::clone(u)))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;

        if state.label_taken(data.tenant_id, &data.username, &data.email) {
            return Err(AppError::duplicate_identity(format!(
                "Username or email already registered in tenant {}",
                data.tenant_id
            )));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(state.next_user_id),
            tenant_id: data.tenant_id,
            role_id: data.role_id,
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            full_name: data.full_name,
            phone: data.phone,
            is_active: true,
            last_login_at: None,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::identity_not_found(format!("User {} not found", user.id)))?;

        let last_login_at = stored.last_login_at;
        *stored = user.clone();
        stored.last_login_at = last_login_at;
        Ok(())
    }

    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::identity_not_found(format!("User {user_id} not found")))?;
        stored.last_login_at = Some(at);
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_tenant(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>> {
        Ok(self.state.read().await.tenants.get(&tenant_id).cloned())
    }
}
