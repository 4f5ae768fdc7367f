//! Postgres user directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pos_auth::directory::UserDirectory;
use pos_core::error::AppError;
use pos_core::result::AppResult;
use pos_core::types::{RoleId, TenantId, UserId};
use pos_entity::role::Role;
use pos_entity::tenant::Tenant;
use pos_entity::user::{CreateUser, User};

use crate::error::{identity_write, persistence};

const USER_COLUMNS: &str = "id, tenant_id, role_id, username, email, password_hash, full_name, \
     phone, is_active, last_login_at, email_verified_at, created_at, updated_at";

/// Users, roles, and tenants stored in PostgreSQL.
///
/// Per-tenant uniqueness of usernames and emails is enforced by the
/// `users_tenant_username_key` and `users_tenant_email_key` indexes.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a new directory over the pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_identity_label(
        &self,
        tenant_id: TenantId,
        label: &str,
    ) -> AppResult<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE tenant_id = $1 AND (LOWER(username) = LOWER($2) OR LOWER(email) = LOWER($2)) \
             ORDER BY (LOWER(username) = LOWER($2)) DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(tenant_id)
            .bind(label)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find user by identity label"))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find user by id"))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (tenant_id, role_id, username, email, password_hash, full_name, phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(data.tenant_id)
            .bind(data.role_id)
            .bind(&data.username)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(&data.full_name)
            .bind(&data.phone)
            .fetch_one(&self.pool)
            .await
            .map_err(identity_write("Failed to create user"))
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET role_id = $2, username = $3, email = $4, password_hash = $5, \
             full_name = $6, phone = $7, is_active = $8, email_verified_at = $9, updated_at = $10 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(user.role_id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(user.is_active)
        .bind(user.email_verified_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(identity_write("Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::identity_not_found(format!(
                "User {} not found",
                user.id
            )));
        }
        Ok(())
    }

    async fn record_login(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(user_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(persistence("Failed to record login"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::identity_not_found(format!(
                "User {user_id} not found"
            )));
        }
        Ok(())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, display_name, permissions, is_system, created_at \
             FROM roles WHERE id = $1",
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence("Failed to find role"))
    }

    async fn find_tenant(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>(
            "SELECT id, name, is_active, trial_ends_at, created_at, updated_at \
             FROM tenants WHERE id = $1",
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence("Failed to find tenant"))
    }
}
