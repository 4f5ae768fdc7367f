//! Postgres session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use pos_auth::session::SessionStore;
use pos_core::result::AppResult;
use pos_core::types::UserId;
use pos_entity::session::Session;

use crate::error::persistence;

const SESSION_COLUMNS: &str =
    "id, user_id, tenant_id, access_token, refresh_token, expires_at, created_at";

/// Sessions stored in PostgreSQL.
///
/// `delete_by_user_id` is a single `DELETE ... RETURNING`; a row inserted
/// by a concurrent login after the statement's snapshot survives it.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new session store over the pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: Session) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, tenant_id, access_token, refresh_token, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.tenant_id)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(persistence("Failed to insert session"))?;
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(persistence("Failed to delete session"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, session_id: &str) -> AppResult<Option<Session>> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&sql)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find session"))
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, Session>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence("Failed to list user sessions"))
    }

    async fn renew(
        &self,
        session_id: &str,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET access_token = $2, refresh_token = $3, expires_at = $4 \
             WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(persistence("Failed to renew session"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        let sql = format!("DELETE FROM sessions WHERE user_id = $1 RETURNING {SESSION_COLUMNS}");
        let removed = sqlx::query_as::<_, Session>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence("Failed to delete user sessions"))?;

        debug!(user_id = %user_id, count = removed.len(), "Deleted user sessions");
        Ok(removed)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(persistence("Failed to delete expired sessions"))?;
        Ok(result.rows_affected())
    }
}
