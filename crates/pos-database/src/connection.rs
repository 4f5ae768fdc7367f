//! PostgreSQL pool lifecycle: opened once at startup, shared by the
//! repositories, closed at shutdown.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use pos_core::config::DatabaseConfig;
use pos_core::error::AppError;

use crate::error::persistence;

/// Handle to the directory database. Cloning shares the same pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    ///
    /// Fails with a configuration error when no URL is set, so selecting
    /// the postgres provider without a URL is caught at startup.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        if config.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url must be set when the postgres provider is selected",
            ));
        }

        info!(
            target_db = %redact_credentials(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Opening directory database pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(persistence("Failed to open directory database pool"))?;

        Ok(Self { pool })
    }

    /// The underlying sqlx pool, for the repositories.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query and return how long it took.
    pub async fn ping(&self) -> Result<Duration, AppError> {
        let started = Instant::now();
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(persistence("Database ping failed"))?;
        Ok(started.elapsed())
    }

    /// Wait for checked-out connections to return, then close them all.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Directory database pool closed");
    }
}

/// Keep only the scheme and everything after the userinfo of a URL.
fn redact_credentials(url: &str) -> String {
    let (scheme, rest) = url.split_once("://").unwrap_or(("", url));
    let host = rest.rsplit_once('@').map_or(rest, |(_, host)| host);
    if scheme.is_empty() {
        host.to_string()
    } else {
        format!("{scheme}://{host}")
    }
}
