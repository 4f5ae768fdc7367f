//! Schema migrations embedded from the workspace `migrations/` directory.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use pos_core::error::AppError;

use crate::error::persistence_migrate;

/// Migrations compiled into the binary.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the directory schema up to date. Already-applied migrations are
/// skipped by sqlx's bookkeeping table.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    info!(known = MIGRATOR.iter().count(), latest, "Applying directory migrations");

    MIGRATOR
        .run(pool)
        .await
        .map_err(persistence_migrate("Failed to apply directory migrations"))?;

    info!(latest, "Directory schema is current");
    Ok(())
}
