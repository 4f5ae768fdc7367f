//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let (status, database, database_latency_ms) = match &state.db_pool {
        None => ("ok", "memory", None),
        Some(pool) => match pool.ping().await {
            Ok(latency) => ("ok", "connected", Some(latency.as_millis() as u64)),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ("degraded", "unreachable", None)
            }
        },
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: database.to_string(),
        database_latency_ms,
    }))
}
