//! Shared application state passed to all handlers via Axum state.

use std::sync::Arc;
use std::time::Duration;

use pos_auth::AuthService;
use pos_core::RequestContext;
use pos_core::config::AppConfig;
use pos_database::DatabasePool;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Authentication service.
    pub auth: AuthService,
    /// PostgreSQL pool when the postgres provider is selected.
    pub db_pool: Option<DatabasePool>,
    /// Instant the server started, for uptime reporting.
    pub started_at: std::time::Instant,
}

impl AppState {
    /// Build the state from its parts.
    pub fn new(config: Arc<AppConfig>, auth: AuthService, db_pool: Option<DatabasePool>) -> Self {
        Self {
            config,
            auth,
            db_pool,
            started_at: std::time::Instant::now(),
        }
    }

    /// A fresh request context carrying the configured per-request deadline.
    ///
    /// A timeout of zero disables the deadline.
    pub fn request_context(&self) -> RequestContext {
        match self.config.server.request_timeout_seconds {
            0 => RequestContext::new(),
            secs => RequestContext::with_timeout(Duration::from_secs(secs)),
        }
    }
}
