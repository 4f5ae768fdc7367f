//! POS Server: tenant-scoped authentication for the point-of-sale backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt};

use pos_api::AppState;
use pos_auth::{
    AuthService, MemorySessionStore, MemoryUserDirectory, SessionCleanup, SessionStore,
    UserDirectory,
};
use pos_core::config::{AppConfig, LogFormat};
use pos_core::error::AppError;
use pos_core::events::{BroadcastEventBus, EventPublisher, NoopEventPublisher};
use pos_database::{DatabasePool, PgSessionStore, PgUserDirectory};

#[tokio::main]
async fn main() {
    let env = std::env::var("POS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(config.logging.filter_directive())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting POS server v{}", env!("CARGO_PKG_VERSION"));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 1: Identity directory ───────────────────────────────
    let db_pool = match config.database.provider.as_str() {
        "postgres" => {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                pos_database::migration::run_migrations(pool.pool()).await?;
            }
            Some(pool)
        }
        "memory" => None,
        other => {
            return Err(AppError::configuration(format!(
                "Unknown database provider '{other}'"
            )));
        }
    };

    let directory: Arc<dyn UserDirectory> = match &db_pool {
        Some(pool) => Arc::new(PgUserDirectory::new(pool.pool().clone())),
        None => {
            tracing::warn!("Using in-memory identity directory; data is lost on restart");
            Arc::new(MemoryUserDirectory::with_defaults().await)
        }
    };

    // ── Step 2: Session store + cleanup ──────────────────────────
    let sessions: Arc<dyn SessionStore> = match (config.session.store.as_str(), &db_pool) {
        ("memory", _) => Arc::new(MemorySessionStore::new()),
        ("postgres", Some(pool)) => Arc::new(PgSessionStore::new(pool.pool().clone())),
        ("postgres", None) => {
            return Err(AppError::configuration(
                "session.store = \"postgres\" requires database.provider = \"postgres\"",
            ));
        }
        (other, _) => {
            return Err(AppError::configuration(format!(
                "Unknown session store '{other}'"
            )));
        }
    };
    tracing::info!(store = %config.session.store, "Session store initialized");

    let cleanup_handle = SessionCleanup::new(Arc::clone(&sessions)).spawn(
        Duration::from_secs(config.session.cleanup_interval_seconds()),
        shutdown_rx.clone(),
    );

    // ── Step 3: Domain events ────────────────────────────────────
    let (events, event_log_handle): (Arc<dyn EventPublisher>, Option<JoinHandle<()>>) =
        if config.events.enabled {
            let bus = BroadcastEventBus::new(config.events.buffer_size);
            let handle = spawn_event_logger(bus.subscribe(), shutdown_rx.clone());
            let bus: Arc<dyn EventPublisher> = Arc::new(bus);
            (bus, Some(handle))
        } else {
            tracing::info!("Domain events disabled");
            let noop: Arc<dyn EventPublisher> = Arc::new(NoopEventPublisher);
            (noop, None)
        };

    // ── Step 4: Auth service + HTTP ──────────────────────────────
    let auth = AuthService::new(&config.auth, &config.session, directory, sessions, events)?;
    let addr = config.server.bind_address();
    let state = AppState::new(Arc::new(config), auth, db_pool.clone());
    let app = pos_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("POS server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Waiting for background tasks to complete...");
    let _ = tokio::time::timeout(Duration::from_secs(10), cleanup_handle).await;
    if let Some(handle) = event_log_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("POS server shut down gracefully");
    Ok(())
}

/// Log every published auth event until shutdown.
fn spawn_event_logger(
    mut rx: broadcast::Receiver<pos_core::events::PublishedEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(published) => tracing::info!(
                        topic = %published.topic,
                        event_type = %published.event.event_type,
                        event_id = %published.event.id,
                        user_id = %published.event.user_id,
                        "Domain event"
                    ),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event logger lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = shutdown.changed() => break,
            }
        }
    })
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
