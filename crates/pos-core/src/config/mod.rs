//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay, and `POS__*` environment
//! variables. Each sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod events;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AuthConfig, MAX_ACCESS_TOKEN_TTL_HOURS, MAX_REFRESH_TOKEN_TTL_DAYS};
pub use self::database::DatabaseConfig;
pub use self::events::EventsConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::session::{MAX_CLEANUP_INTERVAL_MINUTES, MAX_SESSION_TTL_HOURS, SessionConfig};

use crate::error::AppError;

/// Secret shipped in the defaults; refused outside development.
pub const PLACEHOLDER_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity directory persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Credential and token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session store settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Domain event settings.
    #[serde(default)]
    pub events: EventsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, then `config/{env}`, then environment
    /// variables prefixed with `POS` (e.g. `POS__AUTH__JWT_SECRET`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("POS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate(env)?;
        Ok(config)
    }

    /// Reject settings that would make the auth subsystem unsafe or unusable.
    pub fn validate(&self, env: &str) -> Result<(), AppError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if env != "development" && env != "test" && self.auth.jwt_secret == PLACEHOLDER_JWT_SECRET
        {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be set for the '{env}' environment"
            )));
        }
        if self.auth.access_token_ttl_hours == 0 || self.auth.refresh_token_ttl_days == 0 {
            return Err(AppError::configuration(
                "Token lifetimes must be greater than zero",
            ));
        }
        if self.auth.access_token_ttl_hours > MAX_ACCESS_TOKEN_TTL_HOURS {
            return Err(AppError::configuration(format!(
                "auth.access_token_ttl_hours must be at most {MAX_ACCESS_TOKEN_TTL_HOURS}"
            )));
        }
        if self.auth.refresh_token_ttl_days > MAX_REFRESH_TOKEN_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.refresh_token_ttl_days must be at most {MAX_REFRESH_TOKEN_TTL_DAYS}"
            )));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(AppError::configuration(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        if self.session.ttl_hours == 0 {
            return Err(AppError::configuration(
                "session.ttl_hours must be greater than zero",
            ));
        }
        if self.session.ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(AppError::configuration(format!(
                "session.ttl_hours must be at most {MAX_SESSION_TTL_HOURS}"
            )));
        }
        if self.session.cleanup_interval_minutes > MAX_CLEANUP_INTERVAL_MINUTES {
            return Err(AppError::configuration(format!(
                "session.cleanup_interval_minutes must be at most {MAX_CLEANUP_INTERVAL_MINUTES}"
            )));
        }
        Ok(())
    }
}
