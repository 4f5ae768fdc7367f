//! Session store configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session store backend: `"memory"` or `"postgres"`.
    #[serde(default = "default_store")]
    pub store: String,
    /// Minimum lifetime of a session row, in hours. A session is also kept
    /// alive for as long as the refresh token issued with it.
    #[serde(default = "default_ttl")]
    pub ttl_hours: u64,
    /// Interval between expired-session sweeps, in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            ttl_hours: default_ttl(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

/// Upper bound on `ttl_hours` (ten years).
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 10;

/// Upper bound on `cleanup_interval_minutes` (one week).
pub const MAX_CLEANUP_INTERVAL_MINUTES: u64 = 60 * 24 * 7;

impl SessionConfig {
    /// Session lifetime floor in seconds, clamped to [`MAX_SESSION_TTL_HOURS`].
    pub fn ttl_seconds(&self) -> i64 {
        (self.ttl_hours.min(MAX_SESSION_TTL_HOURS) * 3600) as i64
    }

    /// Sweep interval in seconds, clamped to `1..=`[`MAX_CLEANUP_INTERVAL_MINUTES`] minutes.
    pub fn cleanup_interval_seconds(&self) -> u64 {
        self.cleanup_interval_minutes
            .clamp(1, MAX_CLEANUP_INTERVAL_MINUTES)
            * 60
    }
}

fn default_store() -> String {
    "memory".to_string()
}

fn default_ttl() -> u64 {
    24
}

fn default_cleanup_interval() -> u64 {
    15
}
