//! Domain event publication configuration.

use serde::{Deserialize, Serialize};

/// Settings for the outbound event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Whether events are published at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Capacity of the in-process broadcast channel.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_buffer_size() -> usize {
    1024
}
