//! Domain events emitted by the authentication subsystem.
//!
//! Events are fire-and-forget: they are handed to an [`EventPublisher`]
//! after the state change they describe has been committed, and a failed
//! publication never fails the operation that produced it.

pub mod auth;
pub mod publisher;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{TenantId, UserId};

pub use auth::AuthEvent;
pub use publisher::{BroadcastEventBus, EventPublisher, NoopEventPublisher, PublishedEvent};

/// Envelope for every published event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// Dotted event type, e.g. `user.logged_in`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Tenant the subject belongs to, when known.
    pub tenant_id: Option<TenantId>,
    /// The user the event is about.
    pub user_id: UserId,
    /// The event payload. Never carries secrets.
    pub payload: AuthEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(tenant_id: Option<TenantId>, user_id: UserId, payload: AuthEvent) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: payload.event_type().to_string(),
            timestamp: Utc::now(),
            tenant_id,
            user_id,
            payload,
        }
    }

    /// Routing key the event is published under.
    pub fn topic(&self) -> &'static str {
        self.payload.topic()
    }
}
