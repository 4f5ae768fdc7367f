//! Event publisher port and the in-process broadcast implementation.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::result::AppResult;

use super::DomainEvent;

/// Outbound messaging collaborator.
///
/// Implementations may talk to a broker; callers treat every error as
/// non-fatal.
#[async_trait]
pub trait EventPublisher: Send + Sync + fmt::Debug + 'static {
    /// Publish an event under the given topic.
    async fn publish(&self, topic: &str, event: &DomainEvent) -> AppResult<()>;
}

/// An event together with the topic it was published under.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    /// Routing key.
    pub topic: String,
    /// The event.
    pub event: DomainEvent,
}

/// Single-node event bus backed by a `tokio::sync::broadcast` channel.
#[derive(Debug, Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<PublishedEvent>,
}

impl BroadcastEventBus {
    /// Create a bus whose subscribers may lag by at most `buffer_size` events.
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Subscribe to every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventBus {
    async fn publish(&self, topic: &str, event: &DomainEvent) -> AppResult<()> {
        let message = PublishedEvent {
            topic: topic.to_string(),
            event: event.clone(),
        };
        // No subscribers is not an error.
        if self.sender.send(message).is_err() {
            debug!(topic, event_type = %event.event_type, "No subscribers for event");
        }
        Ok(())
    }
}

/// Publisher used when events are disabled.
#[derive(Debug, Clone, Default)]
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn publish(&self, _topic: &str, _event: &DomainEvent) -> AppResult<()> {
        Ok(())
    }
}
