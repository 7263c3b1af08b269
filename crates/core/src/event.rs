//! Domain events published while the assistant works.
//!
//! The agent loop publishes; the gateway subscribes and logs. Nobody is
//! required to listen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A tool call passed both schema checks and produced a record
    ToolExecuted {
        tool_name: String,
        call_id: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A tool call failed: unknown tool, bad arguments or a schema violation
    ToolRejected {
        tool_name: String,
        /// The violating field, when the failure was a schema check
        field: Option<String>,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// The agent produced its final reply for a turn
    ResponseGenerated {
        conversation_id: String,
        model: String,
        tokens_used: u32,
        tool_calls: usize,
        timestamp: DateTime<Utc>,
    },

    /// A provider or transport failure ended a turn
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Short machine-readable name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToolExecuted { .. } => "tool_executed",
            Self::ToolRejected { .. } => "tool_rejected",
            Self::ResponseGenerated { .. } => "response_generated",
            Self::ErrorOccurred { .. } => "error_occurred",
        }
    }
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Slow
/// subscribers lag and lose the oldest events.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::ToolExecuted {
            tool_name: "create-employee".into(),
            call_id: "call_1".into(),
            duration_ms: 3,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind(), "tool_executed");
        match event.as_ref() {
            DomainEvent::ToolExecuted { tool_name, .. } => {
                assert_eq!(tool_name, "create-employee");
            }
            _ => panic!("Expected ToolExecuted event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::ToolRejected {
            tool_name: "create-contract".into(),
            field: Some("contractType".into()),
            reason: "not one of the allowed values".into(),
            timestamp: Utc::now(),
        });
    }
}
