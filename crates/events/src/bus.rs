//! Event bus abstraction for decoupled event emission.
//!
//! The recognizer publishes through this trait so it can run headless, be
//! tested without a front end, or feed any GUI that implements it.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Sink for recognizer events.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// Must not block: it is called from the frame loop.
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// Serialize `event` and emit it on `topic`.
///
/// Serialization failures are logged and the event is dropped.
pub fn emit<E: Serialize>(bus: &dyn EventBus, topic: &str, event: &E) {
    match serde_json::to_value(event) {
        Ok(payload) => bus.emit(topic, payload),
        Err(e) => tracing::warn!(topic, error = %e, "Failed to serialize event"),
    }
}

/// A captured event from [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// In-memory event bus for tests. Captures every emitted event.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Payloads for `topic` decoded as `T`; payloads that don't decode are skipped.
    pub fn payloads_for<T: DeserializeOwned>(&self, topic: &str) -> Vec<T> {
        self.events_for(topic)
            .into_iter()
            .filter_map(|e| serde_json::from_value(e.payload).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.events.lock().unwrap().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// Writes every event to the tracing log. Used by the headless CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventBus;

impl EventBus for LogEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        tracing::info!(target: "handsign::events", topic, %payload, "event");
    }
}

/// Discards all events.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}
