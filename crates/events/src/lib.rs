//! Event contracts emitted by the recognizer.
//!
//! The GUI (or any other front end) subscribes to these through an
//! [`EventBus`]; the recognizer never depends on a GUI type. Using shared
//! DTOs keeps producers and consumers agreeing on field names.

mod bus;

pub use bus::{emit, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, LogEventBus, NullEventBus};

use serde::{Deserialize, Serialize};

/// Milliseconds since epoch, for event timestamps.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Latest predicted label, emitted for every classified hand.
///
/// Producers: recognizer
/// Consumers: display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPredictedEvent {
    pub label: String,
    /// Ready-to-show text, e.g. `Predicción: A`.
    pub display_text: String,
    /// Identifier of the model that produced the label.
    pub model: String,
    #[serde(default)]
    pub ts_ms: i64,
}

impl LabelPredictedEvent {
    pub fn new(label: impl Into<String>, model: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            display_text: display_text(&label),
            label,
            model: model.into(),
            ts_ms: now_ms(),
        }
    }
}

/// Text shown for a predicted label.
pub fn display_text(label: &str) -> String {
    format!("Predicción: {label}")
}

/// A label change that was handed to the speech engine.
///
/// Producers: recognizer
/// Consumers: display (speech indicator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequestedEvent {
    pub label: String,
    #[serde(default)]
    pub ts_ms: i64,
}

/// Active model changed.
///
/// Producers: recognizer (model switch action)
/// Consumers: display (model selector)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelChangedEvent {
    pub model: String,
    pub generation: u64,
}

/// A requested model switch failed; the previous model is still active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSwitchFailedEvent {
    pub requested: String,
    pub active: String,
    pub error: String,
}

/// Speech output was muted or unmuted.
///
/// Producers: recognizer (toggle action)
/// Consumers: display (mute button caption)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechToggledEvent {
    pub enabled: bool,
    /// Caption for the toggle control.
    pub button_text: String,
}

impl SpeechToggledEvent {
    pub fn new(enabled: bool) -> Self {
        let button_text = if enabled { "Silenciar" } else { "Activar Voz" };
        Self {
            enabled,
            button_text: button_text.to_string(),
        }
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Predicted label for display.
    pub const LABEL_PREDICTED: &str = "recognizer:label";
    /// Speech dispatched for a label change.
    pub const SPEECH_REQUESTED: &str = "recognizer:speak";
    /// Active model switched.
    pub const MODEL_CHANGED: &str = "models:changed";
    /// Model switch failed.
    pub const MODEL_SWITCH_FAILED: &str = "models:switch_failed";
    /// Speech toggled.
    pub const SPEECH_TOGGLED: &str = "speech:toggled";
}
