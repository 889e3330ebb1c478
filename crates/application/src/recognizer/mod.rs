//! Per-frame inference: landmarks to label to debounced speech.
//!
//! The [`Recognizer`] owns everything the frame loop mutates (debounce state,
//! mute flag) and shares only the model registry with whoever triggers model
//! switches. GUI controls reach it as [`Action`]s, so nothing here depends on
//! a GUI type.

mod debouncer;

use std::sync::Arc;

use handsign_events::{
    emit, event_names, EventBusRef, LabelPredictedEvent, ModelChangedEvent,
    ModelSwitchFailedEvent, SpeechRequestedEvent, SpeechToggledEvent,
};
use handsign_landmarks::{LandmarkError, LandmarkSet};
use handsign_models::{ModelError, ModelKind, ModelRegistry};
use handsign_speech::SpeechDispatcher;

pub use debouncer::PredictionDebouncer;

#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Landmarks(#[from] LandmarkError),
}

pub type Result<T> = std::result::Result<T, RecognizerError>;

/// User-interface controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Switch the active classifier.
    SetActiveModel(ModelKind),
    /// Mute or unmute speech.
    ToggleSpeech,
    /// Stop the frame loop.
    Shutdown,
}

/// Whether the frame loop keeps running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// What happened to one frame's hands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Hands reported by the detector.
    pub hands: usize,
    /// Label of every classified hand, in detector order.
    pub predictions: Vec<String>,
    /// Labels handed to the speech engine.
    pub spoken: Vec<String>,
    /// Hands dropped (empty landmark set, feature length mismatch).
    pub skipped: usize,
}

pub struct Recognizer {
    registry: Arc<ModelRegistry>,
    debouncer: PredictionDebouncer,
    speech: SpeechDispatcher,
    speech_enabled: bool,
    events: EventBusRef,
    /// Registry generation the debounce state belongs to.
    last_generation: u64,
}

impl Recognizer {
    pub fn new(registry: Arc<ModelRegistry>, speech: SpeechDispatcher, events: EventBusRef) -> Self {
        let last_generation = registry.generation();
        Self {
            registry,
            debouncer: PredictionDebouncer::new(),
            speech,
            speech_enabled: true,
            events,
            last_generation,
        }
    }

    pub fn with_speech_enabled(mut self, enabled: bool) -> Self {
        self.speech_enabled = enabled;
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    pub fn debouncer(&self) -> &PredictionDebouncer {
        &self.debouncer
    }

    /// Classify every detected hand independently.
    ///
    /// An empty slice leaves the debounce state untouched.
    pub fn process_hands(&mut self, hands: &[LandmarkSet]) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            hands: hands.len(),
            ..FrameOutcome::default()
        };

        for (index, hand) in hands.iter().enumerate() {
            if hand.is_empty() {
                tracing::warn!(hand = index, "Empty landmark set, skipping hand");
                outcome.skipped += 1;
                continue;
            }

            let features = match hand.features() {
                Ok(features) => features,
                Err(e) => {
                    tracing::warn!(hand = index, error = %e, "Feature extraction failed");
                    outcome.skipped += 1;
                    continue;
                }
            };

            let prediction = match self.registry.predict(&features) {
                Ok(prediction) => prediction,
                Err(ModelError::FeatureLengthMismatch { expected, actual }) => {
                    tracing::warn!(hand = index, expected, actual, "Feature length mismatch, skipping hand");
                    outcome.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!(hand = index, error = %e, "Prediction failed, skipping hand");
                    outcome.skipped += 1;
                    continue;
                }
            };

            if prediction.generation != self.last_generation {
                tracing::debug!(
                    from = self.last_generation,
                    to = prediction.generation,
                    "Model changed underneath, resetting debouncer"
                );
                self.debouncer.reset();
                self.last_generation = prediction.generation;
            }

            if let Some(label) = self.debouncer.observe(&prediction.label) {
                if self.speech_enabled {
                    tracing::debug!(label = %label, "Label changed, speaking");
                    self.speech.dispatch(&label);
                    emit(
                        self.events.as_ref(),
                        event_names::SPEECH_REQUESTED,
                        &SpeechRequestedEvent {
                            label: label.clone(),
                            ts_ms: handsign_events::now_ms(),
                        },
                    );
                    outcome.spoken.push(label);
                }
            }

            emit(
                self.events.as_ref(),
                event_names::LABEL_PREDICTED,
                &LabelPredictedEvent::new(prediction.label.as_str(), prediction.kind.name()),
            );
            outcome.predictions.push(prediction.label);
        }

        outcome
    }

    /// Apply a user-interface action.
    ///
    /// A failed model switch is reported on the event bus and returned; the
    /// previous model and debounce state stay in place.
    pub fn handle_action(&mut self, action: Action) -> Result<LoopControl> {
        match action {
            Action::SetActiveModel(kind) => match self.registry.set_active(kind) {
                Ok(generation) => {
                    self.debouncer.reset();
                    self.last_generation = generation;
                    emit(
                        self.events.as_ref(),
                        event_names::MODEL_CHANGED,
                        &ModelChangedEvent {
                            model: kind.name().to_string(),
                            generation,
                        },
                    );
                    Ok(LoopControl::Continue)
                }
                Err(e) => {
                    emit(
                        self.events.as_ref(),
                        event_names::MODEL_SWITCH_FAILED,
                        &ModelSwitchFailedEvent {
                            requested: kind.name().to_string(),
                            active: self.registry.active_kind().name().to_string(),
                            error: e.to_string(),
                        },
                    );
                    Err(e.into())
                }
            },
            Action::ToggleSpeech => {
                self.speech_enabled = !self.speech_enabled;
                tracing::info!(enabled = self.speech_enabled, "Speech toggled");
                emit(
                    self.events.as_ref(),
                    event_names::SPEECH_TOGGLED,
                    &SpeechToggledEvent::new(self.speech_enabled),
                );
                Ok(LoopControl::Continue)
            }
            Action::Shutdown => Ok(LoopControl::Stop),
        }
    }
}
