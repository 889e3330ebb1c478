//! Shared fixtures: scripted classifiers, a recording speech engine, and
//! landmark helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use handsign_application::Recognizer;
use handsign_events::InMemoryEventBus;
use handsign_forest::{ForestError, GestureClassifier, GestureClassifierRef};
use handsign_landmarks::{LandmarkSet, HAND_LANDMARK_COUNT};
use handsign_models::{ClassifierLoader, ModelCatalog, ModelError, ModelKind, ModelRegistry};
use handsign_speech::{SpeechDispatcher, SpeechEngine, SpeechPolicy};

/// Classifier that reads the label off the first feature: `0 -> A`, `1 -> B`...
#[derive(Debug)]
pub struct CodeClassifier {
    classes: Vec<String>,
}

impl CodeClassifier {
    pub fn new(alphabet: &str) -> Self {
        Self {
            classes: alphabet.chars().map(String::from).collect(),
        }
    }
}

impl GestureClassifier for CodeClassifier {
    fn name(&self) -> &str {
        "code"
    }

    fn n_features(&self) -> usize {
        HAND_LANDMARK_COUNT * 2
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, features: &[f32]) -> handsign_forest::Result<String> {
        if features.len() != self.n_features() {
            return Err(ForestError::FeatureLengthMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        let index = (features[0].round() as usize).min(self.classes.len() - 1);
        Ok(self.classes[index].clone())
    }
}

/// Serves classifiers by artifact file name; anything else is missing.
#[derive(Default)]
pub struct StaticLoader {
    models: HashMap<String, GestureClassifierRef>,
}

impl StaticLoader {
    pub fn with(mut self, kind: ModelKind, classifier: CodeClassifier) -> Self {
        self.models
            .insert(kind.file_name().to_string(), Arc::new(classifier));
        self
    }
}

impl ClassifierLoader for StaticLoader {
    fn name(&self) -> &str {
        "static"
    }

    fn load(&self, path: &Path) -> handsign_models::Result<GestureClassifierRef> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| self.models.get(name))
            .cloned()
            .ok_or_else(|| ModelError::NotFound(path.to_path_buf()))
    }
}

/// Registry with letters for `Alphabet` and digits for `Numbers`.
pub fn registry() -> Arc<ModelRegistry> {
    registry_with(
        StaticLoader::default()
            .with(ModelKind::Alphabet, CodeClassifier::new("ABC"))
            .with(ModelKind::Numbers, CodeClassifier::new("123")),
    )
}

pub fn registry_with(loader: StaticLoader) -> Arc<ModelRegistry> {
    Arc::new(
        ModelRegistry::new(
            ModelCatalog::new("/nonexistent/models"),
            Box::new(loader),
            ModelKind::Alphabet,
        )
        .unwrap(),
    )
}

/// Records what it was asked to say.
#[derive(Default)]
pub struct RecordingEngine {
    spoken: Mutex<Vec<String>>,
}

impl RecordingEngine {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    /// Wait until `count` utterances were recorded.
    pub fn wait_for(&self, count: usize) -> Vec<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.spoken.lock().unwrap().len() < count && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        self.spoken()
    }
}

impl SpeechEngine for RecordingEngine {
    fn name(&self) -> &str {
        "recording"
    }

    fn speak(&self, text: &str) -> handsign_speech::Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub recognizer: Recognizer,
    pub bus: Arc<InMemoryEventBus>,
    pub engine: Arc<RecordingEngine>,
}

pub fn harness(registry: Arc<ModelRegistry>) -> Harness {
    let bus = Arc::new(InMemoryEventBus::new());
    let engine = Arc::new(RecordingEngine::default());
    let speech = SpeechDispatcher::new(engine.clone(), SpeechPolicy::SpawnPerRequest);
    let recognizer = Recognizer::new(registry, speech, bus.clone());
    Harness {
        recognizer,
        bus,
        engine,
    }
}

/// A full hand whose first feature equals `code`.
pub fn hand(code: usize) -> LandmarkSet {
    let mut points = vec![(0.0_f32, 0.0_f32); HAND_LANDMARK_COUNT];
    points[0] = (code as f32, 0.0);
    points.into_iter().collect()
}

/// A hand with the wrong number of landmarks.
pub fn partial_hand(points: usize) -> LandmarkSet {
    vec![(0.1_f32, 0.1_f32); points].into_iter().collect()
}
