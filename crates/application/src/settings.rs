use std::path::{Path, PathBuf};
use std::time::Duration;

use handsign_models::ModelKind;
use handsign_speech::SpeechPolicy;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FRAME_INTERVAL_MS;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recognizer configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerSettings {
    pub frame_interval_ms: u64,
    pub default_model: ModelKind,
    pub speech_enabled: bool,
    pub speech_policy: SpeechPolicy,
    /// Overrides the per-user models directory.
    pub models_dir: Option<PathBuf>,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            default_model: ModelKind::Alphabet,
            speech_enabled: true,
            speech_policy: SpeechPolicy::SpawnPerRequest,
            models_dir: None,
        }
    }
}

impl RecognizerSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Timer period, never zero.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}
