//! On-disk bundle holding a trained classifier.
//!
//! The file is a JSON object with a single `model` key. It is written once
//! after training and read on every model load or switch.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ForestError, RandomForest, Result};

/// Key holding the serialized classifier.
pub const MODEL_KEY: &str = "model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub model: RandomForest,
}

impl ClassifierArtifact {
    pub fn new(model: RandomForest) -> Self {
        Self { model }
    }

    pub fn into_model(self) -> RandomForest {
        self.model
    }

    /// Write the artifact, replacing any existing file at `path`.
    ///
    /// The bundle is written next to the target and renamed into place so a
    /// concurrent reader never sees a half-written model.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec(self)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        tracing::info!(path = ?path, "Classifier artifact saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        if value.get(MODEL_KEY).is_none() {
            return Err(ForestError::Artifact(format!(
                "missing '{MODEL_KEY}' key in {}",
                path.display()
            )));
        }
        let artifact: Self = serde_json::from_value(value)?;
        artifact.model.validate()?;
        Ok(artifact)
    }
}
