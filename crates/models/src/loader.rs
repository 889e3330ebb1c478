use std::path::Path;
use std::sync::Arc;

use handsign_forest::{ClassifierArtifact, GestureClassifierRef};

use crate::{ModelError, Result};

/// Factory turning an artifact path into a ready classifier.
///
/// The registry depends on this abstraction so tests and alternative model
/// formats can plug in without touching the swap logic.
pub trait ClassifierLoader: Send + Sync {
    /// Human-readable loader name (e.g. "forest-artifact").
    fn name(&self) -> &str;

    fn load(&self, path: &Path) -> Result<GestureClassifierRef>;
}

/// Loads JSON random forest artifacts written by the trainer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForestArtifactLoader;

impl ClassifierLoader for ForestArtifactLoader {
    fn name(&self) -> &str {
        "forest-artifact"
    }

    fn load(&self, path: &Path) -> Result<GestureClassifierRef> {
        if !path.is_file() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let artifact = ClassifierArtifact::load(path).map_err(|e| ModelError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(artifact.into_model()))
    }
}
