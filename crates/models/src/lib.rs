mod loader;
mod registry;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use loader::{ClassifierLoader, ForestArtifactLoader};
pub use registry::{ActiveModel, ModelRegistry, Prediction};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to load {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
    #[error("feature length mismatch: active model expects {expected}, got {actual}")]
    FeatureLengthMismatch { expected: usize, actual: usize },
    #[error("prediction failed: {0}")]
    PredictionFailed(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// The gesture vocabularies a classifier can be trained for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Fingerspelled letters.
    #[default]
    Alphabet,
    /// Digit signs.
    Numbers,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Alphabet, ModelKind::Numbers];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Alphabet => "alphabet",
            Self::Numbers => "numbers",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Alphabet => "model.json",
            Self::Numbers => "model_numbers.json",
        }
    }

    /// Label shown in the model selector.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Alphabet => "ABECEDARIO",
            Self::Numbers => "NUMEROS",
        }
    }

    /// Accepts either the identifier or the selector label, any case.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(name)
                    || kind.display_name().eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| ModelError::UnknownModel(name.to_string()))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

pub fn models_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("handsign")
        .join("models")
}

/// Where trained artifacts live on disk.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub kind: ModelKind,
    pub path: PathBuf,
    pub is_available: bool,
}

impl ModelCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self, kind: ModelKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    pub fn is_available(&self, kind: ModelKind) -> bool {
        self.model_path(kind).is_file()
    }

    pub fn list(&self) -> Vec<ModelInfo> {
        ModelKind::ALL
            .iter()
            .map(|&kind| ModelInfo {
                kind,
                path: self.model_path(kind),
                is_available: self.is_available(kind),
            })
            .collect()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new(models_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifiers_and_labels() {
        assert_eq!(ModelKind::parse("alphabet").unwrap(), ModelKind::Alphabet);
        assert_eq!(ModelKind::parse("ABECEDARIO").unwrap(), ModelKind::Alphabet);
        assert_eq!(ModelKind::parse("Numeros").unwrap(), ModelKind::Numbers);
        assert_eq!(" numbers ".parse::<ModelKind>().unwrap(), ModelKind::Numbers);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            ModelKind::parse("colors"),
            Err(ModelError::UnknownModel(name)) if name == "colors"
        ));
    }

    #[test]
    fn test_catalog_paths() {
        let catalog = ModelCatalog::new("/tmp/handsign-models");
        assert_eq!(
            catalog.model_path(ModelKind::Numbers),
            PathBuf::from("/tmp/handsign-models/model_numbers.json")
        );
        assert_eq!(catalog.list().len(), 2);
    }
}
