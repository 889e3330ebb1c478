//! Random forest gesture classifier.
//!
//! Provides the tree ensemble itself, the trainer that fits it on a curated
//! split and scores it on the held-out half, and the artifact file that ships
//! a trained model to the recognizer.

mod artifact;
mod classifier;
mod forest;
mod trainer;
mod tree;

pub use artifact::{ClassifierArtifact, MODEL_KEY};
pub use classifier::{GestureClassifier, GestureClassifierRef};
pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use trainer::{accuracy_score, ClassifierTrainer, TrainingReport};

#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    #[error("not enough data to train: {0}")]
    InsufficientData(String),
    #[error("feature length mismatch: classifier expects {expected}, got {actual}")]
    FeatureLengthMismatch { expected: usize, actual: usize },
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("artifact error: {0}")]
    Artifact(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForestError>;
