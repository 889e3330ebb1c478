//! Offline dataset handling for classifier training.
//!
//! Raw datasets come from landmark extraction runs and may contain vectors of
//! inconsistent length (missed landmarks, two hands in frame). Curation keeps
//! only vectors of the expected length before anything numeric happens, then
//! the curated samples are split into train/test sets per label.

mod curate;
mod raw;
mod split;

pub use curate::{curate, CuratedDataset};
pub use raw::{RawDataset, DATA_KEY, LABELS_KEY};
pub use split::{label_counts, stratified_split, DatasetSplit, DEFAULT_TEST_FRACTION};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset is missing required key '{0}'")]
    MissingKey(&'static str),
    #[error("dataset root must be a JSON object")]
    NotAnObject,
    #[error("unsupported label at index {index}: {value}")]
    InvalidLabel { index: usize, value: String },
    #[error("vectors and labels differ in length ({vectors} vectors, {labels} labels)")]
    LengthMismatch { vectors: usize, labels: usize },
    #[error("test fraction must be between 0 and 1 (exclusive), got {0}")]
    InvalidTestFraction(f64),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// A feature vector paired with its gesture label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: Vec<f32>,
    pub label: String,
}

impl LabeledSample {
    pub fn new(features: Vec<f32>, label: impl Into<String>) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }
}
