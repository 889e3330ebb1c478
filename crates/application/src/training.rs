//! Offline training: dataset file in, classifier artifact out.

use std::path::Path;

use handsign_dataset::{curate, label_counts, stratified_split, DatasetError, RawDataset, DEFAULT_TEST_FRACTION};
use handsign_forest::{ClassifierArtifact, ClassifierTrainer, ForestError, ForestParams, TrainingReport};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TARGET_LENGTH;

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Forest(#[from] ForestError),
}

pub type Result<T> = std::result::Result<T, TrainingError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingOptions {
    /// Feature vectors of any other length are dropped.
    pub target_length: usize,
    pub test_fraction: f64,
    pub forest: ForestParams,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            target_length: DEFAULT_TARGET_LENGTH,
            test_fraction: DEFAULT_TEST_FRACTION,
            forest: ForestParams::default(),
        }
    }
}

/// Train on `dataset` and write the artifact to `output`.
///
/// The split is drawn from the thread-local generator.
pub fn train_from_file(dataset: &Path, output: &Path, options: &TrainingOptions) -> Result<TrainingReport> {
    train_from_file_with_rng(dataset, output, options, &mut rand::thread_rng())
}

pub fn train_from_file_with_rng<R: Rng + ?Sized>(
    dataset: &Path,
    output: &Path,
    options: &TrainingOptions,
    rng: &mut R,
) -> Result<TrainingReport> {
    let raw = RawDataset::load(dataset)?;
    let curated = curate(&raw, options.target_length)?;
    tracing::info!(
        raw = raw.data.len(),
        kept = curated.len(),
        target_length = options.target_length,
        labels = ?label_counts(curated.samples()),
        "Dataset curated"
    );

    let split = stratified_split(&curated, options.test_fraction, rng)?;
    let trainer = ClassifierTrainer::new(options.forest.clone());
    let (model, report) = trainer.train_and_evaluate(&split)?;
    ClassifierArtifact::new(model).save(output)?;

    Ok(report)
}
