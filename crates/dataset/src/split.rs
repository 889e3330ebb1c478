//! Stratified train/test splitting.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{CuratedDataset, DatasetError, LabeledSample, Result};

/// Fraction of each label's samples held out for testing.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, Default)]
pub struct DatasetSplit {
    pub train: Vec<LabeledSample>,
    pub test: Vec<LabeledSample>,
}

/// Number of samples per label.
pub fn label_counts(samples: &[LabeledSample]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for sample in samples {
        *counts.entry(sample.label.clone()).or_insert(0) += 1;
    }
    counts
}

/// Split curated samples so each label keeps its share in both halves.
///
/// Every label is split on its own: its samples are shuffled and
/// `round(count * test_fraction)` of them go to the test set. Both halves are
/// shuffled afterwards. Each curated sample ends up in exactly one half.
pub fn stratified_split<R: Rng + ?Sized>(
    curated: &CuratedDataset,
    test_fraction: f64,
    rng: &mut R,
) -> Result<DatasetSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DatasetError::InvalidTestFraction(test_fraction));
    }

    let mut by_label: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, sample) in curated.samples().iter().enumerate() {
        by_label.entry(sample.label.as_str()).or_default().push(i);
    }

    let mut split = DatasetSplit::default();
    for (label, mut indices) in by_label {
        indices.shuffle(rng);
        let n_test = ((indices.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(indices.len());

        tracing::debug!(
            label,
            total = indices.len(),
            test = n_test,
            "Stratified label split"
        );

        let (test, train) = indices.split_at(n_test);
        split
            .test
            .extend(test.iter().map(|&i| curated.samples()[i].clone()));
        split
            .train
            .extend(train.iter().map(|&i| curated.samples()[i].clone()));
    }

    split.train.shuffle(rng);
    split.test.shuffle(rng);
    Ok(split)
}
