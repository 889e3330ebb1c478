//! Length filtering of raw samples.

use crate::{DatasetError, LabeledSample, RawDataset, Result};

/// Samples that all share the same feature length.
#[derive(Debug, Clone, PartialEq)]
pub struct CuratedDataset {
    samples: Vec<LabeledSample>,
    feature_length: usize,
}

impl CuratedDataset {
    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<LabeledSample> {
        self.samples
    }

    pub fn feature_length(&self) -> usize {
        self.feature_length
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Keep only samples whose vector has exactly `target_length` values.
///
/// `data` and `labels` must have the same length; a raw dataset where they
/// differ fails before any filtering.
pub fn curate(raw: &RawDataset, target_length: usize) -> Result<CuratedDataset> {
    if raw.data.len() != raw.labels.len() {
        return Err(DatasetError::LengthMismatch {
            vectors: raw.data.len(),
            labels: raw.labels.len(),
        });
    }

    let kept: Vec<(&Vec<f32>, &String)> = raw
        .data
        .iter()
        .zip(&raw.labels)
        .filter(|(v, _)| v.len() == target_length)
        .collect();

    let dropped = raw.data.len() - kept.len();
    if dropped > 0 {
        tracing::debug!(
            dropped,
            kept = kept.len(),
            target_length,
            "Dropped samples with unexpected feature length"
        );
    }

    let samples = kept
        .into_iter()
        .map(|(features, label)| LabeledSample::new(features.clone(), label.clone()))
        .collect();

    Ok(CuratedDataset {
        samples,
        feature_length: target_length,
    })
}
