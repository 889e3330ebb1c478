//! Landmark to feature-vector conversion.

use crate::{Landmark, LandmarkError, Result};

/// Points per hand produced by the reference landmark detector.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Feature length for a full hand.
pub const FEATURE_LENGTH: usize = feature_length(HAND_LANDMARK_COUNT);

/// Feature length produced for a landmark set of `landmarks` points.
pub const fn feature_length(landmarks: usize) -> usize {
    landmarks * 2
}

/// Convert a hand's landmarks into a translation-invariant feature vector.
///
/// Each landmark contributes `x - min_x` and `y - min_y`, in landmark order,
/// so the output has `2 * landmarks.len()` values. Scale and rotation are
/// left untouched.
pub fn extract_features(landmarks: &[Landmark]) -> Result<Vec<f32>> {
    if landmarks.is_empty() {
        return Err(LandmarkError::Empty);
    }

    let (min_x, min_y) = landmarks
        .iter()
        .fold((f32::INFINITY, f32::INFINITY), |(mx, my), l| {
            (mx.min(l.x), my.min(l.y))
        });

    let mut features = Vec::with_capacity(feature_length(landmarks.len()));
    for l in landmarks {
        features.push(l.x - min_x);
        features.push(l.y - min_y);
    }
    Ok(features)
}
