//! Hand landmark types and the feature extraction that feeds the classifiers.
//!
//! Also defines the contracts for the two upstream collaborators: the capture
//! device ([`FrameSource`]) and the landmark detector ([`HandDetector`]).

mod features;
mod frame;

pub use features::{extract_features, feature_length, FEATURE_LENGTH, HAND_LANDMARK_COUNT};
pub use frame::{Frame, FrameSource, HandDetector};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum LandmarkError {
    #[error("landmark set is empty")]
    Empty,
    #[error("capture failed: {0}")]
    Capture(String),
    #[error("hand detection failed: {0}")]
    Detection(String),
}

pub type Result<T> = std::result::Result<T, LandmarkError>;

/// A single detected point in normalized image coordinates.
///
/// Serialized as an `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Landmark {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Landmark> for (f32, f32) {
    fn from(l: Landmark) -> Self {
        (l.x, l.y)
    }
}

/// The ordered landmarks of one detected hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Feature vector for this hand, see [`extract_features`].
    pub fn features(&self) -> Result<Vec<f32>> {
        extract_features(&self.0)
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self(points)
    }
}

impl FromIterator<(f32, f32)> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = (f32, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(Landmark::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_set_deserialize_pairs() {
        let json = "[[0.5, 0.25], [0.75, 1.0]]";
        let set: LandmarkSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.points()[1], Landmark::new(0.75, 1.0));
    }

    #[test]
    fn test_landmark_set_serialize_pairs() {
        let set: LandmarkSet = vec![(0.5, 0.25)].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[[0.5,0.25]]");
    }
}
