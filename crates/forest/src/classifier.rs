use std::sync::Arc;

/// A trained model that maps a feature vector to a gesture label.
///
/// Implementations are immutable after training so a single instance can be
/// shared between the frame loop and whoever swaps models.
pub trait GestureClassifier: Send + Sync + std::fmt::Debug {
    /// Human-readable model family (e.g. "random-forest").
    fn name(&self) -> &str;

    /// Feature vector length this model was trained on.
    fn n_features(&self) -> usize;

    /// Labels the model can produce, sorted.
    fn classes(&self) -> &[String];

    /// Predict the label for one feature vector.
    ///
    /// Fails with `FeatureLengthMismatch` when `features.len()` differs from
    /// [`n_features`](Self::n_features).
    fn predict(&self, features: &[f32]) -> crate::Result<String>;
}

/// Shared classifier handle.
pub type GestureClassifierRef = Arc<dyn GestureClassifier>;
