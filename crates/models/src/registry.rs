//! The active classifier slot shared by the frame loop and model switches.

use std::sync::{Arc, PoisonError, RwLock};

use handsign_forest::{ForestError, GestureClassifierRef};

use crate::{ClassifierLoader, ForestArtifactLoader, ModelCatalog, ModelError, ModelKind, Result};

/// The classifier currently serving predictions.
///
/// Replaced as a whole on every switch, never mutated.
#[derive(Debug)]
pub struct ActiveModel {
    pub kind: ModelKind,
    pub classifier: GestureClassifierRef,
    /// Incremented by every successful switch.
    pub generation: u64,
}

/// A label together with the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub label: String,
    pub kind: ModelKind,
    pub generation: u64,
}

/// Loads classifiers by kind and holds the one used for inference.
///
/// Readers clone the active `Arc` and predict outside the lock; a switch
/// loads the new classifier first and then replaces the `Arc` in one
/// assignment, so every prediction sees either the old or the new model.
pub struct ModelRegistry {
    catalog: ModelCatalog,
    loader: Box<dyn ClassifierLoader>,
    active: RwLock<Arc<ActiveModel>>,
}

impl ModelRegistry {
    /// Create a registry and load `default_kind` as the active model.
    pub fn new(
        catalog: ModelCatalog,
        loader: Box<dyn ClassifierLoader>,
        default_kind: ModelKind,
    ) -> Result<Self> {
        let path = catalog.model_path(default_kind);
        tracing::info!(
            model = default_kind.name(),
            path = ?path,
            loader = loader.name(),
            "Loading default model"
        );
        let classifier = loader.load(&path)?;

        Ok(Self {
            catalog,
            loader,
            active: RwLock::new(Arc::new(ActiveModel {
                kind: default_kind,
                classifier,
                generation: 0,
            })),
        })
    }

    /// Registry reading JSON forest artifacts from `catalog`.
    pub fn with_forest_artifacts(catalog: ModelCatalog, default_kind: ModelKind) -> Result<Self> {
        Self::new(catalog, Box::new(ForestArtifactLoader), default_kind)
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Load a classifier without activating it.
    pub fn load(&self, kind: ModelKind) -> Result<GestureClassifierRef> {
        self.loader.load(&self.catalog.model_path(kind))
    }

    /// Load `kind` and make it the active model.
    ///
    /// On failure the previously active model keeps serving.
    pub fn set_active(&self, kind: ModelKind) -> Result<u64> {
        let classifier = match self.load(kind) {
            Ok(classifier) => classifier,
            Err(e) => {
                tracing::warn!(
                    model = kind.name(),
                    error = %e,
                    active = self.active_kind().name(),
                    "Model switch failed, keeping active model"
                );
                return Err(e);
            }
        };

        let mut slot = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let generation = slot.generation + 1;
        *slot = Arc::new(ActiveModel {
            kind,
            classifier,
            generation,
        });
        drop(slot);

        tracing::info!(model = kind.name(), generation, "Active model switched");
        Ok(generation)
    }

    /// Snapshot of the active model.
    pub fn active(&self) -> Arc<ActiveModel> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn active_kind(&self) -> ModelKind {
        self.active().kind
    }

    pub fn generation(&self) -> u64 {
        self.active().generation
    }

    /// Predict with the active model.
    ///
    /// A vector whose length does not match the active model is rejected
    /// with [`ModelError::FeatureLengthMismatch`] before the classifier runs.
    pub fn predict(&self, features: &[f32]) -> Result<Prediction> {
        let active = self.active();
        let expected = active.classifier.n_features();
        if features.len() != expected {
            return Err(ModelError::FeatureLengthMismatch {
                expected,
                actual: features.len(),
            });
        }

        let label = active.classifier.predict(features).map_err(|e| match e {
            ForestError::FeatureLengthMismatch { expected, actual } => {
                ModelError::FeatureLengthMismatch { expected, actual }
            }
            other => ModelError::PredictionFailed(other.to_string()),
        })?;

        Ok(Prediction {
            label,
            kind: active.kind,
            generation: active.generation,
        })
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self.active();
        f.debug_struct("ModelRegistry")
            .field("dir", &self.catalog.dir())
            .field("loader", &self.loader.name())
            .field("active", &active.kind)
            .field("generation", &active.generation)
            .finish()
    }
}
