//! Bootstrap-aggregated ensemble of decision trees.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::tree::{argmax, DecisionTree, TreeParams};
use crate::{ForestError, GestureClassifier, Result};

/// How many candidate features each split looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    Log2,
    All,
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = match self {
            Self::Sqrt => (n_features as f64).sqrt() as usize,
            Self::Log2 => (n_features as f64).log2() as usize,
            Self::All => n_features,
            Self::Count(c) => *c,
        };
        n.clamp(1, n_features.max(1))
    }
}

/// Forest hyperparameters. Defaults match the usual library defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    /// Fixed seed for reproducible forests; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: None,
        }
    }
}

impl ForestParams {
    fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(ForestError::InvalidParams("n_trees must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(ForestError::InvalidParams(
                "min_samples_split must be at least 2".into(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForestError::InvalidParams(
                "min_samples_leaf must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Trained random forest bound to one feature length and label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    classes: Vec<String>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit a forest on feature rows `x` with labels `y`.
    pub fn fit(x: &[Vec<f32>], y: &[String], params: &ForestParams) -> Result<Self> {
        params.validate()?;

        if x.is_empty() {
            return Err(ForestError::InsufficientData("training set is empty".into()));
        }
        if x.len() != y.len() {
            return Err(ForestError::InsufficientData(format!(
                "{} feature rows but {} labels",
                x.len(),
                y.len()
            )));
        }

        let n_features = x[0].len();
        if n_features == 0 {
            return Err(ForestError::InsufficientData("feature vectors are empty".into()));
        }
        if let Some(row) = x.iter().find(|row| row.len() != n_features) {
            return Err(ForestError::FeatureLengthMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }

        let classes: Vec<String> = y
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let targets: Vec<usize> = y
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        let rows: Vec<&[f32]> = x.iter().map(|row| row.as_slice()).collect();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            max_features: params.max_features.resolve(n_features),
        };

        let mut master = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let n = rows.len();
        let trees = (0..params.n_trees)
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(master.gen());
                let samples: Vec<usize> = if params.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(
                    &rows,
                    &targets,
                    classes.len(),
                    samples,
                    &tree_params,
                    &mut rng,
                )
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            trees = trees.len(),
            classes = classes.len(),
            n_features,
            nodes = trees.iter().map(|t| t.node_count()).sum::<usize>(),
            "Random forest fitted"
        );

        Ok(Self {
            classes,
            n_features,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Per-class vote counts for a feature vector.
    pub fn votes(&self, features: &[f32]) -> Result<Vec<usize>> {
        self.check_length(features)?;
        let mut votes = vec![0; self.classes.len()];
        for tree in &self.trees {
            votes[tree.predict(features)] += 1;
        }
        Ok(votes)
    }

    /// Structural check for models read from disk.
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() || self.trees.is_empty() {
            return Err(ForestError::Artifact("model has no classes or trees".into()));
        }
        for tree in &self.trees {
            let (max_class, max_feature) = tree.max_indices();
            let out_of_range = max_class >= self.classes.len()
                || max_feature.is_some_and(|f| f >= self.n_features);
            if !tree.is_well_formed() || out_of_range {
                return Err(ForestError::Artifact("model contains a malformed tree".into()));
            }
        }
        Ok(())
    }

    fn check_length(&self, features: &[f32]) -> Result<()> {
        if features.len() != self.n_features {
            return Err(ForestError::FeatureLengthMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        Ok(())
    }
}

impl GestureClassifier for RandomForest {
    fn name(&self) -> &str {
        "random-forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, features: &[f32]) -> Result<String> {
        let votes = self.votes(features)?;
        Ok(self.classes[argmax(&votes)].clone())
    }
}
