//! Fitting a forest on a curated split and scoring it on the held-out half.

use std::fmt;

use handsign_dataset::{DatasetSplit, LabeledSample};

use crate::{ForestError, ForestParams, GestureClassifier, RandomForest, Result};

/// Held-out evaluation of a freshly trained model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Fraction of test samples predicted exactly, in `[0, 1]`.
    pub accuracy: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub classes: Vec<String>,
}

impl TrainingReport {
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = self.accuracy_percent();
        // Whole numbers keep one decimal: `100.0`, not `100`.
        if percent.is_finite() && percent.fract() == 0.0 {
            write!(f, "{percent:.1}% Muestra Clasificada Correctamente !")
        } else {
            write!(f, "{percent}% Muestra Clasificada Correctamente !")
        }
    }
}

/// Fraction of positions where `predicted` and `expected` agree.
///
/// Returns `0.0` for empty input.
pub fn accuracy_score(predicted: &[String], expected: &[String]) -> f64 {
    let n = predicted.len().min(expected.len());
    if n == 0 {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(expected)
        .filter(|(p, e)| p == e)
        .count();
    correct as f64 / n as f64
}

/// Trains random forests with a fixed set of hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct ClassifierTrainer {
    params: ForestParams,
}

impl ClassifierTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn fit(&self, train: &[LabeledSample]) -> Result<RandomForest> {
        if train.is_empty() {
            return Err(ForestError::InsufficientData("training set is empty".into()));
        }
        let (x, y): (Vec<Vec<f32>>, Vec<String>) = train
            .iter()
            .map(|s| (s.features.clone(), s.label.clone()))
            .unzip();
        RandomForest::fit(&x, &y, &self.params)
    }

    /// Score `model` on `test`.
    ///
    /// An empty test set has no meaningful accuracy and fails with
    /// [`ForestError::InsufficientData`].
    pub fn evaluate(
        &self,
        model: &dyn GestureClassifier,
        train_samples: usize,
        test: &[LabeledSample],
    ) -> Result<TrainingReport> {
        if test.is_empty() {
            return Err(ForestError::InsufficientData("test set is empty".into()));
        }
        let predicted = test
            .iter()
            .map(|s| model.predict(&s.features))
            .collect::<Result<Vec<_>>>()?;
        let expected: Vec<String> = test.iter().map(|s| s.label.clone()).collect();

        Ok(TrainingReport {
            accuracy: accuracy_score(&predicted, &expected),
            train_samples,
            test_samples: test.len(),
            classes: model.classes().to_vec(),
        })
    }

    /// Fit on `split.train` and evaluate on `split.test`.
    pub fn train_and_evaluate(&self, split: &DatasetSplit) -> Result<(RandomForest, TrainingReport)> {
        tracing::info!(
            train = split.train.len(),
            test = split.test.len(),
            trees = self.params.n_trees,
            "Training random forest"
        );
        let model = self.fit(&split.train)?;
        let report = self.evaluate(&model, split.train.len(), &split.test)?;
        tracing::info!(accuracy = report.accuracy, "Training finished");
        Ok((model, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accuracy_score() {
        let predicted = labels(&["A", "B", "B", "A"]);
        let expected = labels(&["A", "B", "A", "A"]);
        assert!((accuracy_score(&predicted, &expected) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_score_empty() {
        assert_eq!(accuracy_score(&[], &[]), 0.0);
    }

    #[test]
    fn test_report_line() {
        let report = TrainingReport {
            accuracy: 0.5,
            train_samples: 8,
            test_samples: 2,
            classes: labels(&["A", "B"]),
        };
        assert_eq!(report.to_string(), "50.0% Muestra Clasificada Correctamente !");
    }

    #[test]
    fn test_report_line_keeps_decimal_on_whole_numbers() {
        let mut report = TrainingReport {
            accuracy: 1.0,
            train_samples: 8,
            test_samples: 2,
            classes: labels(&["A", "B"]),
        };
        assert_eq!(report.to_string(), "100.0% Muestra Clasificada Correctamente !");

        report.accuracy = 0.0;
        assert_eq!(report.to_string(), "0.0% Muestra Clasificada Correctamente !");

        report.accuracy = 0.125;
        assert_eq!(report.to_string(), "12.5% Muestra Clasificada Correctamente !");
    }

    #[test]
    fn test_evaluate_empty_test_set_is_insufficient_data() {
        let train = vec![
            LabeledSample::new(vec![0.1, 0.1], "A"),
            LabeledSample::new(vec![0.2, 0.1], "A"),
            LabeledSample::new(vec![0.9, 0.8], "B"),
            LabeledSample::new(vec![0.8, 0.9], "B"),
        ];
        let trainer = ClassifierTrainer::new(ForestParams {
            n_trees: 3,
            seed: Some(5),
            ..Default::default()
        });
        let model = trainer.fit(&train).unwrap();
        assert!(matches!(
            trainer.evaluate(&model, train.len(), &[]),
            Err(ForestError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_fit_empty_is_insufficient_data() {
        let trainer = ClassifierTrainer::default();
        assert!(matches!(
            trainer.fit(&[]),
            Err(ForestError::InsufficientData(_))
        ));
    }
}
