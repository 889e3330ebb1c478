use std::path::Path;

use handsign_application::{train_from_file_with_rng, TrainingError, TrainingOptions};
use handsign_dataset::{DatasetError, RawDataset};
use handsign_forest::ForestParams;
use handsign_landmarks::FEATURE_LENGTH;
use handsign_models::{ModelCatalog, ModelKind, ModelRegistry};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

/// Two well separated gestures plus a few truncated captures.
fn write_dataset(path: &Path) {
    let mut data: Vec<Vec<f32>> = Vec::new();
    let mut labels = Vec::new();
    for i in 0..30 {
        let jitter = (i % 5) as f32 * 0.01;
        data.push(vec![0.1 + jitter; FEATURE_LENGTH]);
        labels.push("A".to_string());
        data.push(vec![0.7 - jitter; FEATURE_LENGTH]);
        labels.push("B".to_string());
    }
    for _ in 0..4 {
        data.push(vec![0.5; FEATURE_LENGTH / 2]);
        labels.push("A".to_string());
    }
    RawDataset::new(data, labels).save(path).unwrap();
}

fn options() -> TrainingOptions {
    TrainingOptions {
        forest: ForestParams {
            n_trees: 10,
            seed: Some(3),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_train_from_file_writes_usable_artifact() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("data.json");
    write_dataset(&dataset);

    let catalog = ModelCatalog::new(dir.path().join("models"));
    let output = catalog.model_path(ModelKind::Alphabet);
    let mut rng = StdRng::seed_from_u64(11);
    let report = train_from_file_with_rng(&dataset, &output, &options(), &mut rng).unwrap();

    assert_eq!(report.train_samples, 48);
    assert_eq!(report.test_samples, 12);
    assert!((0.0..=1.0).contains(&report.accuracy));
    let line = report.to_string();
    let percent = line
        .strip_suffix("% Muestra Clasificada Correctamente !")
        .unwrap();
    assert_eq!(percent.parse::<f64>().unwrap(), report.accuracy * 100.0);
    assert!(percent.contains('.'), "percentage keeps a decimal: {line}");

    let registry = ModelRegistry::with_forest_artifacts(catalog, ModelKind::Alphabet).unwrap();
    assert_eq!(registry.predict(&[0.1; FEATURE_LENGTH]).unwrap().label, "A");
    assert_eq!(registry.predict(&[0.7; FEATURE_LENGTH]).unwrap().label, "B");
}

#[test]
fn test_missing_labels_key_is_fatal() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("data.json");
    std::fs::write(&dataset, r#"{"data": [[0.1, 0.2]]}"#).unwrap();
    let output = dir.path().join("model.json");

    let err = train_from_file_with_rng(&dataset, &output, &options(), &mut StdRng::seed_from_u64(1))
        .unwrap_err();
    assert!(matches!(
        err,
        TrainingError::Dataset(DatasetError::MissingKey("labels"))
    ));
    assert!(!output.exists());
}

#[test]
fn test_no_vector_of_target_length_is_fatal() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("data.json");
    write_dataset(&dataset);
    let output = dir.path().join("model.json");

    let options = TrainingOptions {
        target_length: 7,
        ..options()
    };
    let err = train_from_file_with_rng(&dataset, &output, &options, &mut StdRng::seed_from_u64(1))
        .unwrap_err();
    assert!(matches!(err, TrainingError::Forest(_)));
    assert!(!output.exists());
}
