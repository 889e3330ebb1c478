//! Integration tests for reading dataset files from disk.

use handsign_dataset::{curate, stratified_split, DatasetError, RawDataset, DEFAULT_TEST_FRACTION};
use tempfile::tempdir;

#[test]
fn test_load_saved_dataset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let raw = RawDataset::new(
        vec![vec![0.0, 0.1], vec![0.2, 0.3], vec![0.4]],
        vec!["A".into(), "B".into(), "C".into()],
    );
    raw.save(&path).unwrap();

    let loaded = RawDataset::load(&path).unwrap();
    assert_eq!(loaded, raw);

    let curated = curate(&loaded, 2).unwrap();
    assert_eq!(curated.len(), 2);
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = RawDataset::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, DatasetError::Io(_)));
}

#[test]
fn test_load_file_without_labels_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, r#"{"data": [[0.0, 0.0]], "etiquetas": ["A"]}"#).unwrap();

    let err = RawDataset::load(&path).unwrap_err();
    assert!(matches!(err, DatasetError::MissingKey("labels")));
}

#[test]
fn test_curate_then_split_counts_match() {
    let mut data = Vec::new();
    let mut labels = Vec::new();
    for i in 0..60 {
        // Every fifth sample has a truncated vector.
        let len = if i % 5 == 0 { 40 } else { 42 };
        data.push(vec![i as f32; len]);
        labels.push(if i % 2 == 0 { "A" } else { "B" }.to_string());
    }
    let raw = RawDataset::new(data, labels);

    let curated = curate(&raw, 42).unwrap();
    assert_eq!(curated.len(), 48);
    assert!(curated.samples().iter().all(|s| s.features.len() == 42));

    let split = stratified_split(&curated, DEFAULT_TEST_FRACTION, &mut rand::thread_rng()).unwrap();
    assert_eq!(split.train.len() + split.test.len(), curated.len());
}
