//! Dataset file format.
//!
//! A dataset file is a JSON object with two parallel arrays:
//!
//! ```json
//! { "data": [[0.0, 0.12, ...], ...], "labels": ["A", "B", 3, ...] }
//! ```
//!
//! Numeric labels (digit datasets) are accepted and stored as text.

use std::path::Path;

use serde_json::{Map, Value};

use crate::{DatasetError, Result};

/// Key holding the feature vectors.
pub const DATA_KEY: &str = "data";
/// Key holding the labels.
pub const LABELS_KEY: &str = "labels";

/// Uncurated dataset as read from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    pub data: Vec<Vec<f32>>,
    pub labels: Vec<String>,
}

impl RawDataset {
    pub fn new(data: Vec<Vec<f32>>, labels: Vec<String>) -> Self {
        Self { data, labels }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&contents)?;
        tracing::info!(
            path = ?path,
            vectors = dataset.data.len(),
            labels = dataset.labels.len(),
            "Loaded raw dataset"
        );
        Ok(dataset)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Parse a dataset from an already decoded JSON value.
    ///
    /// Both keys must be present before anything else is looked at.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(DatasetError::NotAnObject);
        };
        let data = take_key(&mut map, DATA_KEY)?;
        let labels = take_key(&mut map, LABELS_KEY)?;

        let data: Vec<Vec<f32>> = serde_json::from_value(data)?;
        let labels: Vec<Value> = serde_json::from_value(labels)?;
        let labels = labels
            .into_iter()
            .enumerate()
            .map(|(index, value)| label_text(index, value))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { data, labels })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(DATA_KEY.to_string(), serde_json::json!(self.data));
        map.insert(LABELS_KEY.to_string(), serde_json::json!(self.labels));
        Value::Object(map)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.to_value())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn take_key(map: &mut Map<String, Value>, key: &'static str) -> Result<Value> {
    map.remove(key).ok_or(DatasetError::MissingKey(key))
}

fn label_text(index: usize, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DatasetError::InvalidLabel {
            index,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_and_numeric_labels() {
        let json = r#"{"data": [[0.0, 1.0], [0.5]], "labels": ["A", 7]}"#;
        let raw = RawDataset::from_json_str(json).unwrap();
        assert_eq!(raw.data, vec![vec![0.0, 1.0], vec![0.5]]);
        assert_eq!(raw.labels, vec!["A".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_missing_data_key() {
        let json = r#"{"labels": ["A"]}"#;
        let err = RawDataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, DatasetError::MissingKey("data")));
    }

    #[test]
    fn test_missing_labels_key() {
        let json = r#"{"data": [[0.0]]}"#;
        let err = RawDataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, DatasetError::MissingKey("labels")));
    }

    #[test]
    fn test_non_object_root() {
        let err = RawDataset::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, DatasetError::NotAnObject));
    }

    #[test]
    fn test_invalid_label() {
        let json = r#"{"data": [[0.0]], "labels": [[1]]}"#;
        let err = RawDataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidLabel { index: 0, .. }));
    }
}
