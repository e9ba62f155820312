use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::state::data_model::{self, Row};

#[derive(Debug, thiserror::Error)]
pub enum JsonIoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSON root is not an array")]
    NotAnArray,
    #[error("JSON array contains non-object elements")]
    NotArrayOfObjects,
}

/// Loads a list's `items` from a JSON array of objects.
pub fn load_items(path: &Path) -> Result<Vec<Row>, JsonIoError> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    match value {
        Value::Array(arr) => {
            let mut rows = Vec::with_capacity(arr.len());
            for item in arr {
                match item {
                    Value::Object(map) => {
                        rows.push(map.into_iter().collect());
                    }
                    _ => return Err(JsonIoError::NotArrayOfObjects),
                }
            }
            Ok(rows)
        }
        _ => Err(JsonIoError::NotAnArray),
    }
}

pub fn save_items(path: &Path, items: &[Row]) -> Result<(), JsonIoError> {
    let json = serde_json::to_string_pretty(&data_model::items_to_value(items))?;
    super::atomic_write_string(path, &json)?;
    Ok(())
}
