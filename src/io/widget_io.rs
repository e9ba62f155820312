use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::io::json_io::{self, JsonIoError};
use crate::state::config::{ListConfig, StateStore};
use crate::state::element::ElementDescriptor;

#[derive(Debug, thiserror::Error)]
pub enum WidgetIoError {
    #[error("{0}")]
    Items(#[from] JsonIoError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("widget document parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk form of one list widget: its configuration and the canvas whose
/// first child is the row template.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WidgetDocument {
    #[serde(default)]
    pub config: ListConfig,
    pub canvas: ElementDescriptor,
}

impl StateStore for WidgetDocument {
    fn update_widget_property(&mut self, name: &str, value: Value) {
        self.config.update_widget_property(name, value);
    }
}

/// Resolves `itemsPath` against the document's directory.
pub fn items_path_for(document_path: &Path, config: &ListConfig) -> Option<PathBuf> {
    let items_path = config.items_path.as_ref()?;
    if items_path.is_absolute() {
        return Some(items_path.clone());
    }
    let base = document_path.parent().unwrap_or_else(|| Path::new("."));
    Some(base.join(items_path))
}

/// Loads a widget document. When it names an external items file, that file
/// replaces any inline `items`.
pub fn load_widget(path: &Path) -> Result<WidgetDocument, WidgetIoError> {
    let content = fs::read_to_string(path)?;
    let mut document: WidgetDocument = serde_json::from_str(&content)?;

    if let Some(items_path) = items_path_for(path, &document.config) {
        let items = json_io::load_items(&items_path)?;
        document.config.set_items(&items);
    }

    Ok(document)
}

/// Saves atomically. Items that came from an external file are not inlined.
pub fn save_widget(path: &Path, document: &WidgetDocument) -> Result<(), WidgetIoError> {
    let content = if document.config.items_path.is_some() {
        let mut detached = document.clone();
        detached.config.items = Value::Array(Vec::new());
        serde_json::to_string_pretty(&detached)?
    } else {
        serde_json::to_string_pretty(document)?
    };
    super::atomic_write_string(path, &content)?;
    Ok(())
}
