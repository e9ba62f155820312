use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::binding::BindingKey;
use crate::state::data_model::{self, Items, RowShape};
use crate::state::expander::RenderMode;

pub const DEFAULT_WIDGET_NAME: &str = "List1";
pub const DEFAULT_ITEM_BACKGROUND: &str = "#FFFFFF";
pub const CHILD_AUTOCOMPLETE: &str = "childAutoComplete";

/// Configuration of one list widget as stored by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    #[serde(default = "default_widget_name")]
    pub widget_name: String,
    /// Kept as raw JSON: malformed data must read as zero rows, not fail the load.
    #[serde(default = "empty_items")]
    pub items: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_path: Option<PathBuf>,
    #[serde(default)]
    pub grid_gap: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination_per_page: Option<usize>,
    #[serde(default = "default_item_background")]
    pub item_background_color: String,
    #[serde(default)]
    pub dynamic_binding_path_list: Vec<BindingKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_list_item_click: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_auto_complete: Option<Value>,
    #[serde(default)]
    pub render_mode: RenderMode,
}

fn default_widget_name() -> String {
    DEFAULT_WIDGET_NAME.to_string()
}

fn empty_items() -> Value {
    Value::Array(Vec::new())
}

fn default_item_background() -> String {
    DEFAULT_ITEM_BACKGROUND.to_string()
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            widget_name: default_widget_name(),
            items: empty_items(),
            items_path: None,
            grid_gap: 0,
            pagination_per_page: None,
            item_background_color: default_item_background(),
            dynamic_binding_path_list: Vec::new(),
            on_list_item_click: None,
            child_auto_complete: None,
            render_mode: RenderMode::default(),
        }
    }
}

impl ListConfig {
    pub fn items(&self) -> Items {
        data_model::items_from_value(&self.items)
    }

    pub fn row_count(&self) -> usize {
        self.items.as_array().map(Vec::len).unwrap_or(0)
    }

    pub fn set_items(&mut self, items: &[data_model::Row]) {
        self.items = data_model::items_to_value(items);
    }

    /// The `currentItem` shape last published to `childAutoComplete`, if any.
    pub fn published_shape(&self) -> Option<RowShape> {
        let current = self.child_auto_complete.as_ref()?.get("currentItem")?;
        let map = current.as_object()?;
        Some(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// Write side of the host's widget store.
pub trait StateStore {
    fn update_widget_property(&mut self, name: &str, value: Value);
}

impl StateStore for ListConfig {
    fn update_widget_property(&mut self, name: &str, value: Value) {
        match name {
            CHILD_AUTOCOMPLETE => self.child_auto_complete = Some(value),
            _ => log::debug!("ignoring update of unknown list property '{name}'"),
        }
    }
}
