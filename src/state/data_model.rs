use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

pub type Row = BTreeMap<String, Value>;
pub type Items = Vec<Row>;

/// Placeholder row published to tooling: every field of the first row mapped to `""`.
pub type RowShape = BTreeMap<String, Value>;

/// Reads the widget's `items` value leniently. Anything other than an array
/// counts as no rows; non-object entries inside the array become empty rows so
/// that row indices stay aligned with the source.
pub fn items_from_value(value: &Value) -> Items {
    match value {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| match entry {
                Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                _ => Row::new(),
            })
            .collect(),
        _ => Items::new(),
    }
}

pub fn items_to_value(items: &[Row]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|row| Value::Object(row.iter().map(|(k, v)| (k.clone(), v.clone())).collect()))
            .collect(),
    )
}

/// Derives the placeholder shape from the first entry of `items`.
pub fn derive_shape(items: &Value) -> RowShape {
    let Some(Value::Object(first)) = items.as_array().and_then(|rows| rows.first()) else {
        return RowShape::new();
    };
    first
        .keys()
        .map(|key| (key.clone(), Value::String(String::new())))
        .collect()
}

/// Tracks the last published row shape and reports when it must be republished.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ShapeTracker {
    current: Option<RowShape>,
}

impl ShapeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the tracker with a shape that was already published, e.g. the
    /// `childAutoComplete` value read back from a saved document.
    pub fn with_published(shape: RowShape) -> Self {
        Self {
            current: Some(shape),
        }
    }

    /// Returns the new shape when nothing has been derived yet, or when the
    /// first row's field set differs from the previous one in either direction.
    pub fn observe(&mut self, items: &Value) -> Option<RowShape> {
        let next = derive_shape(items);
        let changed = match self.current.as_ref() {
            None => true,
            Some(previous) => field_set_changed(previous, &next),
        };
        if !changed {
            return None;
        }
        self.current = Some(next.clone());
        Some(next)
    }
}

fn field_set_changed(previous: &RowShape, next: &RowShape) -> bool {
    let old: BTreeSet<&String> = previous.keys().collect();
    let new: BTreeSet<&String> = next.keys().collect();
    old.symmetric_difference(&new).next().is_some()
}

/// Formats a JSON value for display inside a rendered widget.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
