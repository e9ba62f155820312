use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::element::{ElementDescriptor, PathError, PropertyPath};

/// One entry of the widget's `dynamicBindingPathList`, as stored in config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingKey {
    pub key: String,
}

impl BindingKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Splits `Widget.prop.nested` into the widget name and its property path.
    pub fn split(&self) -> Result<(&str, PropertyPath), PathError> {
        let (widget_name, path) = self.key.split_once('.').ok_or(PathError::Empty)?;
        let widget_name = widget_name.trim();
        if widget_name.is_empty() {
            return Err(PathError::Empty);
        }
        Ok((widget_name, path.parse()?))
    }
}

/// A widget property whose value was evaluated once per data row.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicBinding {
    pub widget_name: String,
    pub path: PropertyPath,
    pub values: Vec<Value>,
}

impl DynamicBinding {
    pub fn new(widget_name: impl Into<String>, path: PropertyPath, values: Vec<Value>) -> Self {
        Self {
            widget_name: widget_name.into(),
            path,
            values,
        }
    }

    pub fn from_key(key: &BindingKey, values: Vec<Value>) -> Result<Self, PathError> {
        let (widget_name, path) = key.split()?;
        Ok(Self::new(widget_name, path, values))
    }

    /// The evaluated value for `row_index`, if the evaluator produced one.
    pub fn value_for_row(&self, row_index: usize) -> Option<&Value> {
        self.values.get(row_index)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct BindingSet {
    bindings: Vec<DynamicBinding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, binding: DynamicBinding) {
        self.bindings.push(binding);
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicBinding> {
        self.bindings.iter()
    }

    /// Applies every binding that targets `node` using the value for
    /// `row_index`. Bindings with too few values leave the literal in place,
    /// and so does a value of the wrong type for a typed field.
    pub fn apply_to_node(&self, mut node: ElementDescriptor, row_index: usize) -> ElementDescriptor {
        let widget_name = node.widget_name.clone();
        for binding in self
            .bindings
            .iter()
            .filter(|binding| binding.widget_name == widget_name)
        {
            let Some(value) = binding.value_for_row(row_index) else {
                continue;
            };
            if let Err(err) = node.set(&binding.path, value.clone()) {
                log::warn!(
                    "skipping binding {}.{} for row {row_index}: {err}",
                    binding.widget_name,
                    binding.path
                );
            }
        }
        node
    }
}

impl FromIterator<DynamicBinding> for BindingSet {
    fn from_iter<T: IntoIterator<Item = DynamicBinding>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
