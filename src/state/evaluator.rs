use serde_json::Value;

use crate::state::binding::{BindingKey, BindingSet, DynamicBinding};
use crate::state::data_model::{self, Row};
use crate::state::element::{ElementDescriptor, PathError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("binding '{key}': {source}")]
    Path { key: String, source: PathError },
    #[error("binding '{key}' targets unknown widget '{widget_name}'")]
    UnknownWidget { key: String, widget_name: String },
    #[error("binding '{key}': unterminated '{{{{' in expression")]
    Unterminated { key: String },
}

/// Evaluates the template's dynamic properties once per data row.
pub trait ExpressionEvaluator {
    fn evaluate(
        &self,
        keys: &[BindingKey],
        template: &ElementDescriptor,
        items: &[Row],
    ) -> Result<BindingSet, EvalError>;
}

/// Resolves `{{currentItem.field}}` references inside string properties.
/// Missing fields render as an empty string. A property consisting of a
/// single reference keeps the referenced value's JSON type.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentItemEvaluator;

impl ExpressionEvaluator for CurrentItemEvaluator {
    fn evaluate(
        &self,
        keys: &[BindingKey],
        template: &ElementDescriptor,
        items: &[Row],
    ) -> Result<BindingSet, EvalError> {
        let mut bindings = BindingSet::new();

        for key in keys {
            let (widget_name, path) = key.split().map_err(|source| EvalError::Path {
                key: key.key.clone(),
                source,
            })?;
            let widget = template
                .find_by_name(widget_name)
                .ok_or_else(|| EvalError::UnknownWidget {
                    key: key.key.clone(),
                    widget_name: widget_name.to_string(),
                })?;

            let Some(Value::String(expression)) = widget.get(&path) else {
                continue;
            };

            let values = items
                .iter()
                .map(|row| render_expression(&expression, row))
                .collect::<Option<Vec<Value>>>()
                .ok_or_else(|| EvalError::Unterminated {
                    key: key.key.clone(),
                })?;
            bindings.push(DynamicBinding::new(widget_name, path, values));
        }

        Ok(bindings)
    }
}

/// Returns `None` when a `{{` is never closed.
fn render_expression(expression: &str, row: &Row) -> Option<Value> {
    let trimmed = expression.trim();
    if let Some(inner) = single_reference(trimmed) {
        return Some(lookup(inner, row).unwrap_or_else(|| Value::String(String::new())));
    }

    let mut out = String::new();
    let mut rest = expression;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}")?;
        if let Some(value) = lookup(after[..end].trim(), row) {
            out.push_str(&data_model::display_value(&value));
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Some(Value::String(out))
}

fn single_reference(expression: &str) -> Option<&str> {
    let inner = expression.strip_prefix("{{")?.strip_suffix("}}")?;
    (!inner.contains("{{") && !inner.contains("}}")).then(|| inner.trim())
}

fn lookup(reference: &str, row: &Row) -> Option<Value> {
    let path = reference.strip_prefix("currentItem.")?;
    let mut segments = path.split('.').map(str::trim);
    let first = segments.next()?;
    segments
        .try_fold(row.get(first)?, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
        .cloned()
}
