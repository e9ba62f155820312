use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CANVAS_WIDGET: &str = "CANVAS_WIDGET";
pub const CONTAINER_WIDGET: &str = "CONTAINER_WIDGET";
pub const TEXT_WIDGET: &str = "TEXT_WIDGET";
pub const BUTTON_WIDGET: &str = "BUTTON_WIDGET";
pub const IMAGE_WIDGET: &str = "IMAGE_WIDGET";

/// Position of a widget on the layout grid, in grid rows and columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpan {
    #[serde(default)]
    pub top_row: i64,
    #[serde(default)]
    pub bottom_row: i64,
    #[serde(default)]
    pub left_column: i64,
    #[serde(default)]
    pub right_column: i64,
}

impl GridSpan {
    pub fn rows(top_row: i64, bottom_row: i64) -> Self {
        Self {
            top_row,
            bottom_row,
            ..Self::default()
        }
    }

    /// Saturates instead of overflowing on out-of-range rows from a document.
    pub fn row_span(&self) -> i64 {
        self.bottom_row.saturating_sub(self.top_row)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(default)]
    pub resize_disabled: bool,
    #[serde(default)]
    pub drag_disabled: bool,
    #[serde(default)]
    pub drop_disabled: bool,
    #[serde(default)]
    pub settings_control_disabled: bool,
}

impl Interaction {
    /// Every authoring affordance switched off.
    pub fn locked() -> Self {
        Self {
            resize_disabled: true,
            drag_disabled: true,
            drop_disabled: true,
            settings_control_disabled: true,
        }
    }

    pub fn is_locked(&self) -> bool {
        *self == Self::locked()
    }
}

/// A node of the widget tree handed to the list widget by the host.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub widget_id: String,
    #[serde(default)]
    pub widget_name: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(flatten)]
    pub span: GridSpan,
    #[serde(flatten)]
    pub interaction: Interaction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementDescriptor>,
}

impl ElementDescriptor {
    pub fn new(
        widget_id: impl Into<String>,
        widget_name: impl Into<String>,
        widget_type: impl Into<String>,
    ) -> Self {
        Self {
            widget_id: widget_id.into(),
            widget_name: widget_name.into(),
            widget_type: widget_type.into(),
            ..Self::default()
        }
    }

    pub fn with_span(mut self, span: GridSpan) -> Self {
        self.span = span;
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: Value) -> Self {
        self.props.insert(name.into(), value);
        self
    }

    pub fn with_child(mut self, child: ElementDescriptor) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = interaction;
        self
    }

    /// Depth-first, pre-order walk over this node and all of its descendants.
    pub fn nodes(&self) -> Vec<&ElementDescriptor> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Rebuilds the subtree by passing every node through `f`, parent first.
    pub fn map_tree<F>(self, f: &mut F) -> Self
    where
        F: FnMut(ElementDescriptor) -> ElementDescriptor,
    {
        let mut node = f(self);
        let children = std::mem::take(&mut node.children);
        node.children = children.into_iter().map(|child| child.map_tree(f)).collect();
        node
    }

    pub fn find_by_name(&self, widget_name: &str) -> Option<&ElementDescriptor> {
        self.nodes()
            .into_iter()
            .find(|node| node.widget_name == widget_name)
    }

    /// Returns the first widget id that appears more than once in the subtree.
    pub fn duplicate_widget_id(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.nodes()
            .into_iter()
            .map(|node| node.widget_id.as_str())
            .find(|id| !seen.insert(*id))
    }

    pub fn get(&self, path: &PropertyPath) -> Option<Value> {
        match path {
            PropertyPath::BackgroundColor => {
                self.background_color.clone().map(Value::String)
            }
            PropertyPath::TopRow => Some(Value::from(self.span.top_row)),
            PropertyPath::BottomRow => Some(Value::from(self.span.bottom_row)),
            PropertyPath::LeftColumn => Some(Value::from(self.span.left_column)),
            PropertyPath::RightColumn => Some(Value::from(self.span.right_column)),
            PropertyPath::ResizeDisabled => Some(Value::Bool(self.interaction.resize_disabled)),
            PropertyPath::DragDisabled => Some(Value::Bool(self.interaction.drag_disabled)),
            PropertyPath::DropDisabled => Some(Value::Bool(self.interaction.drop_disabled)),
            PropertyPath::SettingsControlDisabled => {
                Some(Value::Bool(self.interaction.settings_control_disabled))
            }
            PropertyPath::Prop(segments) => {
                let (first, rest) = segments.split_first()?;
                rest.iter()
                    .try_fold(self.props.get(first)?, |value, segment| {
                        value.as_object()?.get(segment)
                    })
                    .cloned()
            }
        }
    }

    /// Writes `value` at `path`. Typed fields reject values of the wrong JSON
    /// type; nested props create intermediate objects as needed.
    pub fn set(&mut self, path: &PropertyPath, value: Value) -> Result<(), PathError> {
        match path {
            PropertyPath::BackgroundColor => {
                self.background_color = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    _ => return Err(PathError::type_mismatch(path, "string")),
                };
            }
            PropertyPath::TopRow => self.span.top_row = expect_row(path, &value)?,
            PropertyPath::BottomRow => self.span.bottom_row = expect_row(path, &value)?,
            PropertyPath::LeftColumn => self.span.left_column = expect_row(path, &value)?,
            PropertyPath::RightColumn => self.span.right_column = expect_row(path, &value)?,
            PropertyPath::ResizeDisabled => {
                self.interaction.resize_disabled = expect_bool(path, &value)?
            }
            PropertyPath::DragDisabled => {
                self.interaction.drag_disabled = expect_bool(path, &value)?
            }
            PropertyPath::DropDisabled => {
                self.interaction.drop_disabled = expect_bool(path, &value)?
            }
            PropertyPath::SettingsControlDisabled => {
                self.interaction.settings_control_disabled = expect_bool(path, &value)?
            }
            PropertyPath::Prop(segments) => {
                let Some((last, parents)) = segments.split_last() else {
                    return Err(PathError::Empty);
                };
                let Some((first, middle)) = parents.split_first() else {
                    self.props.insert(last.clone(), value);
                    return Ok(());
                };
                let mut slot = self
                    .props
                    .entry(first.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                for segment in middle {
                    slot = object_slot(slot)
                        .entry(segment.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                }
                object_slot(slot).insert(last.clone(), value);
            }
        }
        Ok(())
    }
}

fn object_slot(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

fn expect_row(path: &PropertyPath, value: &Value) -> Result<i64, PathError> {
    value
        .as_i64()
        .ok_or_else(|| PathError::type_mismatch(path, "integer"))
}

fn expect_bool(path: &PropertyPath, value: &Value) -> Result<bool, PathError> {
    value
        .as_bool()
        .ok_or_else(|| PathError::type_mismatch(path, "bool"))
}

/// A property location inside an [`ElementDescriptor`], resolved once from its
/// dotted form so that patching never walks the tree by string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyPath {
    BackgroundColor,
    TopRow,
    BottomRow,
    LeftColumn,
    RightColumn,
    ResizeDisabled,
    DragDisabled,
    DropDisabled,
    SettingsControlDisabled,
    Prop(Vec<String>),
}

impl PropertyPath {
    pub fn prop(name: impl Into<String>) -> Self {
        Self::Prop(vec![name.into()])
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').map(str::trim).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(PathError::Empty);
        }

        let typed = match segments.as_slice() {
            ["widgetId"] | ["widgetName"] | ["type"] | ["children", ..] => {
                return Err(PathError::Reserved(s.to_string()))
            }
            ["backgroundColor"] => Self::BackgroundColor,
            ["topRow"] => Self::TopRow,
            ["bottomRow"] => Self::BottomRow,
            ["leftColumn"] => Self::LeftColumn,
            ["rightColumn"] => Self::RightColumn,
            ["resizeDisabled"] => Self::ResizeDisabled,
            ["dragDisabled"] => Self::DragDisabled,
            ["dropDisabled"] => Self::DropDisabled,
            ["settingsControlDisabled"] => Self::SettingsControlDisabled,
            _ => Self::Prop(segments.iter().map(|s| s.to_string()).collect()),
        };
        Ok(typed)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackgroundColor => f.write_str("backgroundColor"),
            Self::TopRow => f.write_str("topRow"),
            Self::BottomRow => f.write_str("bottomRow"),
            Self::LeftColumn => f.write_str("leftColumn"),
            Self::RightColumn => f.write_str("rightColumn"),
            Self::ResizeDisabled => f.write_str("resizeDisabled"),
            Self::DragDisabled => f.write_str("dragDisabled"),
            Self::DropDisabled => f.write_str("dropDisabled"),
            Self::SettingsControlDisabled => f.write_str("settingsControlDisabled"),
            Self::Prop(segments) => f.write_str(&segments.join(".")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("property path is empty or has an empty segment")]
    Empty,
    #[error("property path '{0}' addresses widget identity and cannot be bound")]
    Reserved(String),
    #[error("property '{path}' expects a {expected} value")]
    TypeMismatch { path: String, expected: &'static str },
}

impl PathError {
    fn type_mismatch(path: &PropertyPath, expected: &'static str) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected,
        }
    }
}
