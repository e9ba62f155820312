use serde::{Deserialize, Serialize};

use crate::state::action::RowAction;
use crate::state::binding::BindingSet;
use crate::state::element::{ElementDescriptor, Interaction};

/// Whether the widget tree is being authored or viewed by an end user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RenderMode {
    #[default]
    Canvas,
    Page,
}

/// Row 0 doubles as the live-editable prototype; every other row is a copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowRole {
    Template,
    Instance(usize),
}

impl RowRole {
    pub fn for_row(row_index: usize) -> Self {
        match row_index {
            0 => Self::Template,
            n => Self::Instance(n),
        }
    }

    pub fn row_index(self) -> usize {
        match self {
            Self::Template => 0,
            Self::Instance(n) => n,
        }
    }

    /// Outside authoring every row keeps its ids; while authoring only the template does.
    pub fn keeps_identity(self, mode: RenderMode) -> bool {
        matches!(self, Self::Template) || mode == RenderMode::Page
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClonedRow {
    pub role: RowRole,
    pub element: ElementDescriptor,
    pub action: Option<RowAction>,
}

impl ClonedRow {
    pub fn row_index(&self) -> usize {
        self.role.row_index()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloneError {
    #[error("list canvas has no template child")]
    MissingTemplate,
    #[error("widget id '{0}' appears more than once in the template")]
    DuplicateWidgetId(String),
    #[error("template '{widget_id}' has a non-positive row span ({top_row}..{bottom_row})")]
    InvalidSpan {
        widget_id: String,
        top_row: i64,
        bottom_row: i64,
    },
    #[error("{row_count} rows of {unit_height} grid rows with gap {grid_gap} overflow the layout grid")]
    LayoutOverflow {
        row_count: usize,
        unit_height: i64,
        grid_gap: i64,
    },
    #[error("{0}; no previous rows to fall back to")]
    NoPrevious(Box<CloneError>),
}

/// Checks the template before any copy is made. Per-row ids are derived from
/// the original ids, so duplicates inside the template would collide.
pub fn validate_template(template: &ElementDescriptor) -> Result<(), CloneError> {
    let span = template
        .span
        .bottom_row
        .checked_sub(template.span.top_row);
    if !span.is_some_and(|span| span > 0) {
        return Err(CloneError::InvalidSpan {
            widget_id: template.widget_id.clone(),
            top_row: template.span.top_row,
            bottom_row: template.span.bottom_row,
        });
    }
    if let Some(id) = template.duplicate_widget_id() {
        return Err(CloneError::DuplicateWidgetId(id.to_string()));
    }
    Ok(())
}

/// Produces `row_count` independent deep copies of `template`.
pub fn expand(
    template: &ElementDescriptor,
    row_count: usize,
) -> Result<Vec<ElementDescriptor>, CloneError> {
    if row_count == 0 {
        return Ok(Vec::new());
    }
    validate_template(template)?;
    Ok((0..row_count).map(|_| template.clone()).collect())
}

/// Id given to every node of a non-template row while authoring.
pub fn row_widget_id(row_index: usize, original_id: &str) -> String {
    format!("list-widget-child-id-{row_index}-{original_id}")
}

/// Per-pass settings shared by every row's patch.
#[derive(Clone, Debug)]
pub struct Patcher<'a> {
    pub bindings: &'a BindingSet,
    pub mode: RenderMode,
    pub unit_height: i64,
    pub grid_gap: i64,
    pub background_color: Option<&'a str>,
    pub action: Option<&'a str>,
}

impl<'a> Patcher<'a> {
    pub fn new(template: &ElementDescriptor, bindings: &'a BindingSet, mode: RenderMode) -> Self {
        Self {
            bindings,
            mode,
            unit_height: template.span.row_span(),
            grid_gap: 0,
            background_color: None,
            action: None,
        }
    }

    pub fn grid_gap(mut self, grid_gap: i64) -> Self {
        self.grid_gap = grid_gap.max(0);
        self
    }

    pub fn background_color(mut self, color: Option<&'a str>) -> Self {
        self.background_color = color;
        self
    }

    pub fn action(mut self, action: Option<&'a str>) -> Self {
        self.action = action;
        self
    }

    /// Applies binding substitution, identity, layout and click patches, in
    /// that order, to a fresh clone for `row_index`.
    pub fn patch(&self, clone: ElementDescriptor, row_index: usize) -> ClonedRow {
        let role = RowRole::for_row(row_index);

        let element = clone.map_tree(&mut |node| {
            let node = self.bindings.apply_to_node(node, row_index);
            self.patch_identity(node, role)
        });
        let element = self.patch_layout(element, row_index);

        let action = self.action.map(|action| RowAction {
            row_index,
            action: action.to_string(),
        });

        ClonedRow {
            role,
            element,
            action,
        }
    }

    fn patch_identity(&self, mut node: ElementDescriptor, role: RowRole) -> ElementDescriptor {
        if role.keeps_identity(self.mode) {
            return node;
        }
        node.widget_id = row_widget_id(role.row_index(), &node.widget_id);
        node.interaction = Interaction::locked();
        node
    }

    fn patch_layout(&self, mut element: ElementDescriptor, row_index: usize) -> ElementDescriptor {
        // expand_rows rejects layouts that overflow; saturate for direct callers.
        let i = i64::try_from(row_index).unwrap_or(i64::MAX);
        let top_row = i.saturating_mul(self.unit_height.saturating_add(self.grid_gap));
        element.span.top_row = top_row;
        element.span.bottom_row = top_row.saturating_add(self.unit_height);
        element.gap = Some(self.grid_gap);
        element.background_color = self.background_color.map(str::to_string);
        element.interaction.resize_disabled = row_index > 0 && self.mode == RenderMode::Canvas;
        element
    }
}

/// Bottom row of the last clone, or `None` when it does not fit in an `i64`.
fn layout_extent(row_count: usize, unit_height: i64, grid_gap: i64) -> Option<i64> {
    let last = i64::try_from(row_count.checked_sub(1)?).ok()?;
    unit_height
        .checked_add(grid_gap)?
        .checked_mul(last)?
        .checked_add(unit_height)
}

/// Clones and patches the template once per row.
pub fn expand_rows(
    template: &ElementDescriptor,
    row_count: usize,
    patcher: &Patcher<'_>,
) -> Result<Vec<ClonedRow>, CloneError> {
    let clones = expand(template, row_count)?;
    if row_count > 0 && layout_extent(row_count, patcher.unit_height, patcher.grid_gap).is_none() {
        return Err(CloneError::LayoutOverflow {
            row_count,
            unit_height: patcher.unit_height,
            grid_gap: patcher.grid_gap,
        });
    }
    Ok(clones
        .into_iter()
        .enumerate()
        .map(|(row_index, clone)| patcher.patch(clone, row_index))
        .collect())
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpandOutcome<T> {
    Fresh(Vec<T>),
    /// Expansion failed; the previous pass's rows are reused as-is.
    Fallback { rows: Vec<T>, error: CloneError },
}

impl<T> ExpandOutcome<T> {
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Fresh(rows) => rows,
            Self::Fallback { rows, .. } => rows,
        }
    }

    pub fn into_rows(self) -> Vec<T> {
        match self {
            Self::Fresh(rows) => rows,
            Self::Fallback { rows, .. } => rows,
        }
    }

    pub fn error(&self) -> Option<&CloneError> {
        match self {
            Self::Fresh(_) => None,
            Self::Fallback { error, .. } => Some(error),
        }
    }
}

/// Turns a failed attempt into a fallback on `previous`, or a fatal error
/// when there is nothing to fall back to.
pub fn with_fallback<T: Clone>(
    attempt: Result<Vec<T>, CloneError>,
    previous: Option<&[T]>,
) -> Result<ExpandOutcome<T>, CloneError> {
    match attempt {
        Ok(rows) => Ok(ExpandOutcome::Fresh(rows)),
        Err(error) => match previous {
            Some(rows) => {
                log::warn!("list expansion failed, keeping previous rows: {error}");
                Ok(ExpandOutcome::Fallback {
                    rows: rows.to_vec(),
                    error,
                })
            }
            None => Err(CloneError::NoPrevious(Box::new(error))),
        },
    }
}

pub fn expand_with_fallback(
    template: &ElementDescriptor,
    row_count: usize,
    previous: Option<&[ElementDescriptor]>,
) -> Result<ExpandOutcome<ElementDescriptor>, CloneError> {
    with_fallback(expand(template, row_count), previous)
}

/// Shifts the visible rows up so the first one starts at the top of the list,
/// keeping their spacing.
pub fn restack(rows: &mut [ClonedRow]) {
    let Some(offset) = rows.first().map(|row| row.element.span.top_row) else {
        return;
    };
    for row in rows {
        row.element.span.top_row -= offset;
        row.element.span.bottom_row -= offset;
    }
}
