use std::fmt;

use crate::state::data_model::Row;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventType {
    OnClick,
}

pub type ActionCallback = Box<dyn FnOnce() + 'static>;

pub struct ActionEvent {
    pub event_type: EventType,
    pub callback: Option<ActionCallback>,
}

impl ActionEvent {
    /// Runs the completion callback once; later calls do nothing.
    pub fn complete(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

impl fmt::Debug for ActionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionEvent")
            .field("event_type", &self.event_type)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// What the list widget hands to the host when a row is activated.
#[derive(Debug)]
pub struct ActionRequest {
    pub dynamic_string: String,
    pub event: ActionEvent,
    pub response_data: Vec<Row>,
}

/// Host-side runner for action expressions. The list widget never inspects
/// the outcome; completion is reported through the event callback.
pub trait ActionExecutor {
    fn execute(&self, request: ActionRequest);
}

/// Click action attached to one cloned row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowAction {
    pub row_index: usize,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("unterminated '{{{{' starting at byte {offset}")]
    Unterminated { offset: usize },
    #[error("action has no '{{{{ }}}}' snippets to run")]
    NoSnippets,
    #[error("row {row_index} is out of range for {row_count} items")]
    RowOutOfRange { row_index: usize, row_count: usize },
}

/// Returns the trimmed bodies of every `{{ ... }}` segment in `action`.
/// Braces nested inside a segment are balanced before its closing `}}`.
pub fn extract_snippets(action: &str) -> Result<Vec<String>, ActionError> {
    let bytes = action.as_bytes();
    let mut snippets = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if !(bytes[i] == b'{' && bytes.get(i + 1) == Some(&b'{')) {
            i += 1;
            continue;
        }

        let start = i + 2;
        let mut depth = 0usize;
        let mut end = None;
        let mut j = start;
        while j < bytes.len() {
            match bytes[j] {
                b'{' => depth += 1,
                b'}' if depth > 0 => depth -= 1,
                b'}' if bytes.get(j + 1) == Some(&b'}') => {
                    end = Some(j);
                    break;
                }
                _ => {}
            }
            j += 1;
        }

        let Some(end) = end else {
            return Err(ActionError::Unterminated { offset: i });
        };
        snippets.push(action[start..end].trim().to_string());
        i = end + 2;
    }

    Ok(snippets)
}

/// Wraps each snippet in a function of `currentItem` so the host evaluates it
/// against the clicked row.
pub fn scope_to_current_item(snippets: &[String]) -> String {
    snippets
        .iter()
        .map(|snippet| format!("{{{{(currentItem) => {{ {snippet} }}}}}} "))
        .collect()
}

/// Builds the executor request for a click on `row_index`.
pub fn build_request(
    action: &str,
    row_index: usize,
    items: &[Row],
    callback: Option<ActionCallback>,
) -> Result<ActionRequest, ActionError> {
    let row = items.get(row_index).ok_or(ActionError::RowOutOfRange {
        row_index,
        row_count: items.len(),
    })?;
    let snippets = extract_snippets(action)?;
    if snippets.is_empty() {
        return Err(ActionError::NoSnippets);
    }

    Ok(ActionRequest {
        dynamic_string: scope_to_current_item(&snippets),
        event: ActionEvent {
            event_type: EventType::OnClick,
            callback,
        },
        response_data: vec![row.clone()],
    })
}

/// Runs the click action for a row. Parse failures abort this click only and
/// are logged at debug level. Returns whether the executor was invoked.
pub fn dispatch_click(
    executor: &dyn ActionExecutor,
    action: Option<&str>,
    row_index: usize,
    items: &[Row],
    callback: Option<ActionCallback>,
) -> bool {
    let Some(action) = action.filter(|action| !action.trim().is_empty()) else {
        return false;
    };

    match build_request(action, row_index, items, callback) {
        Ok(request) => {
            executor.execute(request);
            true
        }
        Err(err) => {
            log::debug!("Error parsing row action for row {row_index}: {err}");
            false
        }
    }
}
