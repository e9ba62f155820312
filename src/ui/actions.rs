use dioxus::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::io::widget_io::{self, WidgetDocument};
use crate::state::action::{ActionCallback, ActionExecutor, ActionRequest};
use crate::state::evaluator::CurrentItemEvaluator;
use crate::state::expander::RenderMode;
use crate::state::list_state::{self, ListWidgetState, RenderedList};

/// Signals shared by the host's components.
#[derive(Clone, Copy, PartialEq)]
pub struct ListHost {
    pub document: Signal<Option<WidgetDocument>>,
    pub widget_state: Signal<ListWidgetState>,
    pub rendered: Signal<Option<RenderedList>>,
    pub file_path: Signal<Option<PathBuf>>,
    pub error_message: Signal<Option<String>>,
    pub status: Signal<Option<String>>,
}

pub fn use_list_host() -> ListHost {
    ListHost {
        document: use_signal(|| None),
        widget_state: use_signal(ListWidgetState::default),
        rendered: use_signal(|| None),
        file_path: use_signal(|| None),
        error_message: use_signal(|| None),
        status: use_signal(|| None),
    }
}

/// Runs row actions by logging them and echoing them in the status bar.
pub struct HostActionExecutor {
    status: Signal<Option<String>>,
}

impl ActionExecutor for HostActionExecutor {
    fn execute(&self, mut request: ActionRequest) {
        log::info!(
            "executing {:?} action {} with {:?}",
            request.event.event_type,
            request.dynamic_string.trim(),
            request.response_data
        );
        let mut status = self.status;
        status.set(Some(request.dynamic_string.trim().to_string()));
        request.event.complete();
    }
}

pub fn load_document(mut host: ListHost, path: PathBuf) {
    match widget_io::load_widget(&path) {
        Ok(mut document) => {
            let config = document.config.clone();
            let mut state = ListWidgetState::new(&config);
            if state.sync_config(&config, &mut document) {
                log::debug!("published row shape for {}", config.widget_name);
            }
            host.document.set(Some(document));
            host.widget_state.set(state);
            host.file_path.set(Some(path));
            host.error_message.set(None);
            refresh(host);
        }
        Err(e) => {
            host.error_message.set(Some(e.to_string()));
        }
    }
}

pub async fn open_file(host: ListHost) {
    let task = rfd::AsyncFileDialog::new()
        .add_filter("List widget", &["json"])
        .pick_file()
        .await;

    if let Some(handle) = task {
        load_document(host, handle.path().to_path_buf());
    }
}

pub fn save_file(mut host: ListHost) -> bool {
    let path = {
        let read = host.file_path.read();
        let Some(path) = read.as_ref() else {
            return false;
        };
        path.clone()
    };

    let result = match host.document.read().as_ref() {
        Some(document) => save_to(&path, document),
        None => return false,
    };

    match result {
        Ok(()) => {
            host.error_message.set(None);
            true
        }
        Err(err) => {
            host.error_message.set(Some(err));
            false
        }
    }
}

fn save_to(path: &Path, document: &WidgetDocument) -> Result<(), String> {
    widget_io::save_widget(path, document).map_err(|e| e.to_string())
}

/// Runs a render pass over the current document and stores the result.
pub fn refresh(mut host: ListHost) {
    let document = host.document.read().clone();
    let Some(document) = document else {
        host.rendered.set(None);
        return;
    };

    let height = list_state::available_height(&document.canvas);
    let result = host.widget_state.with_mut(|state| {
        state.render(&document.config, &document.canvas, &CurrentItemEvaluator, height)
    });

    match result {
        Ok(rendered) => {
            let error = rendered.fallback.as_ref().map(|err| err.to_string());
            host.error_message.set(error);
            host.rendered.set(Some(rendered));
        }
        Err(err) => {
            host.error_message.set(Some(err.to_string()));
            host.rendered.set(None);
        }
    }
}

pub fn change_page(mut host: ListHost, page: usize) {
    let page_count = host
        .rendered
        .read()
        .as_ref()
        .map(|rendered| rendered.page_count)
        .unwrap_or(0);
    let changed = host
        .widget_state
        .with_mut(|state| state.set_page(page, page_count));
    if changed {
        refresh(host);
    }
}

pub fn set_render_mode(mut host: ListHost, mode: RenderMode) {
    let changed = host.document.with_mut(|document| match document {
        Some(document) if document.config.render_mode != mode => {
            document.config.render_mode = mode;
            true
        }
        _ => false,
    });
    if changed {
        refresh(host);
    }
}

pub fn click_row(host: ListHost, row_index: usize) {
    let document = host.document.read().clone();
    let Some(document) = document else {
        return;
    };

    let executor = HostActionExecutor {
        status: host.status,
    };
    let mut status = host.status;
    let on_complete: ActionCallback = Box::new(move || {
        spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            status.set(None);
        });
    });

    host.widget_state
        .read()
        .on_item_click(&document.config, row_index, &executor, Some(on_complete));
}
