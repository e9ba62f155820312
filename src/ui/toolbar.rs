use dioxus::prelude::*;
use std::time::Duration;

use crate::state::expander::RenderMode;
use crate::ui::actions::{self, ListHost};

#[component]
pub fn Toolbar(host: ListHost) -> Element {
    let mut save_success = use_signal(|| false);

    let mode = host
        .document
        .read()
        .as_ref()
        .map(|document| document.config.render_mode);
    let has_file = host.file_path.read().is_some();
    let file_label = host
        .file_path
        .read()
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    rsx! {
        div { class: "toolbar",
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-open",
                    onclick: move |_| {
                        spawn(async move {
                            actions::open_file(host).await;
                        });
                    },
                    "\u{1F4C2} Open"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-save",
                    disabled: !has_file,
                    onclick: move |_| {
                        if actions::save_file(host) {
                            save_success.set(true);
                            spawn(async move {
                                tokio::time::sleep(Duration::from_secs(2)).await;
                                save_success.set(false);
                            });
                        }
                    },
                    "\u{1F4BE} Save"
                }
                if *save_success.read() {
                    span { class: "save-success", "\u{2714} Saved" }
                }
                span { class: "file-label", "{file_label}" }
            }
            div { class: "toolbar-separator" }

            div { class: "toolbar-group",
                button {
                    class: mode_class(mode, RenderMode::Canvas),
                    id: "btn-mode-edit",
                    disabled: mode.is_none(),
                    onclick: move |_| actions::set_render_mode(host, RenderMode::Canvas),
                    "\u{270E} Edit"
                }
                button {
                    class: mode_class(mode, RenderMode::Page),
                    id: "btn-mode-view",
                    disabled: mode.is_none(),
                    onclick: move |_| actions::set_render_mode(host, RenderMode::Page),
                    "\u{1F441} View"
                }
            }
        }
    }
}

fn mode_class(current: Option<RenderMode>, mode: RenderMode) -> &'static str {
    if current == Some(mode) {
        "toolbar-btn toolbar-btn-active"
    } else {
        "toolbar-btn"
    }
}
