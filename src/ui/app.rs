use dioxus::prelude::*;
use std::path::PathBuf;

use crate::ui::actions::{self, use_list_host};
use crate::ui::list_view::ListView;
use crate::ui::toolbar::Toolbar;

const STYLES: Asset = asset!("/assets/styles.css");

#[component]
pub fn App() -> Element {
    let host = use_list_host();

    use_effect(move || {
        if let Ok(path) = std::env::var("LISTWIDGET_OPEN") {
            spawn(async move {
                actions::load_document(host, PathBuf::from(path));
            });
        }
    });

    rsx! {
        document::Stylesheet { href: STYLES }
        div { class: "app",
            Toolbar { host }
            if let Some(message) = host.error_message.read().as_ref() {
                p { class: "error-message", id: "error-message", "{message}" }
            }
            ListView { host }
            if let Some(status) = host.status.read().as_ref() {
                div { class: "status-bar", id: "status-bar", "{status}" }
            }
        }
    }
}
