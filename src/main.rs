use std::path::PathBuf;

use dioxus::prelude::*;
use listwidget::logging::{self, DEFAULT_LOG_PATH, LOG_PATH_VAR};
use listwidget::ui::app::App;

fn main() {
    let log_path = std::env::var(LOG_PATH_VAR).unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());
    if let Err(err) = logging::init_file_logger(&PathBuf::from(&log_path)) {
        eprintln!("logging to {log_path} disabled: {err}");
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new().with_window(
                dioxus::desktop::WindowBuilder::new()
                    .with_title("List Widget")
                    .with_inner_size(dioxus::desktop::LogicalSize::new(900.0, 700.0)),
            ),
        )
        .launch(App);
}
