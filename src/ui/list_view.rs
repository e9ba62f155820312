use dioxus::prelude::*;

use crate::state::expander::{ClonedRow, RenderMode, RowRole};
use crate::state::list_state;
use crate::state::pagination::GRID_ROW_HEIGHT_PX;
use crate::ui::actions::{self, ListHost};
use crate::ui::factory::WidgetNode;

#[component]
pub fn ListView(host: ListHost) -> Element {
    let Some((mode, height)) = host.document.read().as_ref().map(|document| {
        (
            document.config.render_mode,
            list_state::available_height(&document.canvas),
        )
    }) else {
        return rsx! {
            p { class: "empty-message", id: "empty-message", "No widget loaded. Click \"Open\" to load a list widget document." }
        };
    };

    let Some(rendered) = host.rendered.read().clone() else {
        return rsx! {};
    };

    if rendered.is_empty() {
        return rsx! {
            p { class: "empty-message", id: "list-placeholder", "Nothing to display" }
        };
    }

    let current = rendered.current_page;
    let page_count = rendered.page_count;

    rsx! {
        div { class: "list-widget", id: "list-widget", style: "height: {height}px;",
            div { class: "list-items",
                for (row_index, row) in rendered.rows.iter().map(|row| (row.row_index(), row)) {
                    ListRow { key: "{row_index}", row: row.clone(), mode, host }
                }
            }
            if rendered.paginated() {
                div { class: "list-pagination", id: "list-pagination",
                    button {
                        class: "page-btn",
                        id: "btn-page-prev",
                        disabled: current <= 1,
                        onclick: move |_| actions::change_page(host, current.saturating_sub(1)),
                        "\u{2039}"
                    }
                    for page in 1..=page_count {
                        button {
                            class: if page == current { "page-btn page-btn-current" } else { "page-btn" },
                            id: "btn-page-{page}",
                            onclick: move |_| actions::change_page(host, page),
                            "{page}"
                        }
                    }
                    button {
                        class: "page-btn",
                        id: "btn-page-next",
                        disabled: current >= page_count,
                        onclick: move |_| actions::change_page(host, current + 1),
                        "\u{203A}"
                    }
                }
            }
        }
    }
}

#[component]
fn ListRow(row: ClonedRow, mode: RenderMode, host: ListHost) -> Element {
    let row_index = row.row_index();
    let top = row.element.span.top_row as f64 * GRID_ROW_HEIGHT_PX;
    let height = row.element.span.row_span() as f64 * GRID_ROW_HEIGHT_PX;
    let background = row.element.background_color.clone().unwrap_or_default();
    let class = match row.role {
        RowRole::Template if mode == RenderMode::Canvas => "list-row list-row-template",
        _ => "list-row",
    };
    let clickable = row.action.is_some();

    rsx! {
        div {
            class,
            id: "list-row-{row_index}",
            style: "top: {top}px; height: {height}px; background-color: {background};",
            onclick: move |_| {
                if clickable {
                    actions::click_row(host, row_index);
                }
            },
            WidgetNode { element: row.element.clone(), mode, nested: false }
        }
    }
}
