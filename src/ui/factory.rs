use dioxus::prelude::*;

use crate::state::data_model;
use crate::state::element::{
    ElementDescriptor, BUTTON_WIDGET, CANVAS_WIDGET, CONTAINER_WIDGET, IMAGE_WIDGET, TEXT_WIDGET,
};
use crate::state::expander::RenderMode;
use crate::state::pagination::GRID_ROW_HEIGHT_PX;

/// Renders one widget subtree according to its type tag.
#[component]
pub fn WidgetNode(element: ElementDescriptor, mode: RenderMode, nested: bool) -> Element {
    let id = sanitize_id(&element.widget_id);
    let class = node_class(&element, mode);
    let style = if nested { node_style(&element) } else { String::new() };
    let text = prop_text(&element, "text");

    match element.widget_type.as_str() {
        TEXT_WIDGET => rsx! {
            div { class, id, style, "{text}" }
        },
        BUTTON_WIDGET => rsx! {
            button { class, id, style, "{text}" }
        },
        IMAGE_WIDGET => rsx! {
            img { class, id, style, src: prop_text(&element, "image"), alt: element.widget_name.clone() }
        },
        CONTAINER_WIDGET | CANVAS_WIDGET => rsx! {
            div { class, id, style,
                for child in element.children.iter() {
                    WidgetNode { key: "{child.widget_id}", element: child.clone(), mode, nested: true }
                }
            }
        },
        other => rsx! {
            div { class, id, style, "{other}" }
        },
    }
}

fn prop_text(element: &ElementDescriptor, name: &str) -> String {
    element
        .props
        .get(name)
        .map(data_model::display_value)
        .unwrap_or_default()
}

fn node_class(element: &ElementDescriptor, mode: RenderMode) -> String {
    let kind = match element.widget_type.as_str() {
        TEXT_WIDGET => "widget widget-text",
        BUTTON_WIDGET => "widget widget-button",
        IMAGE_WIDGET => "widget widget-image",
        CONTAINER_WIDGET => "widget widget-container",
        CANVAS_WIDGET => "widget widget-canvas",
        _ => "widget widget-unknown",
    };
    if mode == RenderMode::Canvas && element.interaction.is_locked() {
        format!("{kind} widget-locked")
    } else {
        kind.to_string()
    }
}

fn node_style(element: &ElementDescriptor) -> String {
    let top = element.span.top_row as f64 * GRID_ROW_HEIGHT_PX;
    let height = element.span.row_span().max(0) as f64 * GRID_ROW_HEIGHT_PX;
    let mut style = format!("top: {top}px; height: {height}px;");
    if let Some(color) = element.background_color.as_deref() {
        style.push_str(" background-color: ");
        style.push_str(color);
        style.push(';');
    }
    style
}

fn sanitize_id(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' { ch } else { '_' })
        .collect()
}
