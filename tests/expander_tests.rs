use std::collections::BTreeSet;

use serde_json::json;

use listwidget::state::action::RowAction;
use listwidget::state::binding::{BindingKey, BindingSet, DynamicBinding};
use listwidget::state::element::{
    ElementDescriptor, GridSpan, PropertyPath, BUTTON_WIDGET, CANVAS_WIDGET, CONTAINER_WIDGET,
    TEXT_WIDGET,
};
use listwidget::state::expander::{
    self, CloneError, ExpandOutcome, Patcher, RenderMode, RowRole,
};

fn template() -> ElementDescriptor {
    ElementDescriptor::new("container-1", "Container1", CONTAINER_WIDGET)
        .with_span(GridSpan::rows(0, 4))
        .with_child(
            ElementDescriptor::new("canvas-1", "Canvas1", CANVAS_WIDGET)
                .with_span(GridSpan::rows(0, 4))
                .with_child(
                    ElementDescriptor::new("text-1", "Text1", TEXT_WIDGET)
                        .with_span(GridSpan::rows(0, 1))
                        .with_prop("text", json!("literal")),
                )
                .with_child(
                    ElementDescriptor::new("button-1", "Button1", BUTTON_WIDGET)
                        .with_span(GridSpan::rows(1, 2))
                        .with_prop("text", json!("Go")),
                ),
        )
}

fn text_of(element: &ElementDescriptor, widget_name: &str) -> serde_json::Value {
    element
        .find_by_name(widget_name)
        .and_then(|node| node.get(&PropertyPath::prop("text")))
        .unwrap()
}

#[test]
fn test_expand_produces_row_count_copies() {
    let template = template();
    for row_count in 0..6 {
        let clones = expander::expand(&template, row_count).unwrap();
        assert_eq!(clones.len(), row_count);
        assert!(clones.iter().all(|clone| *clone == template));
    }
}

#[test]
fn test_expand_clones_do_not_alias() {
    let template = template();
    let mut clones = expander::expand(&template, 3).unwrap();

    clones[0].children[0].children[0]
        .set(&PropertyPath::prop("text"), json!("changed"))
        .unwrap();
    clones[0].children[0].children.push(ElementDescriptor::new("extra", "Extra", TEXT_WIDGET));

    assert_eq!(clones[1], template);
    assert_eq!(clones[2], template);
    assert_eq!(text_of(&template, "Text1"), json!("literal"));
    assert_eq!(template.children[0].children.len(), 2);
}

#[test]
fn test_expand_zero_rows_skips_validation() {
    let broken = ElementDescriptor::new("x", "X", CONTAINER_WIDGET);
    assert_eq!(expander::expand(&broken, 0), Ok(Vec::new()));
}

#[test]
fn test_expand_rejects_non_positive_span() {
    let broken = ElementDescriptor::new("x", "X", CONTAINER_WIDGET).with_span(GridSpan::rows(3, 3));
    assert_eq!(
        expander::expand(&broken, 2),
        Err(CloneError::InvalidSpan {
            widget_id: "x".to_string(),
            top_row: 3,
            bottom_row: 3,
        })
    );
}

#[test]
fn test_expand_rejects_span_that_overflows() {
    let broken = ElementDescriptor::new("x", "X", CONTAINER_WIDGET)
        .with_span(GridSpan::rows(-2, i64::MAX));
    assert!(matches!(
        expander::expand(&broken, 2),
        Err(CloneError::InvalidSpan { top_row: -2, .. })
    ));
    assert_eq!(broken.span.row_span(), i64::MAX);
}

#[test]
fn test_expand_rows_rejects_layout_overflow() {
    let huge = ElementDescriptor::new("x", "X", CONTAINER_WIDGET)
        .with_span(GridSpan::rows(0, i64::MAX));
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&huge, &bindings, RenderMode::Canvas);

    assert_eq!(
        expander::expand_rows(&huge, 2, &patcher),
        Err(CloneError::LayoutOverflow {
            row_count: 2,
            unit_height: i64::MAX,
            grid_gap: 0,
        })
    );
    assert_eq!(expander::expand_rows(&huge, 1, &patcher).unwrap().len(), 1);

    let gapped = Patcher::new(&template(), &bindings, RenderMode::Page).grid_gap(i64::MAX);
    assert!(matches!(
        expander::expand_rows(&template(), 3, &gapped),
        Err(CloneError::LayoutOverflow { .. })
    ));
}

#[test]
fn test_patch_saturates_for_direct_callers() {
    let huge = ElementDescriptor::new("x", "X", CONTAINER_WIDGET)
        .with_span(GridSpan::rows(0, i64::MAX));
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&huge, &bindings, RenderMode::Page);

    let row = patcher.patch(huge.clone(), 3);
    assert_eq!(row.element.span.top_row, i64::MAX);
    assert_eq!(row.element.span.bottom_row, i64::MAX);
}

#[test]
fn test_expand_rejects_duplicate_ids() {
    let broken = template().with_child(ElementDescriptor::new("text-1", "Other", TEXT_WIDGET));
    assert_eq!(
        expander::expand(&broken, 2),
        Err(CloneError::DuplicateWidgetId("text-1".to_string()))
    );
}

#[test]
fn test_canvas_mode_ids_are_unique_and_deterministic() {
    let template = template();
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Canvas);
    let rows = expander::expand_rows(&template, 4, &patcher).unwrap();

    let original: BTreeSet<String> = template
        .nodes()
        .iter()
        .map(|node| node.widget_id.clone())
        .collect();
    let mut seen = BTreeSet::new();
    for row in &rows[1..] {
        for node in row.element.nodes() {
            assert!(!original.contains(&node.widget_id));
            assert!(seen.insert(node.widget_id.clone()), "duplicate {}", node.widget_id);
        }
    }

    assert_eq!(rows[0].element.widget_id, "container-1");
    assert_eq!(rows[2].element.widget_id, "list-widget-child-id-2-container-1");
    assert_eq!(
        rows[3].element.find_by_name("Text1").unwrap().widget_id,
        expander::row_widget_id(3, "text-1")
    );
}

#[test]
fn test_canvas_mode_locks_every_row_but_the_template() {
    let template = template();
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Canvas);
    let rows = expander::expand_rows(&template, 3, &patcher).unwrap();

    assert_eq!(rows[0].role, RowRole::Template);
    assert!(rows[0].element.nodes().iter().all(|n| !n.interaction.is_locked()));
    assert!(!rows[0].element.interaction.resize_disabled);

    for row in &rows[1..] {
        assert_eq!(row.role, RowRole::Instance(row.row_index()));
        assert!(row.element.nodes().iter().all(|n| n.interaction.is_locked()));
    }
}

#[test]
fn test_page_mode_keeps_ids_and_interaction() {
    let template = template();
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Page);
    let rows = expander::expand_rows(&template, 3, &patcher).unwrap();

    for row in &rows {
        assert_eq!(row.element.widget_id, "container-1");
        assert!(!row.element.interaction.resize_disabled);
        assert!(row.element.nodes().iter().all(|n| !n.interaction.is_locked()));
    }
}

#[test]
fn test_layout_patch_stacks_rows_with_gap() {
    let template = template();
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Canvas)
        .grid_gap(1)
        .background_color(Some("#FAFAFA"));
    let rows = expander::expand_rows(&template, 3, &patcher).unwrap();

    let spans: Vec<(i64, i64)> = rows
        .iter()
        .map(|row| (row.element.span.top_row, row.element.span.bottom_row))
        .collect();
    assert_eq!(spans, vec![(0, 4), (5, 9), (10, 14)]);
    assert!(rows.iter().all(|row| row.element.gap == Some(1)));
    assert!(rows
        .iter()
        .all(|row| row.element.background_color.as_deref() == Some("#FAFAFA")));
}

#[test]
fn test_negative_gap_is_treated_as_zero() {
    let template = template();
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Page).grid_gap(-3);
    let rows = expander::expand_rows(&template, 2, &patcher).unwrap();
    assert_eq!(rows[1].element.span.top_row, 4);
}

#[test]
fn test_binding_substitution_per_row() {
    let template = template();
    let bindings: BindingSet = [DynamicBinding::new(
        "Text1",
        PropertyPath::prop("text"),
        vec![json!("x"), json!("y")],
    )]
    .into_iter()
    .collect();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Canvas);
    let rows = expander::expand_rows(&template, 3, &patcher).unwrap();

    assert_eq!(text_of(&rows[0].element, "Text1"), json!("x"));
    assert_eq!(text_of(&rows[1].element, "Text1"), json!("y"));
    assert_eq!(text_of(&rows[2].element, "Text1"), json!("literal"));
    assert!(rows
        .iter()
        .all(|row| text_of(&row.element, "Button1") == json!("Go")));
}

#[test]
fn test_binding_on_nested_prop_and_typed_field() {
    let template = template();
    let mut bindings = BindingSet::new();
    bindings.push(
        DynamicBinding::from_key(&BindingKey::new("Button1.style.color"), vec![json!("red")]).unwrap(),
    );
    bindings.push(
        DynamicBinding::from_key(&BindingKey::new("Text1.backgroundColor"), vec![json!("#000")]).unwrap(),
    );
    let patcher = Patcher::new(&template, &bindings, RenderMode::Page);
    let rows = expander::expand_rows(&template, 1, &patcher).unwrap();

    let button = rows[0].element.find_by_name("Button1").unwrap();
    assert_eq!(button.props["style"], json!({ "color": "red" }));
    let text = rows[0].element.find_by_name("Text1").unwrap();
    assert_eq!(text.background_color.as_deref(), Some("#000"));
}

#[test]
fn test_binding_with_wrong_type_keeps_literal() {
    let template = template();
    let bindings: BindingSet = [DynamicBinding::new(
        "Text1",
        PropertyPath::TopRow,
        vec![json!("not a number")],
    )]
    .into_iter()
    .collect();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Page);
    let rows = expander::expand_rows(&template, 1, &patcher).unwrap();
    assert_eq!(rows[0].element.find_by_name("Text1").unwrap().span.top_row, 0);
}

#[test]
fn test_binding_key_split() {
    let key = BindingKey::new("Text1.style.color");
    let (widget, path) = key.split().unwrap();
    assert_eq!(widget, "Text1");
    assert_eq!(path.to_string(), "style.color");
    assert!(BindingKey::new("Text1").split().is_err());
    assert!(BindingKey::new(".text").split().is_err());
    assert!(BindingKey::new("Text1.widgetId").split().is_err());
}

#[test]
fn test_click_action_attached_per_row() {
    let template = template();
    let bindings = BindingSet::new();
    let patcher =
        Patcher::new(&template, &bindings, RenderMode::Page).action(Some("{{ go(currentItem) }}"));
    let rows = expander::expand_rows(&template, 2, &patcher).unwrap();

    assert_eq!(
        rows[1].action,
        Some(RowAction {
            row_index: 1,
            action: "{{ go(currentItem) }}".to_string(),
        })
    );

    let no_action = Patcher::new(&template, &bindings, RenderMode::Page);
    let rows = expander::expand_rows(&template, 2, &no_action).unwrap();
    assert!(rows.iter().all(|row| row.action.is_none()));
}

#[test]
fn test_with_fallback_outcomes() {
    let fresh = expander::with_fallback::<u8>(Ok(vec![1, 2]), None).unwrap();
    assert_eq!(fresh, ExpandOutcome::Fresh(vec![1, 2]));
    assert_eq!(fresh.error(), None);

    let previous = [7u8, 8];
    let fallback =
        expander::with_fallback(Err(CloneError::MissingTemplate), Some(&previous[..])).unwrap();
    assert_eq!(fallback.rows(), &[7, 8]);
    assert_eq!(fallback.error(), Some(&CloneError::MissingTemplate));

    let fatal = expander::with_fallback::<u8>(Err(CloneError::MissingTemplate), None).unwrap_err();
    assert_eq!(fatal, CloneError::NoPrevious(Box::new(CloneError::MissingTemplate)));
}

#[test]
fn test_expand_with_fallback_on_descriptors() {
    let good = template();
    let previous = expander::expand(&good, 2).unwrap();
    let broken = ElementDescriptor::new("x", "X", CONTAINER_WIDGET);

    let outcome = expander::expand_with_fallback(&broken, 5, Some(previous.as_slice())).unwrap();
    assert_eq!(outcome.rows().len(), 2);
    assert!(matches!(outcome.error(), Some(CloneError::InvalidSpan { .. })));

    assert!(matches!(
        expander::expand_with_fallback(&broken, 5, None),
        Err(CloneError::NoPrevious(_))
    ));
}

#[test]
fn test_restack_moves_first_visible_row_to_top() {
    let template = template();
    let bindings = BindingSet::new();
    let patcher = Patcher::new(&template, &bindings, RenderMode::Page).grid_gap(1);
    let rows = expander::expand_rows(&template, 5, &patcher).unwrap();

    let mut page = rows[3..].to_vec();
    expander::restack(&mut page);
    assert_eq!(page[0].element.span.top_row, 0);
    assert_eq!(page[0].element.span.bottom_row, 4);
    assert_eq!(page[1].element.span.top_row, 5);
    assert_eq!(page[1].row_index(), 4);
}
