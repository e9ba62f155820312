use serde_json::{json, Value};

use listwidget::state::element::{
    ElementDescriptor, GridSpan, Interaction, PathError, PropertyPath, CANVAS_WIDGET,
    CONTAINER_WIDGET, TEXT_WIDGET,
};

fn text(id: &str, name: &str) -> ElementDescriptor {
    ElementDescriptor::new(id, name, TEXT_WIDGET)
        .with_span(GridSpan::rows(0, 1))
        .with_prop("text", json!("hello"))
}

fn tree() -> ElementDescriptor {
    ElementDescriptor::new("container", "Container1", CONTAINER_WIDGET)
        .with_span(GridSpan::rows(0, 3))
        .with_child(
            ElementDescriptor::new("canvas", "Canvas1", CANVAS_WIDGET)
                .with_child(text("t1", "Text1"))
                .with_child(text("t2", "Text2")),
        )
}

#[test]
fn test_parse_prop_paths() {
    assert_eq!("text".parse::<PropertyPath>(), Ok(PropertyPath::prop("text")));
    assert_eq!(
        "style.color".parse::<PropertyPath>(),
        Ok(PropertyPath::Prop(vec!["style".to_string(), "color".to_string()]))
    );
}

#[test]
fn test_parse_typed_paths() {
    assert_eq!(
        "backgroundColor".parse::<PropertyPath>(),
        Ok(PropertyPath::BackgroundColor)
    );
    assert_eq!("topRow".parse::<PropertyPath>(), Ok(PropertyPath::TopRow));
    assert_eq!(
        "settingsControlDisabled".parse::<PropertyPath>(),
        Ok(PropertyPath::SettingsControlDisabled)
    );
}

#[test]
fn test_parse_rejects_identity_and_empty() {
    assert!(matches!(
        "widgetId".parse::<PropertyPath>(),
        Err(PathError::Reserved(_))
    ));
    assert!(matches!(
        "children.0.text".parse::<PropertyPath>(),
        Err(PathError::Reserved(_))
    ));
    assert_eq!("".parse::<PropertyPath>(), Err(PathError::Empty));
    assert_eq!("style..color".parse::<PropertyPath>(), Err(PathError::Empty));
}

#[test]
fn test_path_display_round_trips() {
    for raw in ["text", "style.color", "bottomRow", "dragDisabled"] {
        let path: PropertyPath = raw.parse().unwrap();
        assert_eq!(path.to_string(), raw);
    }
}

#[test]
fn test_set_and_get_nested_prop_creates_objects() {
    let mut node = text("t1", "Text1");
    let path: PropertyPath = "style.font.size".parse().unwrap();
    node.set(&path, json!(14)).unwrap();

    assert_eq!(node.get(&path), Some(json!(14)));
    assert_eq!(node.props["style"], json!({ "font": { "size": 14 } }));
}

#[test]
fn test_set_through_scalar_replaces_it() {
    let mut node = text("t1", "Text1").with_prop("style", json!("bold"));
    let path: PropertyPath = "style.weight".parse().unwrap();
    node.set(&path, json!("700")).unwrap();
    assert_eq!(node.props["style"], json!({ "weight": "700" }));
}

#[test]
fn test_get_missing_prop() {
    let node = text("t1", "Text1");
    assert_eq!(node.get(&PropertyPath::prop("missing")), None);
    assert_eq!(node.get(&"text.inner".parse().unwrap()), None);
}

#[test]
fn test_set_typed_fields() {
    let mut node = text("t1", "Text1");
    node.set(&PropertyPath::BackgroundColor, json!("#eee")).unwrap();
    node.set(&PropertyPath::BottomRow, json!(5)).unwrap();
    node.set(&PropertyPath::DragDisabled, json!(true)).unwrap();

    assert_eq!(node.background_color.as_deref(), Some("#eee"));
    assert_eq!(node.span.bottom_row, 5);
    assert!(node.interaction.drag_disabled);
    assert_eq!(node.get(&PropertyPath::BottomRow), Some(json!(5)));

    node.set(&PropertyPath::BackgroundColor, Value::Null).unwrap();
    assert_eq!(node.background_color, None);
}

#[test]
fn test_set_typed_field_type_mismatch() {
    let mut node = text("t1", "Text1");
    let err = node.set(&PropertyPath::TopRow, json!("three")).unwrap_err();
    assert_eq!(
        err,
        PathError::TypeMismatch {
            path: "topRow".to_string(),
            expected: "integer",
        }
    );
    assert_eq!(node.span.top_row, 0);
}

#[test]
fn test_nodes_pre_order() {
    let tree = tree();
    let ids: Vec<&str> = tree.nodes().iter().map(|n| n.widget_id.as_str()).collect();
    assert_eq!(ids, vec!["container", "canvas", "t1", "t2"]);
}

#[test]
fn test_map_tree_visits_every_node() {
    let renamed = tree().map_tree(&mut |mut node| {
        node.widget_id = format!("x-{}", node.widget_id);
        node
    });
    let ids: Vec<&str> = renamed.nodes().iter().map(|n| n.widget_id.as_str()).collect();
    assert_eq!(ids, vec!["x-container", "x-canvas", "x-t1", "x-t2"]);
}

#[test]
fn test_find_by_name_and_duplicates() {
    let tree = tree();
    assert_eq!(tree.find_by_name("Text2").map(|n| n.widget_id.as_str()), Some("t2"));
    assert!(tree.find_by_name("Nope").is_none());
    assert_eq!(tree.duplicate_widget_id(), None);

    let dup = tree.with_child(text("t1", "Again"));
    assert_eq!(dup.duplicate_widget_id(), Some("t1"));
}

#[test]
fn test_interaction_locked() {
    assert!(Interaction::locked().is_locked());
    assert!(!Interaction::default().is_locked());

    let node = text("t1", "Text1").with_interaction(Interaction {
        drag_disabled: true,
        ..Interaction::default()
    });
    assert!(!node.interaction.is_locked());
    assert_eq!(node.get(&PropertyPath::DragDisabled), Some(json!(true)));
}

#[test]
fn test_deserialize_camel_case_descriptor() {
    let node: ElementDescriptor = serde_json::from_str(
        r#"{
            "widgetId": "a",
            "widgetName": "A",
            "type": "TEXT_WIDGET",
            "topRow": 1,
            "bottomRow": 3,
            "resizeDisabled": true,
            "props": { "text": "hi" }
        }"#,
    )
    .unwrap();

    assert_eq!(node.widget_type, TEXT_WIDGET);
    assert_eq!(node.span, GridSpan::rows(1, 3));
    assert_eq!(node.span.row_span(), 2);
    assert!(node.interaction.resize_disabled);
    assert!(!node.interaction.drag_disabled);
    assert_eq!(node.props["text"], json!("hi"));
    assert!(node.children.is_empty());
}
