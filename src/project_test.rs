#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::scene::{MAX_ELEMENT_ID, Shape, ShapeKind};

fn shape(id: u64) -> Shape {
    Shape {
        id,
        kind: ShapeKind::IndexMale,
        x: 100.0,
        y: 100.0,
        width: 60.0,
        height: 60.0,
        text: "Taro".into(),
        age: "40".into(),
        is_deceased: false,
        is_cohabiting_with_index: false,
        font_size: None,
    }
}

// =============================================================
// save
// =============================================================

#[test]
fn save_wraps_scene_in_envelope() {
    let scene = Scene::default().add_shape(shape(3));
    let json = save(&scene, "2024-01-02T03:04:05.000Z").unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], json!("1.0"));
    assert_eq!(value["created"], json!("2024-01-02T03:04:05.000Z"));
    assert_eq!(value["data"]["shapes"][0]["type"], json!("index_male"));
    assert_eq!(value["data"]["texts"], json!([]));
}

#[test]
fn save_then_load_preserves_scene() {
    let scene = Scene::default().add_shape(shape(3)).add_shape(shape(8));
    let loaded = load(&save(&scene, "now").unwrap()).unwrap();
    assert_eq!(loaded.scene, scene);
    assert_eq!(loaded.next_id, 9);
}

// =============================================================
// load
// =============================================================

#[test]
fn load_bare_scene_without_texts() {
    let json = json!({
        "shapes": [{ "id": 1, "type": "male", "x": 100, "y": 100, "width": 60, "height": 60,
                     "text": "", "age": "", "isDeceased": false }],
        "lines": [],
        "boundaries": []
    })
    .to_string();
    let loaded = load(&json).unwrap();
    assert!(loaded.scene.texts.is_empty());
    assert_eq!(loaded.scene.shapes.len(), 1);
    assert_eq!(loaded.next_id, 2);
}

#[test]
fn load_null_collections_become_empty() {
    let loaded = load(r#"{"shapes": null, "lines": null}"#).unwrap();
    assert!(loaded.scene.is_empty());
    assert_eq!(loaded.next_id, 1);
}

#[test]
fn load_empty_object_is_empty_scene() {
    let loaded = load("{}").unwrap();
    assert!(loaded.scene.is_empty());
    assert_eq!(loaded.next_id, 1);
}

#[test]
fn load_envelope_requires_version() {
    // Without a version the object is read as a bare scene; `data` is ignored.
    let json = json!({ "data": { "shapes": [{ "id": 5, "type": "female", "x": 0, "y": 0, "width": 60, "height": 60 }] } })
        .to_string();
    let loaded = load(&json).unwrap();
    assert!(loaded.scene.is_empty());
}

#[test]
fn load_next_id_spans_every_collection() {
    let json = json!({
        "version": "1.0",
        "created": "x",
        "data": {
            "shapes": [{ "id": 2, "type": "male", "x": 0, "y": 0, "width": 60, "height": 60 }],
            "texts": [{ "id": 12, "x": 0, "y": 0, "width": 80, "height": 40, "text": "a", "fontSize": 12 }],
            "lines": [{ "id": 7, "type": "dashed", "start": { "x": 0, "y": 0 }, "end": { "x": 0, "y": 40 },
                        "strokeWidth": 1.5, "decoration": null }]
        }
    })
    .to_string();
    let loaded = load(&json).unwrap();
    assert_eq!(loaded.next_id, 13);
    assert_eq!(loaded.scene.texts[0].font_size, 12.0);
}

#[test]
fn load_rejects_syntax_errors() {
    assert!(matches!(load("{not json"), Err(LoadError::Json(_))));
}

#[test]
fn load_rejects_non_object_root() {
    assert!(matches!(load("[1, 2, 3]"), Err(LoadError::NotAnObject)));
    assert!(matches!(load("42"), Err(LoadError::NotAnObject)));
}

#[test]
fn load_rejects_wrong_shaped_collection() {
    assert!(matches!(load(r#"{"shapes": "nope"}"#), Err(LoadError::Json(_))));
}

#[test]
fn load_rejects_ids_past_the_supported_range() {
    let json = json!({"shapes": [{"id": u64::MAX, "type": "male", "x": 0, "y": 0, "width": 60, "height": 60}]});
    let err = load(&json.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::IdSpaceExhausted { id: u64::MAX }));

    let json = json!({"texts": [{"id": MAX_ELEMENT_ID + 1, "x": 0, "y": 0, "width": 80, "height": 40, "text": "", "fontSize": 16}]});
    assert!(matches!(load(&json.to_string()), Err(LoadError::IdSpaceExhausted { .. })));
}

#[test]
fn load_accepts_the_largest_supported_id() {
    let json = json!({"shapes": [{"id": MAX_ELEMENT_ID, "type": "male", "x": 0, "y": 0, "width": 60, "height": 60}]});
    let loaded = load(&json.to_string()).unwrap();
    assert_eq!(loaded.next_id, MAX_ELEMENT_ID + 1);
}

#[test]
fn truthiness_rules() {
    assert!(!is_truthy(None));
    assert!(!is_truthy(Some(&json!(null))));
    assert!(!is_truthy(Some(&json!(""))));
    assert!(!is_truthy(Some(&json!(0))));
    assert!(is_truthy(Some(&json!("1.0"))));
    assert!(is_truthy(Some(&json!({}))));
}
