#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn modifier_mask_decodes_each_bit() {
    let m = modifiers_from_mask(MOD_SHIFT | MOD_META);
    assert!(m.shift && m.meta);
    assert!(!m.ctrl && !m.alt);
    assert!(m.command());
    assert!(!modifiers_from_mask(0).command());
}

#[test]
fn flat_coords_pair_up() {
    let points = points_from_flat(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
}

#[test]
fn trailing_odd_coordinate_is_dropped() {
    assert_eq!(points_from_flat(&[1.0, 2.0, 3.0]), vec![Point::new(1.0, 2.0)]);
    assert!(points_from_flat(&[]).is_empty());
}

#[test]
fn palette_presets_include_defaults() {
    let config = EditorConfig::default();
    assert!(line_thickness_presets().contains(&config.line_thickness));
    assert!(font_size_presets().contains(&config.font_size));
    assert_eq!(line_thickness_presets(), vec![1.5, 2.5, 4.0]);
}

#[test]
fn rename_answer_uses_the_payload_id() {
    let mut editor = Editor::build("en", EditorConfig::default());
    editor.core.select_tool(Tool::Shape(crate::scene::ShapeKind::Male));
    editor.core.on_pointer_down(&[Point::new(100.0, 100.0)], Modifiers::default(), 0.0);
    editor.core.on_pointer_up(Point::new(100.0, 100.0), Modifiers::default(), 10.0);

    let payload_id = serde_json::to_value(editor.core.scene().shapes[0].id).unwrap();
    editor.rename_shape(payload_id.as_f64().unwrap(), "Hanako", "38").unwrap();
    assert_eq!(editor.core.scene().shapes[0].text, "Hanako");
}
