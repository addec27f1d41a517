#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::scene::{LineStyle, ShapeKind};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn make_shape(id: u64, x: f64, y: f64) -> Shape {
    Shape {
        id,
        kind: ShapeKind::Female,
        x,
        y,
        width: 60.0,
        height: 60.0,
        text: String::new(),
        age: String::new(),
        is_deceased: false,
        is_cohabiting_with_index: false,
        font_size: None,
    }
}

fn make_line(id: u64, a: Point, b: Point) -> Line {
    Line { id, style: LineStyle::Solid, start: a, end: b, stroke_width: 2.5, decoration: None }
}

fn make_boundary(id: u64, x: f64, y: f64, w: f64, h: f64) -> Boundary {
    Boundary { id, x, y, width: w, height: h, label: String::new(), style: None, stroke_width: None }
}

fn make_text(id: u64, x: f64, y: f64, w: f64, h: f64) -> Text {
    Text { id, x, y, width: w, height: h, content: String::new(), font_size: 16.0 }
}

fn no_selection() -> Selection {
    Selection::default()
}

// =============================================================
// snap_to_grid / axis_lock
// =============================================================

#[test]
fn snap_rounds_to_half_grid() {
    assert_eq!(snap_to_grid(0.0), 0.0);
    assert_eq!(snap_to_grid(14.0), 10.0);
    assert_eq!(snap_to_grid(16.0), 20.0);
    assert_eq!(snap_to_grid(-14.0), -10.0);
}

#[test]
fn snap_halves_round_up() {
    assert_eq!(snap_to_grid(5.0), 10.0);
    assert_eq!(snap_to_grid(-5.0), 0.0);
}

#[test]
fn axis_lock_prefers_larger_delta() {
    assert_eq!(axis_lock(pt(0.0, 0.0), pt(30.0, 10.0)), pt(30.0, 0.0));
    assert_eq!(axis_lock(pt(0.0, 0.0), pt(10.0, 30.0)), pt(0.0, 30.0));
}

#[test]
fn axis_lock_ties_go_vertical() {
    assert_eq!(axis_lock(pt(0.0, 0.0), pt(20.0, 20.0)), pt(0.0, 20.0));
}

// =============================================================
// distance_to_segment
// =============================================================

#[test]
fn distance_to_segment_perpendicular() {
    assert_eq!(distance_to_segment(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0)), 3.0);
}

#[test]
fn distance_to_segment_clamps_past_end() {
    assert_eq!(distance_to_segment(pt(13.0, 4.0), pt(0.0, 0.0), pt(10.0, 0.0)), 5.0);
}

#[test]
fn distance_to_degenerate_segment_is_point_distance() {
    assert_eq!(distance_to_segment(pt(3.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0)), 5.0);
}

// =============================================================
// locate: bodies
// =============================================================

#[test]
fn empty_scene_hits_nothing() {
    assert!(locate(pt(0.0, 0.0), &Scene::default(), &no_selection()).is_none());
}

#[test]
fn shape_hit_is_inclusive_at_edges() {
    let scene = Scene::default().add_shape(make_shape(1, 100.0, 100.0));
    let hit = locate(pt(130.0, 70.0), &scene, &no_selection()).unwrap();
    assert_eq!(hit.element, ElementRef::shape(1));
    assert!(hit.handle.is_none());
    assert!(locate(pt(130.5, 100.0), &scene, &no_selection()).is_none());
}

#[test]
fn shape_label_extends_hit_area_downward() {
    let mut shape = make_shape(1, 100.0, 100.0);
    assert!(locate(pt(100.0, 145.0), &Scene::default().add_shape(shape.clone()), &no_selection()).is_none());
    shape.text = "Hanako".into();
    let scene = Scene::default().add_shape(shape.clone());
    assert!(locate(pt(100.0, 145.0), &scene, &no_selection()).is_some());
    assert!(locate(pt(100.0, 155.0), &scene, &no_selection()).is_none());
    shape.is_cohabiting_with_index = true;
    let scene = Scene::default().add_shape(shape);
    assert!(locate(pt(100.0, 160.0), &scene, &no_selection()).is_some());
}

#[test]
fn line_hit_within_slop_plus_stroke() {
    let scene = Scene::default().add_line(make_line(1, pt(0.0, 0.0), pt(100.0, 0.0)));
    assert!(locate(pt(50.0, 7.0), &scene, &no_selection()).is_some());
    assert!(locate(pt(50.0, 7.5), &scene, &no_selection()).is_none());
}

#[test]
fn zero_length_line_is_never_hit() {
    let scene = Scene::default().add_line(make_line(1, pt(10.0, 10.0), pt(10.0, 10.0)));
    assert!(locate(pt(10.0, 10.0), &scene, &no_selection()).is_none());
}

#[test]
fn boundary_interior_misses_border_hits() {
    let scene = Scene::default().add_boundary(make_boundary(1, 0.0, 0.0, 100.0, 100.0));
    assert!(locate(pt(50.0, 50.0), &scene, &no_selection()).is_none());
    let hit = locate(pt(50.0, 2.0), &scene, &no_selection()).unwrap();
    assert_eq!(hit.element, ElementRef::boundary(1));
}

#[test]
fn boundary_outer_edge_is_exclusive() {
    let scene = Scene::default().add_boundary(make_boundary(1, 0.0, 0.0, 100.0, 100.0));
    assert!(locate(pt(0.0, 50.0), &scene, &no_selection()).is_none());
    assert!(locate(pt(15.0, 50.0), &scene, &no_selection()).is_some());
}

#[test]
fn text_beats_shape_beats_line_beats_boundary() {
    let scene = Scene::default()
        .add_boundary(make_boundary(1, 90.0, 90.0, 100.0, 100.0))
        .add_line(make_line(2, pt(80.0, 100.0), pt(200.0, 100.0)))
        .add_shape(make_shape(3, 100.0, 100.0))
        .add_text(make_text(4, 95.0, 95.0, 20.0, 20.0));
    assert_eq!(locate(pt(100.0, 100.0), &scene, &no_selection()).unwrap().element, ElementRef::text(4));
    let scene = scene.remove_elements(&[ElementRef::text(4)]);
    assert_eq!(locate(pt(100.0, 100.0), &scene, &no_selection()).unwrap().element, ElementRef::shape(3));
    let scene = scene.remove_elements(&[ElementRef::shape(3)]);
    assert_eq!(locate(pt(100.0, 100.0), &scene, &no_selection()).unwrap().element, ElementRef::line(2));
    let scene = scene.remove_elements(&[ElementRef::line(2)]);
    assert_eq!(locate(pt(100.0, 100.0), &scene, &no_selection()).unwrap().element, ElementRef::boundary(1));
}

#[test]
fn later_shape_is_hit_first() {
    let scene = Scene::default().add_shape(make_shape(1, 100.0, 100.0)).add_shape(make_shape(2, 110.0, 100.0));
    assert_eq!(locate(pt(105.0, 100.0), &scene, &no_selection()).unwrap().element, ElementRef::shape(2));
}

// =============================================================
// locate: handles
// =============================================================

#[test]
fn selected_line_end_handle_beats_shape_underneath() {
    let scene = Scene::default()
        .add_line(make_line(1, pt(0.0, 100.0), pt(100.0, 100.0)))
        .add_shape(make_shape(2, 100.0, 100.0));
    let selection = Selection::single(ElementRef::line(1));
    let hit = locate(pt(103.0, 100.0), &scene, &selection).unwrap();
    assert_eq!(hit.element, ElementRef::line(1));
    assert_eq!(hit.handle, Some(Handle::LineEndpoint(LineEnd::End)));
}

#[test]
fn unselected_line_has_no_handles() {
    let scene = Scene::default().add_line(make_line(1, pt(0.0, 0.0), pt(100.0, 0.0)));
    let hit = locate(pt(0.0, 0.0), &scene, &no_selection()).unwrap();
    assert!(hit.handle.is_none());
}

#[test]
fn overlapping_handles_prefer_line_over_boundary() {
    let scene = Scene::default()
        .add_boundary(make_boundary(1, 0.0, 0.0, 100.0, 60.0))
        .add_line(make_line(2, pt(0.0, 0.0), pt(0.0, -100.0)));
    let mut selection = Selection::single(ElementRef::boundary(1));
    selection.insert(ElementRef::line(2));
    let hit = locate(pt(0.0, 0.0), &scene, &selection).unwrap();
    assert_eq!(hit.element, ElementRef::line(2));
    assert_eq!(hit.handle, Some(Handle::LineEndpoint(LineEnd::Start)));
}

#[test]
fn line_handle_radius_is_strict() {
    let scene = Scene::default().add_line(make_line(1, pt(0.0, 0.0), pt(100.0, 0.0)));
    let selection = Selection::single(ElementRef::line(1));
    let hit = locate(pt(0.0, 8.0), &scene, &selection);
    assert!(hit.is_none_or(|h| h.handle.is_none()));
    let hit = locate(pt(0.0, 7.9), &scene, &selection).unwrap();
    assert_eq!(hit.handle, Some(Handle::LineEndpoint(LineEnd::Start)));
}

#[test]
fn text_resize_handle_square() {
    let scene = Scene::default().add_text(make_text(1, 0.0, 0.0, 80.0, 40.0));
    let selection = Selection::single(ElementRef::text(1));
    assert_eq!(locate(pt(85.0, 45.0), &scene, &selection).unwrap().handle, Some(Handle::TextResize));
    assert_eq!(locate(pt(76.0, 36.0), &scene, &selection).unwrap().handle, Some(Handle::TextResize));
    assert!(locate(pt(86.0, 45.0), &scene, &selection).is_none());
}

#[test]
fn boundary_edge_midpoint_handle() {
    let scene = Scene::default().add_boundary(make_boundary(1, 0.0, 0.0, 100.0, 60.0));
    let selection = Selection::single(ElementRef::boundary(1));
    let hit = locate(pt(101.0, 31.0), &scene, &selection).unwrap();
    assert_eq!(hit.handle, Some(Handle::Boundary(BoundaryHandle::MiddleRight)));
    let hit = locate(pt(50.0, 60.0), &scene, &selection).unwrap();
    assert_eq!(hit.handle, Some(Handle::Boundary(BoundaryHandle::BottomCenter)));
}

// =============================================================
// shape_center_at
// =============================================================

#[test]
fn shape_center_returns_center_of_shape_under_point() {
    let scene = Scene::default().add_shape(make_shape(1, 100.0, 100.0));
    assert_eq!(shape_center_at(pt(120.0, 90.0), &scene), Some(pt(100.0, 100.0)));
    assert_eq!(shape_center_at(pt(300.0, 300.0), &scene), None);
}

#[test]
fn shape_center_ignores_non_shapes() {
    let scene = Scene::default()
        .add_shape(make_shape(1, 100.0, 100.0))
        .add_text(make_text(2, 90.0, 90.0, 20.0, 20.0));
    assert_eq!(shape_center_at(pt(100.0, 100.0), &scene), None);
}
