#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_distance_is_euclidean() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_midpoint() {
    let m = Point::new(0.0, 10.0).midpoint(Point::new(20.0, 30.0));
    assert!(point_approx_eq(m, Point::new(10.0, 20.0)));
}

#[test]
fn point_offset() {
    assert_eq!(Point::new(1.0, 2.0).offset(-1.0, 3.0), Point::new(0.0, 5.0));
}

#[test]
fn point_serializes_as_xy_object() {
    let json = serde_json::to_value(Point::new(1.5, -2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": -2.0 }));
}

// --- Camera ---

#[test]
fn default_camera_is_identity() {
    let cam = Camera::default();
    let p = Point::new(123.0, -45.0);
    assert!(point_approx_eq(cam.screen_to_world(p), p));
    assert!(point_approx_eq(cam.world_to_screen(p), p));
}

#[test]
fn screen_to_world_accounts_for_pan_and_zoom() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let w = cam.screen_to_world(Point::new(300.0, 250.0));
    assert!(point_approx_eq(w, Point::new(100.0, 100.0)));
}

#[test]
fn world_screen_roundtrip() {
    let cam = Camera { pan_x: -37.0, pan_y: 12.5, zoom: 0.75 };
    let p = Point::new(40.0, 90.0);
    assert!(point_approx_eq(cam.screen_to_world(cam.world_to_screen(p)), p));
}

#[test]
fn pan_by_keeps_content_under_fingers() {
    let mut cam = Camera::default();
    let world_before = cam.screen_to_world(Point::new(50.0, 50.0));
    cam.pan_by(10.0, -5.0);
    let world_after = cam.screen_to_world(Point::new(60.0, 45.0));
    assert!(point_approx_eq(world_before, world_after));
}
