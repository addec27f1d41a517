#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{
    BOUNDARY_BORDER_BAND, GRID_SIZE, HANDLE_RADIUS, LINE_HIT_SLOP, SHAPE_COHABITING_HIT_HEIGHT, SHAPE_LABEL_HEIGHT,
    TEXT_HANDLE_HALF,
};
use crate::scene::{Boundary, BoundaryHandle, ElementKind, ElementRef, Line, LineEnd, Scene, Shape, Text};
use crate::selection::Selection;

/// Interactive hotspot on a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    LineEndpoint(LineEnd),
    TextResize,
    Boundary(BoundaryHandle),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element: ElementRef,
    pub handle: Option<Handle>,
}

impl Hit {
    fn body(element: ElementRef) -> Self {
        Self { element, handle: None }
    }
}

/// Find what lies under `point`, checking handles of selected elements first,
/// then texts, shapes, lines, and boundaries, each topmost first.
///
/// Overlapping handles resolve in selection order (kind, then id), so a
/// selected line's endpoint wins over a selected boundary's corner.
#[must_use]
pub fn locate(point: Point, scene: &Scene, selection: &Selection) -> Option<Hit> {
    if let Some(hit) = locate_handle(point, scene, selection) {
        return Some(hit);
    }
    if let Some(t) = scene.texts.iter().rev().find(|t| text_contains(t, point)) {
        return Some(Hit::body(ElementRef::text(t.id)));
    }
    if let Some(s) = scene.shapes.iter().rev().find(|s| shape_contains(s, point)) {
        return Some(Hit::body(ElementRef::shape(s.id)));
    }
    if let Some(l) = scene.lines.iter().rev().find(|l| line_contains(l, point)) {
        return Some(Hit::body(ElementRef::line(l.id)));
    }
    if let Some(b) = scene.boundaries.iter().rev().find(|b| boundary_border_contains(b, point)) {
        return Some(Hit::body(ElementRef::boundary(b.id)));
    }
    None
}

fn locate_handle(point: Point, scene: &Scene, selection: &Selection) -> Option<Hit> {
    for element in selection.iter() {
        let handle = match element.kind {
            ElementKind::Line => scene.line(element.id).and_then(|l| line_handle_at(l, point)),
            ElementKind::Text => scene.text(element.id).and_then(|t| text_handle_at(t, point)),
            ElementKind::Boundary => scene.boundary(element.id).and_then(|b| boundary_handle_at(b, point)),
            ElementKind::Shape => None,
        };
        if let Some(handle) = handle {
            return Some(Hit { element: *element, handle: Some(handle) });
        }
    }
    None
}

fn line_handle_at(line: &Line, point: Point) -> Option<Handle> {
    if point.distance(line.start) < HANDLE_RADIUS {
        Some(Handle::LineEndpoint(LineEnd::Start))
    } else if point.distance(line.end) < HANDLE_RADIUS {
        Some(Handle::LineEndpoint(LineEnd::End))
    } else {
        None
    }
}

fn text_handle_at(text: &Text, point: Point) -> Option<Handle> {
    let cx = text.x + text.width;
    let cy = text.y + text.height;
    let inside = point.x >= cx - TEXT_HANDLE_HALF
        && point.x <= cx + TEXT_HANDLE_HALF
        && point.y >= cy - TEXT_HANDLE_HALF
        && point.y <= cy + TEXT_HANDLE_HALF;
    inside.then_some(Handle::TextResize)
}

fn boundary_handle_at(boundary: &Boundary, point: Point) -> Option<Handle> {
    BoundaryHandle::ALL
        .into_iter()
        .find(|h| point.distance(h.position(boundary)) < HANDLE_RADIUS)
        .map(Handle::Boundary)
}

fn text_contains(text: &Text, p: Point) -> bool {
    p.x >= text.x && p.x <= text.x + text.width && p.y >= text.y && p.y <= text.y + text.height
}

fn shape_contains(shape: &Shape, p: Point) -> bool {
    let half_w = shape.width / 2.0;
    let half_h = shape.height / 2.0;
    let mut extra = 0.0;
    if !shape.text.is_empty() {
        extra += SHAPE_LABEL_HEIGHT;
    }
    if shape.is_cohabiting_with_index {
        extra += SHAPE_COHABITING_HIT_HEIGHT;
    }
    p.x >= shape.x - half_w && p.x <= shape.x + half_w && p.y >= shape.y - half_h && p.y <= shape.y + half_h + extra
}

fn line_contains(line: &Line, p: Point) -> bool {
    if line.start == line.end {
        return false;
    }
    distance_to_segment(p, line.start, line.end) < LINE_HIT_SLOP + line.stroke_width
}

fn boundary_border_contains(b: &Boundary, p: Point) -> bool {
    let inside_outer = p.x > b.x && p.x < b.x + b.width && p.y > b.y && p.y < b.y + b.height;
    let band = BOUNDARY_BORDER_BAND;
    let inside_inner =
        p.x > b.x + band && p.x < b.x + b.width - band && p.y > b.y + band && p.y < b.y + b.height - band;
    inside_outer && !inside_inner
}

/// Shortest distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * abx, a.y + t * aby))
}

/// Center of the topmost shape under `point`, ignoring selection handles.
#[must_use]
pub fn shape_center_at(point: Point, scene: &Scene) -> Option<Point> {
    match locate(point, scene, &Selection::default()) {
        Some(Hit { element: ElementRef { kind: ElementKind::Shape, id }, .. }) => {
            scene.shape(id).map(|s| Point::new(s.x, s.y))
        }
        _ => None,
    }
}

/// Round to the nearest half grid unit. Halves round toward positive infinity.
#[must_use]
pub fn snap_to_grid(value: f64) -> f64 {
    let step = GRID_SIZE / 2.0;
    (value / step + 0.5).floor() * step
}

#[must_use]
pub fn snap_point(p: Point) -> Point {
    Point::new(snap_to_grid(p.x), snap_to_grid(p.y))
}

/// Constrain `target` to the horizontal or vertical through `anchor`,
/// whichever axis has the larger delta. Ties go vertical.
#[must_use]
pub fn axis_lock(anchor: Point, target: Point) -> Point {
    let dx = (target.x - anchor.x).abs();
    let dy = (target.y - anchor.y).abs();
    if dx > dy { Point::new(target.x, anchor.y) } else { Point::new(anchor.x, target.y) }
}
