//! Scene model: genogram elements, element references, and pure transforms.
//!
//! A [`Scene`] is a plain value holding the four element collections. Every
//! edit produces a new `Scene` from the previous one; nothing here mutates a
//! scene in place once it has been committed to history. Transforms are total:
//! when a target id does not exist they return an unchanged copy, which the
//! history manager then discards as a no-op.
//!
//! Field names on the wire follow the project file format (`type`,
//! `isDeceased`, `strokeWidth`, ...) so saved projects stay readable by
//! older builds.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{FONT_SIZE_MEDIUM, GRID_SIZE};

/// Identifier shared by all element kinds. Allocated from one counter.
pub type ElementId = u64;

/// Largest id a session hands out: the top of the integer range a JavaScript
/// number holds exactly, so ids survive JSON and the browser bridge unchanged.
pub const MAX_ELEMENT_ID: ElementId = (1 << 53) - 1;

/// Accept a host-supplied number as an id when it is a whole number in
/// `0..=MAX_ELEMENT_ID`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
pub fn element_id_from_f64(value: f64) -> Option<ElementId> {
    let in_range = value >= 0.0 && value <= MAX_ELEMENT_ID as f64;
    (in_range && value.fract() == 0.0).then_some(value as ElementId)
}

/// Which collection an element lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Shape,
    Line,
    Boundary,
    Text,
}

/// Typed reference to exactly one element in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: ElementId,
}

impl ElementRef {
    #[must_use]
    pub fn new(kind: ElementKind, id: ElementId) -> Self {
        Self { kind, id }
    }

    #[must_use]
    pub fn shape(id: ElementId) -> Self {
        Self::new(ElementKind::Shape, id)
    }

    #[must_use]
    pub fn line(id: ElementId) -> Self {
        Self::new(ElementKind::Line, id)
    }

    #[must_use]
    pub fn boundary(id: ElementId) -> Self {
        Self::new(ElementKind::Boundary, id)
    }

    #[must_use]
    pub fn text(id: ElementId) -> Self {
        Self::new(ElementKind::Text, id)
    }
}

/// Person symbol variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Male,
    Female,
    IndexMale,
    IndexFemale,
}

impl ShapeKind {
    /// Female variants render as circles, male variants as squares.
    #[must_use]
    pub fn is_female(self) -> bool {
        matches!(self, Self::Female | Self::IndexFemale)
    }

    /// Index (proband) variants carry a nested inner outline.
    #[must_use]
    pub fn is_index(self) -> bool {
        matches!(self, Self::IndexMale | Self::IndexFemale)
    }
}

/// Stroke pattern for relationship lines and boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Tick-mark glyph drawn across the middle of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    Separation,
    Divorce,
}

/// A person. `x`/`y` is the center of the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Name shown below the symbol.
    #[serde(default)]
    pub text: String,
    /// Age shown inside the symbol.
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub is_deceased: bool,
    #[serde(default)]
    pub is_cohabiting_with_index: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// A relationship edge between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub style: LineStyle,
    pub start: Point,
    pub end: Point,
    pub stroke_width: f64,
    #[serde(default)]
    pub decoration: Option<Decoration>,
}

/// Household rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boundary {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub style: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// Free-floating resizable text box. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, rename = "text")]
    pub content: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

fn default_font_size() -> f64 {
    FONT_SIZE_MEDIUM
}

/// Which end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Start,
    End,
}

/// The eight resize handles of a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryHandle {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl BoundaryHandle {
    pub const ALL: [BoundaryHandle; 8] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Nominal position of this handle on `boundary`.
    #[must_use]
    pub fn position(self, boundary: &Boundary) -> Point {
        let Boundary { x, y, width: w, height: h, .. } = *boundary;
        match self {
            Self::TopLeft => Point::new(x, y),
            Self::TopCenter => Point::new(x + w / 2.0, y),
            Self::TopRight => Point::new(x + w, y),
            Self::MiddleLeft => Point::new(x, y + h / 2.0),
            Self::MiddleRight => Point::new(x + w, y + h / 2.0),
            Self::BottomLeft => Point::new(x, y + h),
            Self::BottomCenter => Point::new(x + w / 2.0, y + h),
            Self::BottomRight => Point::new(x + w, y + h),
        }
    }
}

/// A field update applied by [`Scene::restyle_lines`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineRestyle {
    /// Applies to lines and boundaries.
    StrokeWidth(f64),
    /// Applies to lines and boundaries.
    Style(LineStyle),
    /// Applies to lines only.
    Decoration(Option<Decoration>),
}

/// Element ids grouped per collection, for membership tests inside transforms.
#[derive(Debug, Default)]
struct IdSets {
    shapes: HashSet<ElementId>,
    lines: HashSet<ElementId>,
    boundaries: HashSet<ElementId>,
    texts: HashSet<ElementId>,
}

impl IdSets {
    fn from_refs<'a>(refs: impl IntoIterator<Item = &'a ElementRef>) -> Self {
        let mut sets = Self::default();
        for r in refs {
            match r.kind {
                ElementKind::Shape => sets.shapes.insert(r.id),
                ElementKind::Line => sets.lines.insert(r.id),
                ElementKind::Boundary => sets.boundaries.insert(r.id),
                ElementKind::Text => sets.texts.insert(r.id),
            };
        }
        sets
    }
}

/// All elements on the canvas. Insertion order is z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub boundaries: Vec<Boundary>,
    #[serde(default)]
    pub texts: Vec<Text>,
}

impl Scene {
    // --- Queries ---

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.lines.is_empty() && self.boundaries.is_empty() && self.texts.is_empty()
    }

    /// Total number of elements across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len() + self.lines.len() + self.boundaries.len() + self.texts.len()
    }

    #[must_use]
    pub fn shape(&self, id: ElementId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn line(&self, id: ElementId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn boundary(&self, id: ElementId) -> Option<&Boundary> {
        self.boundaries.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn text(&self, id: ElementId) -> Option<&Text> {
        self.texts.iter().find(|t| t.id == id)
    }

    /// Whether `element` names an element that exists in this scene.
    #[must_use]
    pub fn contains(&self, element: &ElementRef) -> bool {
        match element.kind {
            ElementKind::Shape => self.shape(element.id).is_some(),
            ElementKind::Line => self.line(element.id).is_some(),
            ElementKind::Boundary => self.boundary(element.id).is_some(),
            ElementKind::Text => self.text(element.id).is_some(),
        }
    }

    /// Largest id used by any element, or `None` for an empty scene.
    #[must_use]
    pub fn max_id(&self) -> Option<ElementId> {
        let shapes = self.shapes.iter().map(|s| s.id);
        let lines = self.lines.iter().map(|l| l.id);
        let boundaries = self.boundaries.iter().map(|b| b.id);
        let texts = self.texts.iter().map(|t| t.id);
        shapes.chain(lines).chain(boundaries).chain(texts).max()
    }

    // --- Insertion ---

    #[must_use]
    pub fn add_shape(&self, shape: Shape) -> Scene {
        let mut next = self.clone();
        next.shapes.push(shape);
        next
    }

    #[must_use]
    pub fn add_line(&self, line: Line) -> Scene {
        let mut next = self.clone();
        next.lines.push(line);
        next
    }

    #[must_use]
    pub fn add_boundary(&self, boundary: Boundary) -> Scene {
        let mut next = self.clone();
        next.boundaries.push(boundary);
        next
    }

    #[must_use]
    pub fn add_text(&self, text: Text) -> Scene {
        let mut next = self.clone();
        next.texts.push(text);
        next
    }

    // --- Bulk transforms ---

    /// Drop every referenced element from all four collections in one pass.
    #[must_use]
    pub fn remove_elements<'a>(&self, refs: impl IntoIterator<Item = &'a ElementRef>) -> Scene {
        let ids = IdSets::from_refs(refs);
        Scene {
            shapes: self.shapes.iter().filter(|s| !ids.shapes.contains(&s.id)).cloned().collect(),
            lines: self.lines.iter().filter(|l| !ids.lines.contains(&l.id)).cloned().collect(),
            boundaries: self
                .boundaries
                .iter()
                .filter(|b| !ids.boundaries.contains(&b.id))
                .cloned()
                .collect(),
            texts: self.texts.iter().filter(|t| !ids.texts.contains(&t.id)).cloned().collect(),
        }
    }

    /// Shift every referenced element by `(dx, dy)`. Lines move both endpoints.
    #[must_use]
    pub fn translate<'a>(&self, refs: impl IntoIterator<Item = &'a ElementRef>, dx: f64, dy: f64) -> Scene {
        let ids = IdSets::from_refs(refs);
        let mut next = self.clone();
        for s in next.shapes.iter_mut().filter(|s| ids.shapes.contains(&s.id)) {
            s.x += dx;
            s.y += dy;
        }
        for l in next.lines.iter_mut().filter(|l| ids.lines.contains(&l.id)) {
            l.start = l.start.offset(dx, dy);
            l.end = l.end.offset(dx, dy);
        }
        for b in next.boundaries.iter_mut().filter(|b| ids.boundaries.contains(&b.id)) {
            b.x += dx;
            b.y += dy;
        }
        for t in next.texts.iter_mut().filter(|t| ids.texts.contains(&t.id)) {
            t.x += dx;
            t.y += dy;
        }
        next
    }

    /// Update a stroke field on the referenced lines and boundaries.
    #[must_use]
    pub fn restyle_lines<'a>(&self, refs: impl IntoIterator<Item = &'a ElementRef>, restyle: LineRestyle) -> Scene {
        let ids = IdSets::from_refs(refs);
        let mut next = self.clone();
        for l in next.lines.iter_mut().filter(|l| ids.lines.contains(&l.id)) {
            match restyle {
                LineRestyle::StrokeWidth(w) => l.stroke_width = w,
                LineRestyle::Style(style) => l.style = style,
                LineRestyle::Decoration(decoration) => l.decoration = decoration,
            }
        }
        for b in next.boundaries.iter_mut().filter(|b| ids.boundaries.contains(&b.id)) {
            match restyle {
                LineRestyle::StrokeWidth(w) => b.stroke_width = Some(w),
                LineRestyle::Style(style) => b.style = Some(style),
                LineRestyle::Decoration(_) => {}
            }
        }
        next
    }

    /// Set the font size of the referenced shapes and text boxes.
    #[must_use]
    pub fn set_font_size<'a>(&self, refs: impl IntoIterator<Item = &'a ElementRef>, size: f64) -> Scene {
        let ids = IdSets::from_refs(refs);
        let mut next = self.clone();
        for s in next.shapes.iter_mut().filter(|s| ids.shapes.contains(&s.id)) {
            s.font_size = Some(size);
        }
        for t in next.texts.iter_mut().filter(|t| ids.texts.contains(&t.id)) {
            t.font_size = size;
        }
        next
    }

    // --- Single-element edits ---

    #[must_use]
    pub fn relabel_shape(&self, id: ElementId, name: &str, age: &str) -> Scene {
        self.map_shape(id, |s| {
            s.text = name.to_owned();
            s.age = age.to_owned();
        })
    }

    #[must_use]
    pub fn relabel_boundary(&self, id: ElementId, label: &str) -> Scene {
        let mut next = self.clone();
        if let Some(b) = next.boundaries.iter_mut().find(|b| b.id == id) {
            b.label = label.to_owned();
        }
        next
    }

    #[must_use]
    pub fn set_text_content(&self, id: ElementId, content: &str) -> Scene {
        self.map_text(id, |t| t.content = content.to_owned())
    }

    #[must_use]
    pub fn toggle_deceased(&self, id: ElementId) -> Scene {
        self.map_shape(id, |s| s.is_deceased = !s.is_deceased)
    }

    #[must_use]
    pub fn toggle_cohabiting(&self, id: ElementId) -> Scene {
        self.map_shape(id, |s| s.is_cohabiting_with_index = !s.is_cohabiting_with_index)
    }

    /// Set `decoration` on a line, or clear it when the line already carries it.
    #[must_use]
    pub fn toggle_decoration(&self, id: ElementId, decoration: Decoration) -> Scene {
        self.map_line(id, |l| {
            l.decoration = if l.decoration == Some(decoration) { None } else { Some(decoration) };
        })
    }

    /// Move one endpoint of a line to `point`.
    #[must_use]
    pub fn move_line_endpoint(&self, id: ElementId, end: LineEnd, point: Point) -> Scene {
        self.map_line(id, |l| match end {
            LineEnd::Start => l.start = point,
            LineEnd::End => l.end = point,
        })
    }

    /// Recompute a boundary's box from a dragged handle at `(px, py)`.
    ///
    /// The edge opposite the handle stays fixed. A result narrower or shorter
    /// than two grid units keeps the previous horizontal or vertical extent
    /// respectively; the two axes are judged independently.
    #[must_use]
    pub fn resize_boundary(&self, id: ElementId, handle: BoundaryHandle, px: f64, py: f64) -> Scene {
        let mut next = self.clone();
        let Some(b) = next.boundaries.iter_mut().find(|b| b.id == id) else {
            return next;
        };
        let (mut x, mut y, mut width, mut height) = (b.x, b.y, b.width, b.height);
        let right = x + width;
        let bottom = y + height;
        match handle {
            BoundaryHandle::TopLeft => {
                width = right - px;
                height = bottom - py;
                x = px;
                y = py;
            }
            BoundaryHandle::TopRight => {
                width = px - x;
                height = bottom - py;
                y = py;
            }
            BoundaryHandle::BottomLeft => {
                width = right - px;
                height = py - y;
                x = px;
            }
            BoundaryHandle::BottomRight => {
                width = px - x;
                height = py - y;
            }
            BoundaryHandle::TopCenter => {
                height = bottom - py;
                y = py;
            }
            BoundaryHandle::BottomCenter => {
                height = py - y;
            }
            BoundaryHandle::MiddleLeft => {
                width = right - px;
                x = px;
            }
            BoundaryHandle::MiddleRight => {
                width = px - x;
            }
        }
        let min = GRID_SIZE * 2.0;
        if width < min {
            width = b.width;
            x = b.x;
        }
        if height < min {
            height = b.height;
            y = b.y;
        }
        b.x = x;
        b.y = y;
        b.width = width;
        b.height = height;
        next
    }

    /// Resize a text box from its bottom-right corner, keeping at least one grid unit.
    #[must_use]
    pub fn resize_text(&self, id: ElementId, width: f64, height: f64) -> Scene {
        self.map_text(id, |t| {
            t.width = width.max(GRID_SIZE);
            t.height = height.max(GRID_SIZE);
        })
    }

    fn map_shape(&self, id: ElementId, f: impl FnOnce(&mut Shape)) -> Scene {
        let mut next = self.clone();
        if let Some(s) = next.shapes.iter_mut().find(|s| s.id == id) {
            f(s);
        }
        next
    }

    fn map_line(&self, id: ElementId, f: impl FnOnce(&mut Line)) -> Scene {
        let mut next = self.clone();
        if let Some(l) = next.lines.iter_mut().find(|l| l.id == id) {
            f(l);
        }
        next
    }

    fn map_text(&self, id: ElementId, f: impl FnOnce(&mut Text)) -> Scene {
        let mut next = self.clone();
        if let Some(t) = next.texts.iter_mut().find(|t| t.id == id) {
            f(t);
        }
        next
    }
}
