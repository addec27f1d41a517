#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::scene::{ElementId, ElementKind, ElementRef, Scene};

/// Deduplicated set of selected elements.
///
/// Owned by the editor session rather than the history, so undoing an edit
/// never resurrects a stale selection. Callers prune it against the current
/// scene after every commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<ElementRef>);

impl Selection {
    #[must_use]
    pub fn single(element: ElementRef) -> Self {
        Self(BTreeSet::from([element]))
    }

    #[must_use]
    pub fn contains(&self, element: &ElementRef) -> bool {
        self.0.contains(element)
    }

    pub fn insert(&mut self, element: ElementRef) -> bool {
        self.0.insert(element)
    }

    pub fn remove(&mut self, element: &ElementRef) -> bool {
        self.0.remove(element)
    }

    /// Add `element` if absent, remove it if present.
    pub fn toggle(&mut self, element: ElementRef) {
        if !self.0.remove(&element) {
            self.0.insert(element);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementRef> {
        self.0.iter()
    }

    /// Ids of the selected elements of one kind.
    pub fn ids_of(&self, kind: ElementKind) -> impl Iterator<Item = ElementId> + '_ {
        self.0.iter().filter(move |r| r.kind == kind).map(|r| r.id)
    }

    #[must_use]
    pub fn has_kind(&self, kind: ElementKind) -> bool {
        self.ids_of(kind).next().is_some()
    }

    /// Drop references to elements that no longer exist in `scene`.
    pub fn retain_existing(&mut self, scene: &Scene) {
        self.0.retain(|r| scene.contains(r));
    }
}

impl FromIterator<ElementRef> for Selection {
    fn from_iter<I: IntoIterator<Item = ElementRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a ElementRef;
    type IntoIter = std::collections::btree_set::Iter<'a, ElementRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Axis-aligned rubber band in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Normalized rectangle spanned by two corner points.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { x: a.x.min(b.x), y: a.y.min(b.y), width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    fn overlaps(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        self.x < x + width && x < self.x + self.width && self.y < y + height && y < self.y + self.height
    }
}

/// Elements captured by a range selection over `rect`.
///
/// Shapes are captured by their center, lines only when both endpoints are
/// inside, boundaries and text boxes when they overlap the band at all.
#[must_use]
pub fn range_select(scene: &Scene, rect: &SelectionRect) -> Selection {
    let shapes = scene
        .shapes
        .iter()
        .filter(|s| rect.contains_point(Point::new(s.x, s.y)))
        .map(|s| ElementRef::shape(s.id));
    let lines = scene
        .lines
        .iter()
        .filter(|l| rect.contains_point(l.start) && rect.contains_point(l.end))
        .map(|l| ElementRef::line(l.id));
    let boundaries = scene
        .boundaries
        .iter()
        .filter(|b| rect.overlaps(b.x, b.y, b.width, b.height))
        .map(|b| ElementRef::boundary(b.id));
    let texts = scene
        .texts
        .iter()
        .filter(|t| rect.overlaps(t.x, t.y, t.width, t.height))
        .map(|t| ElementRef::text(t.id));
    shapes.chain(lines).chain(boundaries).chain(texts).collect()
}
