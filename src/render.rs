//! Rendering: serializes the scene to SVG markup.
//!
//! The live surface and the exported image share one code path. The live
//! surface adds the grid layer, selection overlays, and gesture previews;
//! export strips those and crops the view box to the content bounds.
//!
//! PNG export is split in two: [`prepare_png`] produces the SVG plus the
//! target pixel size, the host rasterizes it, and [`finish_png_export`]
//! turns the host's outcome into a typed result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;
use tracing::{debug, warn};

use crate::camera::Point;
use crate::consts::{
    BOUNDARY_LABEL_HEIGHT, CANVAS_HEIGHT, CANVAS_WIDTH, FONT_SIZE_MEDIUM, GRID_SIZE, PNG_EXPORT_SCALE,
    SHAPE_COHABITING_EXPORT_HEIGHT, SHAPE_COHABITING_HIT_HEIGHT, SHAPE_LABEL_HEIGHT, SVG_CANVAS_ID,
};
use crate::i18n::{KEY_COHABITING_CAPTION, KEY_PNG_SAVE_ERROR, Localizer};
use crate::scene::{Boundary, BoundaryHandle, Decoration, ElementId, ElementRef, Line, LineStyle, Scene, Shape, Text};
use crate::selection::{Selection, SelectionRect};

const SELECTION_COLOR: &str = "#4f46e5";
const SHAPE_FILL: &str = "#f9f9f9";
const LABEL_COLOR: &str = "#333";
const BOUNDARY_HANDLE_SIZE: f64 = 8.0;
const DEFAULT_BOUNDARY_STROKE: f64 = 2.0;
const NAME_FONT_SIZE: f64 = 14.0;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export")]
    EmptyScene,
    /// The host failed to rasterize the SVG. `message` is localized for display.
    #[error("{message}")]
    Rasterize { message: String, cause: String },
}

/// Read-only snapshot of everything the surface draws.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View<'a> {
    pub scene: &'a Scene,
    pub selection: &'a Selection,
    pub ghost: Option<&'a Shape>,
    pub preview_line: Option<Line>,
    pub rubber_band: Option<SelectionRect>,
    pub editing_text: Option<ElementId>,
    pub grid_visible: bool,
}

/// Axis-aligned rectangle in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// SVG ready for rasterization by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PngRequest {
    pub svg: String,
    /// Size of the SVG in scene units.
    pub width: f64,
    pub height: f64,
    /// Raster pixels per scene unit.
    pub scale: f64,
}

impl PngRequest {
    #[must_use]
    pub fn pixel_width(&self) -> f64 {
        self.width * self.scale
    }

    #[must_use]
    pub fn pixel_height(&self) -> f64 {
        self.height * self.scale
    }
}

// =============================================================
// Entry points
// =============================================================

/// Render the live editing surface.
#[must_use]
pub fn render_svg(view: &View<'_>, strings: &dyn Localizer) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{SVG_CANVAS_ID}" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}">"#
    );
    if view.grid_visible {
        push_grid(&mut out);
    }
    push_content(&mut out, view.scene, Some(view), strings);
    if let Some(ghost) = view.ghost {
        out.push_str(r#"<g opacity="0.4" pointer-events="none">"#);
        push_shape(&mut out, ghost, false, strings);
        out.push_str("</g>");
    }
    if let Some(line) = &view.preview_line {
        push_line(&mut out, line, false);
    }
    if let Some(r) = view.rubber_band {
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="rgba(79, 70, 229, 0.1)" stroke="rgba(79, 70, 229, 0.5)" stroke-width="1"/>"#,
            r.x, r.y, r.width, r.height
        ));
    }
    out.push_str("</svg>");
    out
}

/// Render `scene` for export: no grid or overlays, cropped to the content
/// bounds grown by `padding`, optionally over a white background.
pub fn export_svg(
    scene: &Scene,
    padding: f64,
    background: bool,
    strings: &dyn Localizer,
) -> Result<String, ExportError> {
    let bounds = content_bounds(scene, padding).ok_or(ExportError::EmptyScene)?;
    let Bounds { x, y, width, height } = bounds;
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{SVG_CANVAS_ID}" width="{width}" height="{height}" viewBox="{x} {y} {width} {height}">"#
    );
    if background {
        out.push_str(&format!(r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="white"/>"#));
    }
    push_content(&mut out, scene, None, strings);
    out.push_str("</svg>");
    debug!(elements = scene.len(), width, height, "svg exported");
    Ok(out)
}

/// Prepare a 2x raster export of `scene`.
pub fn prepare_png(
    scene: &Scene,
    padding: f64,
    background: bool,
    strings: &dyn Localizer,
) -> Result<PngRequest, ExportError> {
    let svg = export_svg(scene, padding, background, strings)?;
    let bounds = content_bounds(scene, padding).ok_or(ExportError::EmptyScene)?;
    Ok(PngRequest { svg, width: bounds.width, height: bounds.height, scale: PNG_EXPORT_SCALE })
}

/// Map the host's rasterization outcome to a typed result.
pub fn finish_png_export(result: Result<Vec<u8>, String>, strings: &dyn Localizer) -> Result<Vec<u8>, ExportError> {
    result.map_err(|cause| {
        warn!(%cause, "png rasterization failed");
        ExportError::Rasterize { message: strings.t(KEY_PNG_SAVE_ERROR, &[]), cause }
    })
}

/// Bounding box of everything drawn, including labels and stroke overhang,
/// grown by `padding` on every side. `None` for an empty scene.
#[must_use]
pub fn content_bounds(scene: &Scene, padding: f64) -> Option<Bounds> {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut include = |x0: f64, y0: f64, x1: f64, y1: f64| {
        min.x = min.x.min(x0);
        min.y = min.y.min(y0);
        max.x = max.x.max(x1);
        max.y = max.y.max(y1);
    };

    for s in &scene.shapes {
        let mut label = 0.0;
        if !s.text.is_empty() {
            label += SHAPE_LABEL_HEIGHT;
        }
        if s.is_cohabiting_with_index {
            label += SHAPE_COHABITING_EXPORT_HEIGHT;
        }
        let (hw, hh) = (s.width / 2.0, s.height / 2.0);
        include(s.x - hw - 5.0, s.y - hh - 5.0, s.x + hw + 5.0, s.y + hh + 5.0 + label);
    }
    for l in &scene.lines {
        let pad = l.stroke_width + 10.0;
        include(
            l.start.x.min(l.end.x) - pad,
            l.start.y.min(l.end.y) - pad,
            l.start.x.max(l.end.x) + pad,
            l.start.y.max(l.end.y) + pad,
        );
    }
    for b in &scene.boundaries {
        include(b.x - 2.0, b.y - 2.0, b.x + b.width + 2.0, b.y + b.height + 2.0 + BOUNDARY_LABEL_HEIGHT);
    }
    for t in &scene.texts {
        include(t.x, t.y, t.x + t.width, t.y + t.height);
    }

    if !min.x.is_finite() {
        return None;
    }
    Some(Bounds {
        x: min.x - padding,
        y: min.y - padding,
        width: (max.x - min.x) + padding * 2.0,
        height: (max.y - min.y) + padding * 2.0,
    })
}

// =============================================================
// Layers
// =============================================================

fn push_grid(out: &mut String) {
    out.push_str(&format!(
        concat!(
            r#"<g id="grid-group"><defs><pattern id="grid" width="{g}" height="{g}" patternUnits="userSpaceOnUse">"#,
            r##"<path d="M {g} 0 L 0 0 0 {g}" fill="none" stroke="#c0c0c0" stroke-width="0.5"/></pattern></defs>"##,
            r#"<rect width="100%" height="100%" fill="url(#grid)" pointer-events="none"/></g>"#,
        ),
        g = GRID_SIZE
    ));
}

/// Boundaries, then lines, then shapes, then texts. `view` enables overlays.
fn push_content(out: &mut String, scene: &Scene, view: Option<&View<'_>>, strings: &dyn Localizer) {
    let selected = |r: ElementRef| view.is_some_and(|v| v.selection.contains(&r));
    let editing = view.and_then(|v| v.editing_text);

    out.push_str(r#"<g id="canvas-content">"#);
    for b in &scene.boundaries {
        push_boundary(out, b, selected(ElementRef::boundary(b.id)));
    }
    for l in &scene.lines {
        push_line(out, l, selected(ElementRef::line(l.id)));
    }
    for s in &scene.shapes {
        push_shape(out, s, selected(ElementRef::shape(s.id)), strings);
    }
    for t in &scene.texts {
        push_text(out, t, selected(ElementRef::text(t.id)), editing == Some(t.id));
    }
    out.push_str("</g>");
}

// =============================================================
// Element renderers
// =============================================================

fn push_shape(out: &mut String, shape: &Shape, selected: bool, strings: &dyn Localizer) {
    let (w, h) = (shape.width, shape.height);
    let (hw, hh) = (w / 2.0, h / 2.0);
    out.push_str(&format!(r#"<g transform="translate({}, {})">"#, shape.x, shape.y));

    if shape.kind.is_female() {
        out.push_str(&format!(
            r#"<circle cx="0" cy="0" r="{hw}" fill="{SHAPE_FILL}" stroke="black" stroke-width="2"/>"#
        ));
        if shape.kind.is_index() {
            out.push_str(&format!(
                r#"<circle cx="0" cy="0" r="{}" stroke="black" stroke-width="1.5" fill="none"/>"#,
                hw * 0.7
            ));
        }
    } else {
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{w}" height="{h}" rx="2" ry="2" fill="{SHAPE_FILL}" stroke="black" stroke-width="2"/>"#,
            -hw, -hh
        ));
        if shape.kind.is_index() {
            let (iw, ih) = (w * 0.8, h * 0.8);
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{iw}" height="{ih}" rx="1" ry="1" stroke="black" stroke-width="1.5" fill="none"/>"#,
                -iw / 2.0,
                -ih / 2.0
            ));
        }
    }

    if !shape.age.is_empty() {
        out.push_str(&format!(
            r#"<text y="2" text-anchor="middle" font-size="18px" font-weight="bold" fill="{LABEL_COLOR}" dominant-baseline="middle" pointer-events="none">{}</text>"#,
            escape_xml(&shape.age)
        ));
    }
    let has_name = !shape.text.is_empty();
    if has_name {
        out.push_str(&format!(
            r##"<text y="{}" text-anchor="middle" font-size="{}px" fill="{LABEL_COLOR}" dominant-baseline="baseline" pointer-events="none" stroke="#ffffff" stroke-width="4px" stroke-linejoin="round" paint-order="stroke">{}</text>"##,
            hh + 16.0,
            shape.font_size.unwrap_or(NAME_FONT_SIZE),
            escape_xml(&shape.text)
        ));
    }
    if shape.is_deceased {
        let (dx, dy) = (hw * 0.8, hh * 0.8);
        out.push_str(&format!(
            r#"<g stroke="black" stroke-width="2.5"><line x1="{}" y1="{}" x2="{dx}" y2="{dy}"/><line x1="{}" y1="{dy}" x2="{dx}" y2="{}"/></g>"#,
            -dx, -dy, -dx, -dy
        ));
    }
    if shape.is_cohabiting_with_index {
        let y = hh + 16.0 + if has_name { 16.0 } else { 0.0 };
        out.push_str(&format!(
            r##"<text y="{y}" text-anchor="middle" font-size="12px" fill="black" stroke="#ffffff" stroke-width="4px" stroke-linejoin="round" paint-order="stroke" dominant-baseline="baseline">({})</text>"##,
            escape_xml(&strings.t(KEY_COHABITING_CAPTION, &[]))
        ));
    }
    if selected {
        let mut extra = 0.0;
        if has_name {
            extra += SHAPE_LABEL_HEIGHT;
        }
        if shape.is_cohabiting_with_index {
            extra += SHAPE_COHABITING_HIT_HEIGHT;
        }
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{SELECTION_COLOR}" stroke-width="1.5" stroke-dasharray="4 4" pointer-events="none"/>"#,
            -hw - 4.0,
            -hh - 4.0,
            w + 8.0,
            h + 8.0 + extra
        ));
    }
    out.push_str("</g>");
}

fn push_line(out: &mut String, line: &Line, selected: bool) {
    let Line { start: a, end: b, stroke_width: sw, .. } = *line;
    let dash = match line.style {
        LineStyle::Solid => "none",
        LineStyle::Dashed => "8 8",
    };
    out.push_str("<g>");
    out.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black" stroke-width="{sw}" stroke-dasharray="{dash}"/>"#,
        a.x, a.y, b.x, b.y
    ));
    if let Some(decoration) = line.decoration {
        let mid = a.midpoint(b);
        let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
        out.push_str(&format!(
            r#"<g transform="translate({}, {}) rotate({angle})" stroke="black" stroke-width="{}" stroke-linecap="round">"#,
            mid.x,
            mid.y,
            sw * 1.5
        ));
        let ticks: &[&str] = match decoration {
            Decoration::Separation => &["rotate(30)"],
            Decoration::Divorce => &["rotate(30) translate(-4, 0)", "rotate(30) translate(4, 0)"],
        };
        for transform in ticks {
            out.push_str(&format!(r#"<line x1="0" y1="-10" x2="0" y2="10" transform="{transform}"/>"#));
        }
        out.push_str("</g>");
    }
    if selected {
        out.push_str(&format!(
            r#"<g><line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{SELECTION_COLOR}" stroke-width="{}" stroke-opacity="0.5"/>"#,
            a.x,
            a.y,
            b.x,
            b.y,
            sw + 5.0
        ));
        for p in [a, b] {
            out.push_str(&format!(r#"<circle cx="{}" cy="{}" r="6" fill="{SELECTION_COLOR}"/>"#, p.x, p.y));
        }
        out.push_str("</g>");
    }
    out.push_str("</g>");
}

fn push_boundary(out: &mut String, b: &Boundary, selected: bool) {
    let dash = match b.style.unwrap_or(LineStyle::Dashed) {
        LineStyle::Solid => "none",
        LineStyle::Dashed => "8 4",
    };
    let sw = b.stroke_width.unwrap_or(DEFAULT_BOUNDARY_STROKE);
    out.push_str("<g>");
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="black" stroke-width="{sw}" stroke-dasharray="{dash}" rx="10" ry="10"/>"#,
        b.x, b.y, b.width, b.height
    ));
    out.push_str(&format!(
        r##"<text x="{}" y="{}" text-anchor="middle" font-size="{FONT_SIZE_MEDIUM}" fill="{LABEL_COLOR}" font-family="sans-serif" pointer-events="none" stroke="#f9f9f9" stroke-width="4px" stroke-linejoin="round" paint-order="stroke">{}</text>"##,
        b.x + b.width / 2.0,
        b.y + b.height + 15.0,
        escape_xml(&b.label)
    ));
    if selected {
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="12" ry="12" fill="none" stroke="{SELECTION_COLOR}" stroke-width="1.5" stroke-dasharray="4 4" pointer-events="none"/>"#,
            b.x - 2.0,
            b.y - 2.0,
            b.width + 4.0,
            b.height + 4.0
        ));
        let half = BOUNDARY_HANDLE_SIZE / 2.0;
        for handle in BoundaryHandle::ALL {
            let p = handle.position(b);
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{BOUNDARY_HANDLE_SIZE}" height="{BOUNDARY_HANDLE_SIZE}" fill="{SELECTION_COLOR}"/>"#,
                p.x - half,
                p.y - half
            ));
        }
    }
    out.push_str("</g>");
}

fn push_text(out: &mut String, t: &Text, selected: bool, editing: bool) {
    let display = if editing { "none" } else { "block" };
    out.push_str(&format!(
        concat!(
            r#"<g><foreignObject x="{}" y="{}" width="{}" height="{}" style="overflow: visible">"#,
            r#"<div xmlns="http://www.w3.org/1999/xhtml" style="width: 100%; height: 100%; padding: 4px; "#,
            r#"font-size: {}px; font-weight: bold; line-height: 1.2; font-family: sans-serif; "#,
            r#"word-wrap: break-word; color: black; white-space: pre-wrap; display: {}">{}</div></foreignObject>"#,
        ),
        t.x,
        t.y,
        t.width,
        t.height,
        t.font_size + 4.0,
        display,
        escape_xml(&t.content)
    ));
    if selected && !editing {
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{SELECTION_COLOR}" stroke-width="1" stroke-dasharray="4 4" pointer-events="none"/>"#,
            t.x, t.y, t.width, t.height
        ));
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="10" height="10" fill="{SELECTION_COLOR}"/>"#,
            t.x + t.width - 5.0,
            t.y + t.height - 5.0
        ));
    }
    out.push_str("</g>");
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
