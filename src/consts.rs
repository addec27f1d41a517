//! Shared numeric constants for the genogram engine.

// ── Grid ────────────────────────────────────────────────────────

/// Grid unit in scene coordinates. Snapping uses half of this.
pub const GRID_SIZE: f64 = 20.0;

/// Default width and height of a newly placed person shape.
pub const SHAPE_SIZE: f64 = 60.0;

/// Fixed size of the live drawing surface.
pub const CANVAS_WIDTH: f64 = 4000.0;
pub const CANVAS_HEIGHT: f64 = 3000.0;

/// DOM id of the root `<svg>` element.
pub const SVG_CANVAS_ID: &str = "genogram-canvas";

// ── Hit-testing ─────────────────────────────────────────────────

/// Radius of the circular hotspot around line endpoints and boundary handles.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Half the side of the square text resize handle.
pub const TEXT_HANDLE_HALF: f64 = 5.0;

/// Extra slop added to a line's stroke width when hit-testing it.
pub const LINE_HIT_SLOP: f64 = 5.0;

/// Width of the clickable border band inside a boundary rectangle.
pub const BOUNDARY_BORDER_BAND: f64 = 15.0;

/// Vertical space taken by a shape's name label.
pub const SHAPE_LABEL_HEIGHT: f64 = 18.0;

/// Vertical space taken by the cohabiting caption when hit-testing.
pub const SHAPE_COHABITING_HIT_HEIGHT: f64 = 14.0;

// ── Export ──────────────────────────────────────────────────────

/// Vertical space taken by the cohabiting caption when measuring content bounds.
pub const SHAPE_COHABITING_EXPORT_HEIGHT: f64 = 16.0;

/// Space below a boundary reserved for its label.
pub const BOUNDARY_LABEL_HEIGHT: f64 = 20.0;

/// Raster scale factor for PNG export.
pub const PNG_EXPORT_SCALE: f64 = 2.0;

/// Project file format version written on save.
pub const PROJECT_VERSION: &str = "1.0";

// ── Styles ──────────────────────────────────────────────────────

/// Preset stroke widths offered by the palette.
pub const LINE_THICKNESS_THIN: f64 = 1.5;
pub const LINE_THICKNESS_MEDIUM: f64 = 2.5;
pub const LINE_THICKNESS_LARGE: f64 = 4.0;

/// Preset font sizes offered by the palette.
pub const FONT_SIZE_SMALL: f64 = 12.0;
pub const FONT_SIZE_MEDIUM: f64 = 16.0;
pub const FONT_SIZE_LARGE: f64 = 20.0;

pub const LINE_THICKNESS_PRESETS: [f64; 3] = [LINE_THICKNESS_THIN, LINE_THICKNESS_MEDIUM, LINE_THICKNESS_LARGE];
pub const FONT_SIZE_PRESETS: [f64; 3] = [FONT_SIZE_SMALL, FONT_SIZE_MEDIUM, FONT_SIZE_LARGE];
