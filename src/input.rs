//! Input model: tools, modifier keys, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying the context needed to compute incremental deltas,
//! previews, and the final scene commit on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{FONT_SIZE_MEDIUM, LINE_THICKNESS_MEDIUM};
use crate::hit::Handle;
use crate::scene::{ElementId, ElementRef, LineStyle, ShapeKind};
use crate::selection::SelectionRect;

/// Which tool is currently active.
///
/// Serialized with the names the palette uses (`"select"`, `"index_male"`,
/// `"cohabiting"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Delete whatever is tapped.
    Erase,
    /// Place a person symbol.
    Shape(ShapeKind),
    /// Draw a relationship line.
    Line(LineStyle),
    /// Drag out a household boundary.
    Cohabiting,
    /// Drag out a text box.
    Text,
    /// Tap a shape to toggle its deceased mark.
    Deceased,
    /// Tap a line to toggle the separation mark.
    Separation,
    /// Tap a line to toggle the divorce mark.
    Divorce,
    /// Tap a shape to toggle its cohabiting-with-index flag.
    Boundary,
}

/// A tool name that does not match any known tool.
#[derive(Debug, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl Tool {
    /// Palette name of this tool.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Erase => "erase",
            Self::Shape(ShapeKind::Male) => "male",
            Self::Shape(ShapeKind::Female) => "female",
            Self::Shape(ShapeKind::IndexMale) => "index_male",
            Self::Shape(ShapeKind::IndexFemale) => "index_female",
            Self::Line(LineStyle::Solid) => "solid",
            Self::Line(LineStyle::Dashed) => "dashed",
            Self::Cohabiting => "cohabiting",
            Self::Text => "text",
            Self::Deceased => "deceased",
            Self::Separation => "separation",
            Self::Divorce => "divorce",
            Self::Boundary => "boundary",
        }
    }

    /// Parse a palette name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let tool = match name {
            "select" => Self::Select,
            "erase" => Self::Erase,
            "male" => Self::Shape(ShapeKind::Male),
            "female" => Self::Shape(ShapeKind::Female),
            "index_male" => Self::Shape(ShapeKind::IndexMale),
            "index_female" => Self::Shape(ShapeKind::IndexFemale),
            "solid" => Self::Line(LineStyle::Solid),
            "dashed" => Self::Line(LineStyle::Dashed),
            "cohabiting" => Self::Cohabiting,
            "text" => Self::Text,
            "deceased" => Self::Deceased,
            "separation" => Self::Separation,
            "divorce" => Self::Divorce,
            "boundary" => Self::Boundary,
            _ => return None,
        };
        Some(tool)
    }

    /// Whether this tool toggles a flag on a tapped element.
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::Deceased | Self::Separation | Self::Divorce | Self::Boundary)
    }

    /// Whether this tool creates new elements by drawing.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Shape(_) | Self::Line(_) | Self::Cohabiting | Self::Text)
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        tool.name().to_owned()
    }
}

impl TryFrom<String> for Tool {
    type Error = UnknownTool;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Tool::from_name(&name).ok_or(UnknownTool(name))
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// What a rubber band being dragged out will become on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionPurpose {
    /// Household boundary (the `cohabiting` tool).
    Boundary,
    /// New text box.
    TextBox,
    /// Range selection with the select tool.
    RangeSelect,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Stroke width given to new lines.
    pub line_thickness: f64,
    /// Font size given to new text boxes.
    pub font_size: f64,
    /// Whether the background grid is drawn.
    pub grid_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Select,
            line_thickness: LINE_THICKNESS_MEDIUM,
            font_size: FONT_SIZE_MEDIUM,
            grid_visible: true,
        }
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to compute deltas
/// and emit the final commit on pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving every selected element with the pointer.
    DraggingSelection {
        /// Scene-space pointer position at the previous sample.
        last_world: Point,
    },
    /// Dragging a resize or endpoint handle of a selected element.
    DraggingHandle {
        /// Element that owns the handle.
        element: ElementRef,
        /// Which handle is held.
        handle: Handle,
    },
    /// Drawing a new relationship line; `end` is the live preview.
    DrawingLine {
        style: LineStyle,
        start: Point,
        end: Point,
    },
    /// Dragging out a rubber band anchored at `anchor`.
    DrawingRegion {
        purpose: RegionPurpose,
        anchor: Point,
        /// Latest pointer position; `None` until the first move.
        current: Option<Point>,
    },
    /// Two-finger pan in progress.
    Panning {
        /// Device-space midpoint of the touches at the previous sample.
        last_mid: Point,
    },
    /// A text box is open in the host's inline editor.
    EditingText {
        id: ElementId,
    },
}

impl InputState {
    /// Rubber band rectangle for an in-progress region drag.
    #[must_use]
    pub fn region(&self) -> Option<SelectionRect> {
        match self {
            Self::DrawingRegion { anchor, current: Some(current), .. } => {
                Some(SelectionRect::from_corners(*anchor, *current))
            }
            _ => None,
        }
    }

    /// Id of the text box being edited, if any.
    #[must_use]
    pub fn editing_text(&self) -> Option<ElementId> {
        match self {
            Self::EditingText { id } => Some(*id),
            _ => None,
        }
    }
}
