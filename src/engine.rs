use serde::Serialize;
use tracing::{debug, info, warn};

use crate::camera::{Camera, Point};
use crate::config::EditorConfig;
use crate::consts::{GRID_SIZE, SHAPE_SIZE};
use crate::hit::{Handle, Hit, axis_lock, locate, shape_center_at, snap_point, snap_to_grid};
use crate::history::History;
use crate::i18n::{BuiltinStrings, KEY_ENTER_AGE, KEY_ENTER_LABEL, KEY_ENTER_NAME, KEY_ENTER_TEXT, Localizer};
use crate::input::{InputState, Key, Modifiers, RegionPurpose, Tool, UiState};
use crate::project::{self, LoadError, SaveError};
use crate::render::{self, ExportError, PngRequest, View};
use crate::scene::{
    Boundary, Decoration, ElementId, ElementKind, ElementRef, Line, LineEnd, LineRestyle, MAX_ELEMENT_ID, Scene, Shape,
    ShapeKind, Text,
};
use crate::selection::{Selection, SelectionRect, range_select};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Scene, selection, or previews changed; redraw.
    RenderNeeded,
    /// CSS cursor for the surface.
    SetCursor(String),
    /// The active tool changed without the palette asking.
    ToolChanged(Tool),
    /// Ask the user for a new name and age, then call [`EngineCore::rename_shape`].
    #[serde(rename_all = "camelCase")]
    RenameShapeRequested { id: ElementId, name: String, age: String, name_prompt: String, age_prompt: String },
    /// Ask the user for a new label, then call [`EngineCore::rename_boundary`].
    RenameBoundaryRequested { id: ElementId, label: String, prompt: String },
    /// Open the inline editor over a text box.
    TextEditStarted { id: ElementId },
    /// Close the inline editor.
    TextEditEnded { id: ElementId },
}

/// Where the current press started.
#[derive(Debug, Clone, Copy)]
struct Press {
    screen: Point,
}

/// The previous completed tap, for double-tap pairing.
#[derive(Debug, Clone, Copy)]
struct Tap {
    screen: Point,
    time_ms: f64,
}

/// Core engine state: every editor rule, with no browser dependency.
///
/// The wasm [`crate::wasm::Editor`] is a thin wrapper around this type so the
/// whole interaction model can be exercised from plain unit tests.
pub struct EngineCore {
    history: History,
    selection: Selection,
    next_id: ElementId,
    pub ui: UiState,
    pub input: InputState,
    pub camera: Camera,
    ghost: Option<Shape>,
    press: Option<Press>,
    last_tap: Option<Tap>,
    config: EditorConfig,
    strings: Box<dyn Localizer>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default(), Box::new(BuiltinStrings::default()))
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig, strings: Box<dyn Localizer>) -> Self {
        let ui = UiState { line_thickness: config.line_thickness, font_size: config.font_size, ..UiState::default() };
        Self {
            history: History::new(Scene::default(), config.history_limit),
            selection: Selection::default(),
            next_id: 1,
            ui,
            input: InputState::Idle,
            camera: Camera::default(),
            ghost: None,
            press: None,
            last_tap: None,
            config,
            strings,
        }
    }

    pub fn set_localizer(&mut self, strings: Box<dyn Localizer>) {
        self.strings = strings;
    }

    // --- Queries ---

    /// The scene at the history cursor.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.history.current()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn ghost(&self) -> Option<&Shape> {
        self.ghost.as_ref()
    }

    /// Next id the session will allocate.
    #[must_use]
    pub fn next_id(&self) -> ElementId {
        self.next_id
    }

    #[must_use]
    pub fn editing_text(&self) -> Option<ElementId> {
        self.input.editing_text()
    }

    /// CSS cursor for the current tool and gesture.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match self.input {
            InputState::DraggingHandle { .. } => return "move",
            InputState::DrawingLine { .. } => return "crosshair",
            _ => {}
        }
        let tool = self.ui.tool;
        if tool.is_drawing() {
            "crosshair"
        } else if tool == Tool::Erase || tool.is_modifier() {
            "pointer"
        } else {
            "default"
        }
    }

    /// Everything the surface needs to draw the current frame.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        let preview_line = match self.input {
            InputState::DrawingLine { style, start, end } => Some(Line {
                id: 0,
                style,
                start,
                end,
                stroke_width: self.ui.line_thickness,
                decoration: None,
            }),
            _ => None,
        };
        View {
            scene: self.scene(),
            selection: &self.selection,
            ghost: self.ghost.as_ref(),
            preview_line,
            rubber_band: self.input.region(),
            editing_text: self.input.editing_text(),
            grid_visible: self.ui.grid_visible,
        }
    }

    /// The live surface as SVG markup.
    #[must_use]
    pub fn render_svg(&self) -> String {
        render::render_svg(&self.view(), self.strings.as_ref())
    }

    // --- Commit plumbing ---

    /// Record a new revision. The selection is replaced only when the commit
    /// is accepted, and is always pruned against the resulting scene.
    fn commit(&mut self, updater: impl FnOnce(&Scene) -> Scene, selection: Option<Selection>) -> bool {
        let accepted = self.history.commit(updater);
        if accepted && let Some(selection) = selection {
            self.selection = selection;
        }
        self.selection.retain_existing(self.history.current());
        accepted
    }

    /// Next free id, or `None` once the id space is used up.
    fn alloc_id(&mut self) -> Option<ElementId> {
        let id = self.next_id;
        if id > MAX_ELEMENT_ID {
            warn!(next_id = id, "element ids exhausted; creation ignored");
            return None;
        }
        self.next_id += 1;
        Some(id)
    }

    fn selected_refs(&self) -> Vec<ElementRef> {
        self.selection.iter().copied().collect()
    }

    fn revert_to_select(&mut self, actions: &mut Vec<Action>) {
        self.ui.tool = Tool::Select;
        self.ghost = None;
        actions.push(Action::ToolChanged(Tool::Select));
        actions.push(Action::SetCursor(self.cursor().to_owned()));
    }

    // --- Pointer input ---

    /// Pointer or touch press. `screen_pts` holds every active contact in device space.
    pub fn on_pointer_down(&mut self, screen_pts: &[Point], modifiers: Modifiers, _time_ms: f64) -> Vec<Action> {
        let Some(&screen) = screen_pts.first() else {
            return Vec::new();
        };
        let mut actions = Vec::new();

        if let [a, b, ..] = screen_pts {
            if let InputState::EditingText { id } = self.input {
                actions.push(Action::TextEditEnded { id });
            }
            self.input = InputState::Panning { last_mid: a.midpoint(*b) };
            self.ghost = None;
            self.press = None;
            actions.push(Action::RenderNeeded);
            return actions;
        }

        let world = self.camera.screen_to_world(screen);

        if let InputState::EditingText { id } = self.input {
            let inside = self.scene().text(id).is_some_and(|t| {
                world.x >= t.x && world.x <= t.x + t.width && world.y >= t.y && world.y <= t.y + t.height
            });
            if inside {
                return actions;
            }
            self.input = InputState::Idle;
            actions.push(Action::TextEditEnded { id });
            actions.push(Action::RenderNeeded);
            return actions;
        }

        self.press = Some(Press { screen });

        if self.ui.tool == Tool::Erase {
            if let Some(hit) = locate(world, self.scene(), &self.selection) {
                debug!(kind = ?hit.element.kind, id = hit.element.id, "element erased");
                self.commit(|s| s.remove_elements([&hit.element]), Some(Selection::default()));
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }

        let hit = locate(world, self.scene(), &self.selection);

        if let Some(Hit { element, handle: Some(handle) }) = hit {
            self.input = InputState::DraggingHandle { element, handle };
            actions.push(Action::SetCursor(self.cursor().to_owned()));
            return actions;
        }

        match self.ui.tool {
            Tool::Line(style) => {
                let start = shape_center_at(world, self.scene()).unwrap_or_else(|| snap_point(world));
                self.input = InputState::DrawingLine { style, start, end: start };
                actions.push(Action::RenderNeeded);
            }
            Tool::Shape(kind) => {
                self.place_shape(kind, snap_point(world), &mut actions);
            }
            Tool::Cohabiting => {
                self.input = InputState::DrawingRegion { purpose: RegionPurpose::Boundary, anchor: world, current: None };
            }
            Tool::Text => {
                self.input = InputState::DrawingRegion { purpose: RegionPurpose::TextBox, anchor: world, current: None };
            }
            Tool::Select => {
                if let Some(hit) = hit {
                    if modifiers.shift {
                        self.selection.toggle(hit.element);
                    } else if !self.selection.contains(&hit.element) {
                        self.selection = Selection::single(hit.element);
                    }
                    self.input = InputState::DraggingSelection { last_world: world };
                } else {
                    self.selection.clear();
                    self.input =
                        InputState::DrawingRegion { purpose: RegionPurpose::RangeSelect, anchor: world, current: None };
                }
                actions.push(Action::RenderNeeded);
            }
            Tool::Erase | Tool::Deceased | Tool::Separation | Tool::Divorce | Tool::Boundary => {}
        }
        actions
    }

    fn place_shape(&mut self, kind: ShapeKind, at: Point, actions: &mut Vec<Action>) {
        let Some(id) = self.alloc_id() else {
            return;
        };
        let shape = Shape {
            id,
            kind,
            x: at.x,
            y: at.y,
            width: SHAPE_SIZE,
            height: SHAPE_SIZE,
            text: String::new(),
            age: String::new(),
            is_deceased: false,
            is_cohabiting_with_index: false,
            font_size: None,
        };
        self.commit(|s| s.add_shape(shape), Some(Selection::single(ElementRef::shape(id))));
        debug!(id, kind = ?kind, x = at.x, y = at.y, "shape placed");
        actions.push(Action::RenderNeeded);
        self.revert_to_select(actions);
    }

    /// Pointer or touch motion.
    pub fn on_pointer_move(&mut self, screen_pts: &[Point], _modifiers: Modifiers) -> Vec<Action> {
        let Some(&screen) = screen_pts.first() else {
            return Vec::new();
        };

        if let InputState::Panning { last_mid } = self.input {
            if let [a, b, ..] = screen_pts {
                let mid = a.midpoint(*b);
                self.camera.pan_by(mid.x - last_mid.x, mid.y - last_mid.y);
                self.input = InputState::Panning { last_mid: mid };
                return vec![Action::RenderNeeded];
            }
            return Vec::new();
        }

        let world = self.camera.screen_to_world(screen);

        match self.input.clone() {
            InputState::DraggingHandle { element, handle } => {
                self.drag_handle(element, handle, world);
                vec![Action::RenderNeeded]
            }
            InputState::DrawingLine { style, start, .. } => {
                let end = self.line_target(start, world);
                self.input = InputState::DrawingLine { style, start, end };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingSelection { last_world } => {
                if self.selection.is_empty() {
                    return Vec::new();
                }
                let refs = self.selected_refs();
                let (dx, dy) = (world.x - last_world.x, world.y - last_world.y);
                self.commit(|s| s.translate(&refs, dx, dy), None);
                self.input = InputState::DraggingSelection { last_world: world };
                vec![Action::RenderNeeded]
            }
            InputState::DrawingRegion { purpose, anchor, .. } => {
                self.input = InputState::DrawingRegion { purpose, anchor, current: Some(world) };
                vec![Action::RenderNeeded]
            }
            InputState::Idle => self.update_ghost(world),
            InputState::Panning { .. } | InputState::EditingText { .. } => Vec::new(),
        }
    }

    fn drag_handle(&mut self, element: ElementRef, handle: Handle, world: Point) {
        let snapped = snap_point(world);
        let id = element.id;
        match handle {
            Handle::LineEndpoint(end) => {
                let Some(line) = self.scene().line(id) else {
                    return;
                };
                let fixed = match end {
                    LineEnd::Start => line.end,
                    LineEnd::End => line.start,
                };
                let point = axis_lock(fixed, snapped);
                self.commit(|s| s.move_line_endpoint(id, end, point), None);
            }
            Handle::TextResize => {
                let Some(text) = self.scene().text(id) else {
                    return;
                };
                let width = snap_to_grid(world.x - text.x);
                let height = snap_to_grid(world.y - text.y);
                self.commit(|s| s.resize_text(id, width, height), None);
            }
            Handle::Boundary(h) => {
                self.commit(|s| s.resize_boundary(id, h, snapped.x, snapped.y), None);
            }
        }
    }

    /// Line end for a pointer at `world`: a shape center under it, else the
    /// snapped point, axis-locked to `start`.
    fn line_target(&self, start: Point, world: Point) -> Point {
        let target = shape_center_at(world, self.scene()).unwrap_or_else(|| snap_point(world));
        axis_lock(start, target)
    }

    fn update_ghost(&mut self, world: Point) -> Vec<Action> {
        let Tool::Shape(kind) = self.ui.tool else {
            return if self.ghost.take().is_some() { vec![Action::RenderNeeded] } else { Vec::new() };
        };
        let at = snap_point(world);
        if self.ghost.as_ref().is_some_and(|g| g.kind == kind && g.x == at.x && g.y == at.y) {
            return Vec::new();
        }
        self.ghost = Some(Shape {
            id: 0,
            kind,
            x: at.x,
            y: at.y,
            width: SHAPE_SIZE,
            height: SHAPE_SIZE,
            text: String::new(),
            age: String::new(),
            is_deceased: false,
            is_cohabiting_with_index: false,
            font_size: None,
        });
        vec![Action::RenderNeeded]
    }

    /// Pointer or touch release at `screen_pt`.
    pub fn on_pointer_up(&mut self, screen_pt: Point, _modifiers: Modifiers, time_ms: f64) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        let world = self.camera.screen_to_world(screen_pt);

        match state {
            InputState::Panning { .. } => {
                self.press = None;
                return vec![Action::RenderNeeded];
            }
            InputState::EditingText { id } => {
                self.input = state;
                return self.end_editing_unless_inside(id, world);
            }
            _ => {}
        }

        let mut actions = Vec::new();
        let press = self.press.take();
        let is_tap = press.is_some_and(|p| p.screen.distance(screen_pt) < self.config.tap_threshold_px);
        if !is_tap {
            self.last_tap = None;
        } else if self.register_tap(screen_pt, time_ms) {
            self.on_double_tap(world, &mut actions);
        } else {
            self.on_tap(world, &mut actions);
        }
        self.finish_gesture(state, world, &mut actions);
        actions
    }

    fn end_editing_unless_inside(&mut self, id: ElementId, world: Point) -> Vec<Action> {
        let hit = locate(world, self.scene(), &self.selection);
        if hit.is_some_and(|h| h.element == ElementRef::text(id)) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::TextEditEnded { id }, Action::RenderNeeded]
    }

    /// Record a completed tap; `true` when it pairs with the previous one.
    fn register_tap(&mut self, screen: Point, time_ms: f64) -> bool {
        let is_double = self.last_tap.is_some_and(|prev| {
            time_ms - prev.time_ms < self.config.double_tap_ms
                && prev.screen.distance(screen) < self.config.double_tap_distance
        });
        self.last_tap = if is_double { None } else { Some(Tap { screen, time_ms }) };
        is_double
    }

    fn on_double_tap(&mut self, world: Point, actions: &mut Vec<Action>) {
        let Some(hit) = locate(world, self.scene(), &Selection::default()) else {
            return;
        };
        let id = hit.element.id;
        match hit.element.kind {
            ElementKind::Shape => {
                if let Some(shape) = self.scene().shape(id) {
                    actions.push(Action::RenameShapeRequested {
                        id,
                        name: shape.text.clone(),
                        age: shape.age.clone(),
                        name_prompt: self.strings.t(KEY_ENTER_NAME, &[("current", shape.text.as_str())]),
                        age_prompt: self.strings.t(KEY_ENTER_AGE, &[("current", shape.age.as_str())]),
                    });
                }
            }
            ElementKind::Boundary => {
                if let Some(boundary) = self.scene().boundary(id) {
                    actions.push(Action::RenameBoundaryRequested {
                        id,
                        label: boundary.label.clone(),
                        prompt: self.strings.t(KEY_ENTER_LABEL, &[("current", boundary.label.as_str())]),
                    });
                }
            }
            ElementKind::Text => {
                self.input = InputState::EditingText { id };
                actions.push(Action::TextEditStarted { id });
                actions.push(Action::RenderNeeded);
            }
            ElementKind::Line => {}
        }
    }

    /// Single tap with a modifier tool toggles the matching field and reverts to select.
    fn on_tap(&mut self, world: Point, actions: &mut Vec<Action>) {
        if !self.ui.tool.is_modifier() {
            return;
        }
        let Some(hit) = locate(world, self.scene(), &Selection::default()) else {
            return;
        };
        let id = hit.element.id;
        let handled = match (self.ui.tool, hit.element.kind) {
            (Tool::Deceased, ElementKind::Shape) => {
                self.commit(|s| s.toggle_deceased(id), None);
                true
            }
            (Tool::Separation, ElementKind::Line) => {
                self.commit(|s| s.toggle_decoration(id, Decoration::Separation), None);
                true
            }
            (Tool::Divorce, ElementKind::Line) => {
                self.commit(|s| s.toggle_decoration(id, Decoration::Divorce), None);
                true
            }
            (Tool::Boundary, ElementKind::Shape) => {
                self.commit(|s| s.toggle_cohabiting(id), None);
                true
            }
            _ => false,
        };
        if handled {
            debug!(id, tool = self.ui.tool.name(), "modifier toggled");
            actions.push(Action::RenderNeeded);
            self.revert_to_select(actions);
        }
    }

    fn finish_gesture(&mut self, state: InputState, world: Point, actions: &mut Vec<Action>) {
        match state {
            InputState::DrawingLine { style, start, .. } => {
                let end = self.line_target(start, world);
                if end != start
                    && let Some(id) = self.alloc_id()
                {
                    let line = Line { id, style, start, end, stroke_width: self.ui.line_thickness, decoration: None };
                    self.commit(|s| s.add_line(line), None);
                    debug!(id, ?style, "line drawn");
                }
                actions.push(Action::RenderNeeded);
            }
            InputState::DrawingRegion { purpose: RegionPurpose::RangeSelect, anchor, current } => {
                if let Some(current) = current {
                    let rect = SelectionRect::from_corners(anchor, current);
                    self.selection = range_select(self.scene(), &rect);
                }
                actions.push(Action::RenderNeeded);
            }
            InputState::DrawingRegion { purpose: RegionPurpose::Boundary, anchor, current } => {
                if let Some(current) = current {
                    self.finish_boundary(SelectionRect::from_corners(anchor, current), actions);
                }
                actions.push(Action::RenderNeeded);
            }
            InputState::DrawingRegion { purpose: RegionPurpose::TextBox, anchor, current } => {
                let rect = SelectionRect::from_corners(anchor, current.unwrap_or(anchor));
                self.finish_text_box(rect, actions);
            }
            InputState::DraggingHandle { .. } => {
                actions.push(Action::SetCursor(self.cursor().to_owned()));
            }
            InputState::Idle
            | InputState::DraggingSelection { .. }
            | InputState::Panning { .. }
            | InputState::EditingText { .. } => {}
        }
    }

    fn finish_boundary(&mut self, rect: SelectionRect, actions: &mut Vec<Action>) {
        let width = snap_to_grid(rect.width);
        let height = snap_to_grid(rect.height);
        if width <= GRID_SIZE || height <= GRID_SIZE {
            return;
        }
        let Some(id) = self.alloc_id() else {
            return;
        };
        let boundary = Boundary {
            id,
            x: snap_to_grid(rect.x),
            y: snap_to_grid(rect.y),
            width,
            height,
            label: String::new(),
            style: None,
            stroke_width: None,
        };
        self.commit(|s| s.add_boundary(boundary), None);
        debug!(id, width, height, "boundary drawn");
        self.revert_to_select(actions);
    }

    fn finish_text_box(&mut self, rect: SelectionRect, actions: &mut Vec<Action>) {
        let Some(id) = self.alloc_id() else {
            actions.push(Action::RenderNeeded);
            return;
        };
        let width = snap_to_grid(rect.width);
        let height = snap_to_grid(rect.height);
        let text = Text {
            id,
            x: snap_to_grid(rect.x),
            y: snap_to_grid(rect.y),
            width: if width == 0.0 { GRID_SIZE * 4.0 } else { width },
            height: if height == 0.0 { GRID_SIZE * 2.0 } else { height },
            content: self.strings.t(KEY_ENTER_TEXT, &[]),
            font_size: self.ui.font_size,
        };
        self.commit(|s| s.add_text(text), Some(Selection::single(ElementRef::text(id))));
        debug!(id, "text box created");
        self.input = InputState::EditingText { id };
        actions.push(Action::RenderNeeded);
        actions.push(Action::TextEditStarted { id });
        self.revert_to_select(actions);
    }

    /// Pointer left the surface: drop any in-progress gesture but keep text editing open.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::EditingText { .. }) {
            self.input = InputState::Idle;
        }
        self.ghost = None;
        self.press = None;
        vec![Action::RenderNeeded, Action::SetCursor(self.cursor().to_owned())]
    }

    // --- Keyboard ---

    /// Key press. Ignored while a text field has focus or a text box is open.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, text_input_focused: bool) -> Vec<Action> {
        if text_input_focused || self.editing_text().is_some() {
            return Vec::new();
        }
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "z" if modifiers.command() => self.undo(),
            "y" if modifiers.command() => self.redo(),
            _ => Vec::new(),
        }
    }

    // --- Palette / menu operations ---

    /// Switch tools. Picking a line style while lines or boundaries are
    /// selected restyles them instead.
    pub fn select_tool(&mut self, tool: Tool) -> Vec<Action> {
        if let Tool::Line(style) = tool
            && (self.selection.has_kind(ElementKind::Line) || self.selection.has_kind(ElementKind::Boundary))
        {
            let refs = self.selected_refs();
            let keep = self.selection.clone();
            self.commit(|s| s.restyle_lines(&refs, LineRestyle::Style(style)), Some(keep));
            return vec![Action::RenderNeeded];
        }
        self.ui.tool = tool;
        if tool != Tool::Select {
            self.selection.clear();
        }
        if !matches!(tool, Tool::Shape(_)) {
            self.ghost = None;
        }
        vec![Action::RenderNeeded, Action::SetCursor(self.cursor().to_owned())]
    }

    /// Set the stroke width for new lines and apply it to selected lines and boundaries.
    pub fn set_line_thickness(&mut self, width: f64) -> Vec<Action> {
        self.ui.line_thickness = width;
        if self.selection.is_empty() {
            return Vec::new();
        }
        let refs = self.selected_refs();
        let keep = self.selection.clone();
        self.commit(|s| s.restyle_lines(&refs, LineRestyle::StrokeWidth(width)), Some(keep));
        vec![Action::RenderNeeded]
    }

    /// Set the font size for new text and apply it to selected shapes and text boxes.
    pub fn set_font_size(&mut self, size: f64) -> Vec<Action> {
        self.ui.font_size = size;
        if self.selection.is_empty() {
            return Vec::new();
        }
        let refs = self.selected_refs();
        let keep = self.selection.clone();
        self.commit(|s| s.set_font_size(&refs, size), Some(keep));
        vec![Action::RenderNeeded]
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let refs = self.selected_refs();
        self.commit(|s| s.remove_elements(&refs), Some(Selection::default()));
        debug!(count = refs.len(), "selection deleted");
        vec![Action::RenderNeeded]
    }

    pub fn undo(&mut self) -> Vec<Action> {
        if !self.history.undo() {
            return Vec::new();
        }
        self.after_history_move()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        if !self.history.redo() {
            return Vec::new();
        }
        self.after_history_move()
    }

    fn after_history_move(&mut self) -> Vec<Action> {
        self.selection.clear();
        let mut actions = vec![Action::RenderNeeded];
        if let Some(id) = self.editing_text()
            && self.scene().text(id).is_none()
        {
            self.input = InputState::Idle;
            actions.push(Action::TextEditEnded { id });
        }
        actions
    }

    /// Answer to [`Action::RenameShapeRequested`].
    pub fn rename_shape(&mut self, id: ElementId, name: &str, age: &str) -> Vec<Action> {
        if self.commit(|s| s.relabel_shape(id, name, age), None) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Answer to [`Action::RenameBoundaryRequested`].
    pub fn rename_boundary(&mut self, id: ElementId, label: &str) -> Vec<Action> {
        if self.commit(|s| s.relabel_boundary(id, label), None) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Content typed into the inline editor.
    pub fn set_text_content(&mut self, id: ElementId, content: &str) -> Vec<Action> {
        if self.commit(|s| s.set_text_content(id, content), None) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Close the inline editor, if open.
    pub fn finish_text_editing(&mut self) -> Vec<Action> {
        match self.input {
            InputState::EditingText { id } => {
                self.input = InputState::Idle;
                vec![Action::TextEditEnded { id }, Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    pub fn set_grid_visible(&mut self, visible: bool) -> Vec<Action> {
        self.ui.grid_visible = visible;
        vec![Action::RenderNeeded]
    }

    // --- Project files and export ---

    /// Replace the session with a loaded project. On error nothing changes.
    pub fn load_project(&mut self, json: &str) -> Result<Vec<Action>, LoadError> {
        let loaded = project::load(json)?;
        let mut actions = vec![Action::RenderNeeded];
        if let Some(id) = self.editing_text() {
            actions.push(Action::TextEditEnded { id });
        }
        self.history.reset(loaded.scene);
        self.next_id = loaded.next_id;
        self.selection.clear();
        self.input = InputState::Idle;
        self.ghost = None;
        self.press = None;
        info!(next_id = self.next_id, "session replaced from project");
        Ok(actions)
    }

    pub fn save_project(&self, created: &str) -> Result<String, SaveError> {
        project::save(self.scene(), created)
    }

    pub fn export_svg(&self, padding: f64, background: bool) -> Result<String, ExportError> {
        render::export_svg(self.scene(), padding, background, self.strings.as_ref())
    }

    pub fn prepare_png(&self, padding: f64, background: bool) -> Result<PngRequest, ExportError> {
        render::prepare_png(self.scene(), padding, background, self.strings.as_ref())
    }

    pub fn finish_png_export(&self, result: Result<Vec<u8>, String>) -> Result<Vec<u8>, ExportError> {
        render::finish_png_export(result, self.strings.as_ref())
    }

    /// Localized string for `key`, e.g. the load error alert.
    #[must_use]
    pub fn message(&self, key: &str) -> String {
        self.strings.t(key, &[])
    }
}
