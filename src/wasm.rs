//! Browser bridge.
//!
//! [`Editor`] wraps [`EngineCore`] for JavaScript. Pointer coordinates arrive
//! as a flat `[x0, y0, x1, y1, ...]` array in surface pixels, modifier keys
//! as a bitmask, and every handler returns the resulting actions as a JSON
//! array for the host to apply.

#[cfg(test)]
#[path = "wasm_test.rs"]
mod wasm_test;

use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::camera::Point;
use crate::config::EditorConfig;
use crate::consts::{FONT_SIZE_PRESETS, LINE_THICKNESS_PRESETS};
use crate::engine::{Action, EngineCore};
use crate::i18n::{BuiltinStrings, KEY_LOAD_ERROR, KEY_SAVE_ERROR, Language};
use crate::input::{Key, Modifiers, Tool};
use crate::scene::{ElementId, element_id_from_f64};

/// Bit for Shift in the modifier mask.
pub const MOD_SHIFT: u32 = 1;
/// Bit for Ctrl in the modifier mask.
pub const MOD_CTRL: u32 = 2;
/// Bit for Alt / Option in the modifier mask.
pub const MOD_ALT: u32 = 4;
/// Bit for Meta / Command in the modifier mask.
pub const MOD_META: u32 = 8;

fn modifiers_from_mask(mask: u32) -> Modifiers {
    Modifiers {
        shift: mask & MOD_SHIFT != 0,
        ctrl: mask & MOD_CTRL != 0,
        alt: mask & MOD_ALT != 0,
        meta: mask & MOD_META != 0,
    }
}

fn points_from_flat(coords: &[f64]) -> Vec<Point> {
    coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn actions_json(actions: &[Action]) -> Result<String, JsValue> {
    to_json(actions)
}

/// Ids cross the bridge as plain JS numbers, matching the JSON payloads.
fn id_from_js(id: f64) -> Result<ElementId, JsValue> {
    element_id_from_f64(id).ok_or_else(|| JsValue::from_str(&format!("invalid element id: {id}")))
}

/// Stroke widths for the palette, thinnest first.
#[wasm_bindgen]
#[must_use]
pub fn line_thickness_presets() -> Vec<f64> {
    LINE_THICKNESS_PRESETS.to_vec()
}

/// Font sizes for the palette, smallest first.
#[wasm_bindgen]
#[must_use]
pub fn font_size_presets() -> Vec<f64> {
    FONT_SIZE_PRESETS.to_vec()
}

/// JavaScript-facing editor.
#[wasm_bindgen]
pub struct Editor {
    core: EngineCore,
}

impl Editor {
    fn build(language: &str, config: EditorConfig) -> Self {
        let strings = BuiltinStrings::new(Language::from_tag(language).unwrap_or_default());
        Self { core: EngineCore::with_config(config, Box::new(strings)) }
    }
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor whose prompts use `language` (`"en"` or `"ja"`).
    ///
    /// `GENOGRAM_*` environment overrides only reach native hosts; in the
    /// browser this is the default config. Use [`Editor::with_overrides`] there.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(language: &str) -> Self {
        let config = EditorConfig::from_env().unwrap_or_else(|e| {
            warn!(error = %e, "editor config rejected; using defaults");
            EditorConfig::default()
        });
        Self::build(language, config)
    }

    /// Create an editor tuned by a JSON object of `GENOGRAM_*` keys.
    pub fn with_overrides(language: &str, overrides: &str) -> Result<Editor, JsValue> {
        let config = EditorConfig::from_overrides(overrides).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::build(language, config))
    }


    pub fn set_language(&mut self, language: &str) {
        let strings = BuiltinStrings::new(Language::from_tag(language).unwrap_or_default());
        self.core.set_localizer(Box::new(strings));
    }

    // --- Input ---

    pub fn pointer_down(&mut self, coords: Vec<f64>, modifiers: u32) -> Result<String, JsValue> {
        let points = points_from_flat(&coords);
        actions_json(&self.core.on_pointer_down(&points, modifiers_from_mask(modifiers), js_sys::Date::now()))
    }

    pub fn pointer_move(&mut self, coords: Vec<f64>, modifiers: u32) -> Result<String, JsValue> {
        let points = points_from_flat(&coords);
        actions_json(&self.core.on_pointer_move(&points, modifiers_from_mask(modifiers)))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, modifiers: u32) -> Result<String, JsValue> {
        let actions = self.core.on_pointer_up(Point::new(x, y), modifiers_from_mask(modifiers), js_sys::Date::now());
        actions_json(&actions)
    }

    pub fn pointer_leave(&mut self) -> Result<String, JsValue> {
        actions_json(&self.core.on_pointer_leave())
    }

    pub fn key_down(&mut self, key: &str, modifiers: u32, text_input_focused: bool) -> Result<String, JsValue> {
        let actions = self.core.on_key_down(&Key(key.to_owned()), modifiers_from_mask(modifiers), text_input_focused);
        actions_json(&actions)
    }

    // --- Palette ---

    /// Switch to the tool named `name`, e.g. `"male"` or `"dashed"`.
    pub fn select_tool(&mut self, name: &str) -> Result<String, JsValue> {
        let tool = Tool::try_from(name.to_owned()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        actions_json(&self.core.select_tool(tool))
    }

    pub fn set_line_thickness(&mut self, width: f64) -> Result<String, JsValue> {
        actions_json(&self.core.set_line_thickness(width))
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<String, JsValue> {
        actions_json(&self.core.set_font_size(size))
    }

    pub fn set_grid_visible(&mut self, visible: bool) -> Result<String, JsValue> {
        actions_json(&self.core.set_grid_visible(visible))
    }

    pub fn delete_selected(&mut self) -> Result<String, JsValue> {
        actions_json(&self.core.delete_selected())
    }

    pub fn undo(&mut self) -> Result<String, JsValue> {
        actions_json(&self.core.undo())
    }

    pub fn redo(&mut self) -> Result<String, JsValue> {
        actions_json(&self.core.redo())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.core.can_redo()
    }

    // --- Prompt answers ---

    pub fn rename_shape(&mut self, id: f64, name: &str, age: &str) -> Result<String, JsValue> {
        actions_json(&self.core.rename_shape(id_from_js(id)?, name, age))
    }

    pub fn rename_boundary(&mut self, id: f64, label: &str) -> Result<String, JsValue> {
        actions_json(&self.core.rename_boundary(id_from_js(id)?, label))
    }

    pub fn set_text_content(&mut self, id: f64, content: &str) -> Result<String, JsValue> {
        actions_json(&self.core.set_text_content(id_from_js(id)?, content))
    }

    pub fn finish_text_editing(&mut self) -> Result<String, JsValue> {
        actions_json(&self.core.finish_text_editing())
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> String {
        self.core.tool().name().to_owned()
    }

    #[must_use]
    pub fn cursor(&self) -> String {
        self.core.cursor().to_owned()
    }

    /// Live surface markup.
    #[must_use]
    pub fn render_svg(&self) -> String {
        self.core.render_svg()
    }

    /// Scene, selection, and previews as JSON, for hosts that draw themselves.
    pub fn view_json(&self) -> Result<String, JsValue> {
        to_json(&self.core.view())
    }

    // --- Files ---

    /// Replace the session with `json`. Errors carry the localized alert text.
    pub fn load_project(&mut self, json: &str) -> Result<String, JsValue> {
        match self.core.load_project(json) {
            Ok(actions) => actions_json(&actions),
            Err(_) => Err(JsValue::from_str(&self.core.message(KEY_LOAD_ERROR))),
        }
    }

    /// Project file contents stamped with the current time.
    pub fn save_project(&self) -> Result<String, JsValue> {
        let created: String = js_sys::Date::new_0().to_iso_string().into();
        self.core.save_project(&created).map_err(|_| JsValue::from_str(&self.core.message(KEY_SAVE_ERROR)))
    }

    pub fn export_svg(&self, padding: f64, background: bool) -> Result<String, JsValue> {
        self.core.export_svg(padding, background).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// SVG plus target pixel size for the host to rasterize.
    pub fn prepare_png(&self, padding: f64, background: bool) -> Result<String, JsValue> {
        let request = self.core.prepare_png(padding, background).map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_json(&request)
    }

    /// Report the host's rasterization outcome: `bytes` on success, else `cause`.
    pub fn finish_png_export(&self, bytes: Option<Vec<u8>>, cause: Option<String>) -> Result<Vec<u8>, JsValue> {
        let outcome = bytes.ok_or_else(|| cause.unwrap_or_default());
        self.core.finish_png_export(outcome).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
