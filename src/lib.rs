//! Interaction engine for a genogram (family-diagram) editor.
//!
//! The crate is compiled to WebAssembly and drives an SVG drawing surface in
//! the browser. It owns the scene model, undo history, hit-testing, the
//! pointer and keyboard state machine, project files, and SVG/PNG export.
//! The host page only wires DOM events to [`wasm::Editor`], answers rename
//! prompts, and applies the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction state machine and editor operations ([`engine::EngineCore`]) |
//! | [`wasm`] | JavaScript bindings around the engine |
//! | [`scene`] | Persons, relationship lines, household boundaries, text boxes |
//! | [`history`] | Bounded linear undo/redo of scene revisions |
//! | [`selection`] | Selected element set and range selection |
//! | [`hit`] | Hit-testing, grid snapping, axis locking |
//! | [`input`] | Tools, modifiers, gesture states |
//! | [`camera`] | Points and surface-to-scene transforms |
//! | [`render`] | SVG rendering and export |
//! | [`project`] | Project file save/load |
//! | [`i18n`] | Localized prompts and messages |
//! | [`config`] | Tunables read from the environment |
//! | [`consts`] | Shared numeric constants (grid size, hit slops, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod engine;
pub mod history;
pub mod hit;
pub mod i18n;
pub mod input;
pub mod project;
pub mod render;
pub mod scene;
pub mod selection;
pub mod wasm;
