//! Project file save and load.
//!
//! Saved files wrap the scene in an envelope:
//! `{"version": "1.0", "created": "<ISO-8601>", "data": {...scene...}}`.
//! The loader also accepts a bare scene object, and treats any missing or
//! `null` element collection as empty so files from older builds still open.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::consts::PROJECT_VERSION;
use crate::scene::{ElementId, MAX_ELEMENT_ID, Scene};

const COLLECTIONS: [&str; 4] = ["shapes", "lines", "boundaries", "texts"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed project json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project root is not an object")]
    NotAnObject,
    #[error("element id {id} exceeds the largest supported id")]
    IdSpaceExhausted { id: ElementId },
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to encode project: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk project envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: String,
    pub created: String,
    pub data: Scene,
}

/// A successfully loaded project.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    pub scene: Scene,
    /// First id the session should allocate: one past the largest id in the scene.
    /// May sit one past [`MAX_ELEMENT_ID`], in which case no further ids are handed out.
    pub next_id: ElementId,
}

/// Encode `scene` as a pretty-printed project file stamped with `created`.
pub fn save(scene: &Scene, created: &str) -> Result<String, SaveError> {
    let file = ProjectFile { version: PROJECT_VERSION.to_owned(), created: created.to_owned(), data: scene.clone() };
    let json = serde_json::to_string_pretty(&file)?;
    info!(elements = scene.len(), bytes = json.len(), "project saved");
    Ok(json)
}

/// Decode a project file or a bare scene.
pub fn load(json: &str) -> Result<LoadedProject, LoadError> {
    let result = parse(json);
    match &result {
        Ok(project) => info!(elements = project.scene.len(), next_id = project.next_id, "project loaded"),
        Err(e) => warn!(error = %e, "project load rejected"),
    }
    result
}

fn parse(json: &str) -> Result<LoadedProject, LoadError> {
    let root: Value = serde_json::from_str(json)?;
    let mut body = match root {
        Value::Object(mut map) if is_truthy(map.get("data")) && is_truthy(map.get("version")) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    let Value::Object(fields) = &mut body else {
        return Err(LoadError::NotAnObject);
    };
    for key in COLLECTIONS {
        if fields.get(key).is_none_or(Value::is_null) {
            fields.insert(key.to_owned(), Value::Array(Vec::new()));
        }
    }
    let scene: Scene = serde_json::from_value(body)?;
    let next_id = match scene.max_id() {
        None => 1,
        Some(id) if id <= MAX_ELEMENT_ID => id + 1,
        Some(id) => return Err(LoadError::IdSpaceExhausted { id }),
    };
    Ok(LoadedProject { scene, next_id })
}

/// Loose truthiness used to recognize the envelope: present, non-null,
/// and not `false`, `0`, or an empty string.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
