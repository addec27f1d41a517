//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::cmp::Ordering;
use std::env::VarError;
use std::str::FromStr;

use crate::consts::{FONT_SIZE_MEDIUM, LINE_THICKNESS_MEDIUM};
use crate::history::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_TAP_THRESHOLD_PX: f64 = 5.0;
pub const DEFAULT_DOUBLE_TAP_MS: f64 = 400.0;
pub const DEFAULT_DOUBLE_TAP_DISTANCE: f64 = 10.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
    #[error("{var} must be positive")]
    NonPositive { var: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: String },
    #[error("config overrides must be a json object: {0}")]
    Overrides(#[from] serde_json::Error),
}

/// Tunable interaction settings for one editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Pointer travel (device px) below which a press counts as a tap.
    pub tap_threshold_px: f64,
    /// Maximum gap between two taps forming a double-tap.
    pub double_tap_ms: f64,
    /// Maximum distance between two taps forming a double-tap.
    pub double_tap_distance: f64,
    /// Retained undo revisions.
    pub history_limit: usize,
    /// Stroke width for new lines until the palette changes it.
    pub line_thickness: f64,
    /// Font size for new text boxes until the palette changes it.
    pub font_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tap_threshold_px: DEFAULT_TAP_THRESHOLD_PX,
            double_tap_ms: DEFAULT_DOUBLE_TAP_MS,
            double_tap_distance: DEFAULT_DOUBLE_TAP_DISTANCE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            line_thickness: LINE_THICKNESS_MEDIUM,
            font_size: FONT_SIZE_MEDIUM,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `GENOGRAM_TAP_THRESHOLD_PX`: default 5
    /// - `GENOGRAM_DOUBLE_TAP_MS`: default 400
    /// - `GENOGRAM_DOUBLE_TAP_DISTANCE`: default 10
    /// - `GENOGRAM_HISTORY_LIMIT`: default 50
    /// - `GENOGRAM_LINE_THICKNESS`: default 2.5
    /// - `GENOGRAM_FONT_SIZE`: default 16
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var: key.to_owned() }),
        })
    }

    /// Build config from a JSON object keyed by the same names as the
    /// environment variables, e.g. `{"GENOGRAM_DOUBLE_TAP_MS": 300}`.
    /// Browser hosts use this; `wasm32-unknown-unknown` has no environment.
    pub fn from_overrides(json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        Self::from_lookup(|key| {
            Ok(overrides.get(key).map(|value| match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }))
        })
    }

    /// Build config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        let defaults = Self::default();
        Ok(Self {
            tap_threshold_px: parse_positive(&lookup, "GENOGRAM_TAP_THRESHOLD_PX", defaults.tap_threshold_px)?,
            double_tap_ms: parse_positive(&lookup, "GENOGRAM_DOUBLE_TAP_MS", defaults.double_tap_ms)?,
            double_tap_distance: parse_positive(&lookup, "GENOGRAM_DOUBLE_TAP_DISTANCE", defaults.double_tap_distance)?,
            history_limit: parse_positive(&lookup, "GENOGRAM_HISTORY_LIMIT", defaults.history_limit)?,
            line_thickness: parse_positive(&lookup, "GENOGRAM_LINE_THICKNESS", defaults.line_thickness)?,
            font_size: parse_positive(&lookup, "GENOGRAM_FONT_SIZE", defaults.font_size)?,
        })
    }
}

fn parse_positive<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    F: Fn(&str) -> Result<Option<String>, ConfigError>,
{
    let Some(raw) = lookup(key)? else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { var: key.to_owned(), value: raw.clone() })?;
    // NaN compares as unordered and is rejected here.
    if value.partial_cmp(&T::default()) != Some(Ordering::Greater) {
        return Err(ConfigError::NonPositive { var: key.to_owned() });
    }
    Ok(value)
}
