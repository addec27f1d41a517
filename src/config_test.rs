#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<Option<String>, ConfigError> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| Ok(map.get(key).cloned())
}

#[test]
fn defaults_match_editor_constants() {
    let cfg = EditorConfig::default();
    assert_eq!(cfg.tap_threshold_px, 5.0);
    assert_eq!(cfg.double_tap_ms, 400.0);
    assert_eq!(cfg.double_tap_distance, 10.0);
    assert_eq!(cfg.history_limit, 50);
    assert_eq!(cfg.line_thickness, 2.5);
    assert_eq!(cfg.font_size, 16.0);
}

#[test]
fn empty_lookup_gives_defaults() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, EditorConfig::default());
}

#[test]
fn overrides_are_parsed() {
    let cfg = EditorConfig::from_lookup(lookup_from(&[
        ("GENOGRAM_TAP_THRESHOLD_PX", "8"),
        ("GENOGRAM_DOUBLE_TAP_MS", " 300 "),
        ("GENOGRAM_DOUBLE_TAP_DISTANCE", "12.5"),
        ("GENOGRAM_HISTORY_LIMIT", "100"),
        ("GENOGRAM_LINE_THICKNESS", "4"),
        ("GENOGRAM_FONT_SIZE", "20"),
    ]))
    .unwrap();
    assert_eq!(cfg.tap_threshold_px, 8.0);
    assert_eq!(cfg.double_tap_ms, 300.0);
    assert_eq!(cfg.double_tap_distance, 12.5);
    assert_eq!(cfg.history_limit, 100);
    assert_eq!(cfg.line_thickness, 4.0);
    assert_eq!(cfg.font_size, 20.0);
}

#[test]
fn unparsable_value_is_rejected() {
    let err = EditorConfig::from_lookup(lookup_from(&[("GENOGRAM_HISTORY_LIMIT", "lots")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "GENOGRAM_HISTORY_LIMIT"));
    assert_eq!(err.to_string(), "invalid value for GENOGRAM_HISTORY_LIMIT: \"lots\"");
}

#[test]
fn zero_is_rejected() {
    let err = EditorConfig::from_lookup(lookup_from(&[("GENOGRAM_HISTORY_LIMIT", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositive { .. }));
}

#[test]
fn negative_and_nan_are_rejected() {
    let err = EditorConfig::from_lookup(lookup_from(&[("GENOGRAM_FONT_SIZE", "-3")])).unwrap_err();
    assert_eq!(err.to_string(), "GENOGRAM_FONT_SIZE must be positive");
    let err = EditorConfig::from_lookup(lookup_from(&[("GENOGRAM_LINE_THICKNESS", "NaN")])).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositive { .. }));
}

#[test]
fn lookup_errors_propagate() {
    let err = EditorConfig::from_lookup(|key| Err(ConfigError::NotUnicode { var: key.to_owned() })).unwrap_err();
    assert!(matches!(err, ConfigError::NotUnicode { .. }));
}

#[test]
fn json_overrides_accept_numbers_and_strings() {
    let config = EditorConfig::from_overrides(r#"{"GENOGRAM_DOUBLE_TAP_MS": 300, "GENOGRAM_FONT_SIZE": "20"}"#).unwrap();
    assert_eq!(config.double_tap_ms, 300.0);
    assert_eq!(config.font_size, 20.0);
    assert_eq!(config.tap_threshold_px, DEFAULT_TAP_THRESHOLD_PX);
}

#[test]
fn json_overrides_must_be_an_object() {
    assert!(matches!(EditorConfig::from_overrides("[1]"), Err(ConfigError::Overrides(_))));
    assert!(matches!(
        EditorConfig::from_overrides(r#"{"GENOGRAM_HISTORY_LIMIT": 0}"#),
        Err(ConfigError::NonPositive { .. })
    ));
}
