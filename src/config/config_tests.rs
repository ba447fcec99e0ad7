use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = GateConfig::default();
    assert_eq!(config.min_password_length, DEFAULT_MIN_PASSWORD_LENGTH);
    assert_eq!(config.inline_error_ms, DEFAULT_INLINE_ERROR_MS);
    assert_eq!(config.fallback_username, DEFAULT_FALLBACK_USERNAME);
    assert_eq!(config.lock_title, DEFAULT_LOCK_TITLE);
    assert_eq!(config.allow_list.len(), DEFAULT_ALLOW_LIST.len());
}

#[test]
fn test_default_allow_list_parses_completely() {
    let config = GateConfig::default();
    assert_eq!(config.allow_list().len(), DEFAULT_ALLOW_LIST.len());
}

#[test]
fn test_partial_json_fills_defaults() {
    let json = r#"{"minPasswordLength": 8}"#;
    let config: GateConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.min_password_length, 8);
    assert_eq!(config.inline_error_ms, DEFAULT_INLINE_ERROR_MS);
    assert_eq!(config.allow_list.len(), DEFAULT_ALLOW_LIST.len());
}

#[test]
fn test_config_serialization_uses_camel_case() {
    let json = serde_json::to_string(&GateConfig::default()).unwrap();
    assert!(json.contains("minPasswordLength"));
    assert!(json.contains("inlineErrorMs"));
    assert!(json.contains("allowList"));
}

#[test]
fn test_load_missing_file_returns_defaults() {
    let config = load_config(std::path::Path::new("/nonexistent/gate.json"));
    assert_eq!(config, GateConfig::default());
}

#[test]
fn test_load_invalid_json_returns_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gate.json");
    fs::write(&path, "{ minPasswordLength: ").unwrap();
    assert_eq!(load_config(&path), GateConfig::default());
}

#[test]
fn test_load_custom_allow_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gate.json");
    fs::write(
        &path,
        r##"{"allowList": ["#quit-button", "div > span"], "fallbackUsername": "Owner"}"##,
    )
    .unwrap();

    let config = load_config(&path);
    assert_eq!(config.fallback_username, "Owner");
    assert_eq!(config.allow_list.len(), 2);
    // The unsupported selector is dropped, never widened
    assert_eq!(config.allow_list().len(), 1);
}

#[test]
fn test_default_config_path_under_vaultgate_dir() {
    let path = default_config_path();
    assert!(path.ends_with(".vaultgate/gate.json"));
}
