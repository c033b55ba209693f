//! Configuration tests
//!
//! The round-trip test guards the generated template: every field written by
//! `to_toml()` must parse back through `FileConfig`. When you add a config
//! field, this fails until the template and the merge are both updated.

use super::*;

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

#[test]
fn test_partial_file_merges_over_defaults() {
    let file: FileConfig = toml::from_str(
        r#"
        theme = "radar"

        [provider]
        enabled = false
        "#,
    )
    .unwrap();

    let mut config = Config::default();
    config.apply_file(file);

    assert_eq!(config.theme, "radar");
    assert!(!config.provider.enabled);
    // Untouched fields keep their defaults
    assert_eq!(config.provider.url, "http://ip-api.com/json");
    assert_eq!(config.provider.timeout_secs, 10);
    assert_eq!(config.viewport.initial_zoom, 2.0);
}

#[test]
fn test_file_overrides_every_section() {
    let file: FileConfig = toml::from_str(
        r#"
        [provider]
        url = "http://geo.example.internal/json"
        timeout_secs = 5

        [viewport]
        initial_lat = 40.0
        initial_lng = -74.0
        initial_zoom = 8.0

        [logging]
        level = "debug"
        file_enabled = true
        file_prefix = "pin.log"
        "#,
    )
    .unwrap();

    let mut config = Config::default();
    config.apply_file(file);

    assert_eq!(config.provider.url, "http://geo.example.internal/json");
    assert_eq!(config.provider.timeout_secs, 5);
    assert_eq!(config.viewport.initial_lat, 40.0);
    assert_eq!(config.viewport.initial_lng, -74.0);
    assert_eq!(config.viewport.initial_zoom, 8.0);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file_enabled);
    assert_eq!(config.logging.file_prefix, "pin.log");
}

#[test]
fn test_defaults_match_lookup_contract() {
    let config = Config::default();
    // The one-shot lookup contract: 10 second deadline, provider on
    assert_eq!(config.provider.timeout_secs, 10);
    assert!(config.provider.enabled);
    // World view before any fix
    assert_eq!(config.viewport.initial_lat, 0.0);
    assert_eq!(config.viewport.initial_lng, 0.0);
    assert_eq!(config.viewport.initial_zoom, 2.0);
}
