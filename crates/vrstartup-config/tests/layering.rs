//! Layer precedence across user file, explicit file and environment.

use std::collections::HashMap;
use std::path::PathBuf;

use vrstartup_config::env::{ENV_LOG, ENV_OPENVR_LIBRARY};
use vrstartup_config::loader::load;
use vrstartup_config::{ConfigError, ConfigLayer, ShowFormat};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[test]
fn test_user_file_overrides_defaults() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        r#"
        [registration]
        overlay = false
        "#,
    )
    .unwrap();

    let resolved = load(None, Some(home.path()), &env(&[])).unwrap();

    assert!(!resolved.config.registration.overlay);
    assert_eq!(resolved.loaded_files.len(), 1);
    assert_eq!(
        resolved.field_sources.get("registration.overlay"),
        Some(&ConfigLayer::User)
    );
}

#[test]
fn test_explicit_file_overrides_user_file() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        r#"
        [runtime]
        application_type = "background"
        [logging]
        level = "info"
        "#,
    )
    .unwrap();
    let extra = home.path().join("extra.toml");
    std::fs::write(
        &extra,
        r#"
        [runtime]
        application_type = "overlay"
        "#,
    )
    .unwrap();

    let resolved = load(Some(&extra), Some(home.path()), &env(&[])).unwrap();

    assert_eq!(resolved.config.runtime.application_type, "overlay");
    assert_eq!(resolved.config.logging.level, "info");
    assert_eq!(resolved.loaded_files.len(), 2);
    assert_eq!(
        resolved.field_sources.get("runtime.application_type"),
        Some(&ConfigLayer::Explicit)
    );
}

#[test]
fn test_env_fills_only_unset_fields() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        r#"
        [logging]
        level = "error"
        "#,
    )
    .unwrap();

    let resolved = load(
        None,
        Some(home.path()),
        &env(&[(ENV_LOG, "trace"), (ENV_OPENVR_LIBRARY, "/opt/openvr/libopenvr_api.so")]),
    )
    .unwrap();

    assert_eq!(resolved.config.logging.level, "error");
    assert_eq!(
        resolved.config.runtime.library_path,
        Some(PathBuf::from("/opt/openvr/libopenvr_api.so"))
    );
    assert_eq!(
        resolved.field_sources.get("runtime.library_path"),
        Some(&ConfigLayer::Environment)
    );
}

#[test]
fn test_env_log_level_replaces_default() {
    let home = tempfile::tempdir().unwrap();
    let resolved = load(None, Some(home.path()), &env(&[(ENV_LOG, "debug")])).unwrap();
    assert_eq!(resolved.config.logging.level, "debug");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("nope.toml");
    let err = load(Some(&missing), Some(home.path()), &env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}

#[test]
fn test_malformed_file_names_its_path() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("config.toml");
    std::fs::write(&path, "[runtime\napplication_type = ").unwrap();

    let err = load(None, Some(home.path()), &env(&[])).unwrap_err();
    match err {
        ConfigError::ParseError { path: p, .. } => assert_eq!(p, path.display().to_string()),
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_invalid_value_fails_validation() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        r#"
        [logging]
        format = "yaml"
        "#,
    )
    .unwrap();

    let err = load(None, Some(home.path()), &env(&[])).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ValidationError { ref field, .. } if field == "logging.format"
    ));
}

#[test]
fn test_show_reports_sources() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        r#"
        [registration]
        overlay = false
        "#,
    )
    .unwrap();

    let resolved = load(None, Some(home.path()), &env(&[])).unwrap();
    let text = resolved.show(ShowFormat::Toml).unwrap();

    assert!(text.contains("overlay = false  # [user]"));
    assert!(text.contains("application_type = \"utility\"  # [defaults]"));
}
