//! Configuration struct definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application types the runtime accepts for a registration session.
pub const APPLICATION_TYPES: &[&str] = &["utility", "background", "overlay", "scene", "other"];

/// Accepted log levels.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Accepted log formats.
pub const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How to reach the VR runtime.
    pub runtime: RuntimeSection,
    /// Defaults for new registrations.
    pub registration: RegistrationSection,
    /// Log output.
    pub logging: LoggingSection,
}

/// `[runtime]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    /// Explicit path to the runtime client library. When unset the platform
    /// library name is resolved through the loader search path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,
    /// Application type used for registration sessions.
    pub application_type: String,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            library_path: None,
            application_type: "utility".to_owned(),
        }
    }
}

/// `[registration]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationSection {
    /// Whether new registrations are dashboard overlays unless the command
    /// line says otherwise.
    pub overlay: bool,
}

impl Default for RegistrationSection {
    fn default() -> Self {
        Self { overlay: true }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default level.
    pub level: String,
    /// Output format.
    pub format: String,
    /// Extra `tracing` filter directives, e.g. `vrstartup_runtime=debug`.
    pub directives: Vec<String>,
    /// Write logs to rolling files in this directory instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_dir: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            file_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [logging]
            level = "debug"
        "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
        assert!(config.registration.overlay);
        assert_eq!(config.runtime.application_type, "utility");
    }

    #[test]
    fn test_unset_paths_are_not_serialized() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert!(!text.contains("library_path"));
        assert!(!text.contains("file_dir"));
    }
}
