//! The manifest document format.
//!
//! Serialized as indented JSON. Field order within an application entry is
//! the declaration order below.

use std::collections::BTreeMap;
use std::path::Path;

use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{ManifestError, ManifestResult};

/// Value of the top-level `source` field.
pub const MANIFEST_SOURCE: &str = "builtin";

/// Value of each entry's `launch_type` field.
pub const LAUNCH_TYPE_BINARY: &str = "binary";

/// The single locale the localized name map is keyed by.
pub const MANIFEST_LOCALE: &str = "en_us";

/// File extension of persisted manifests.
pub const MANIFEST_EXTENSION: &str = "vrmanifest";

/// A manifest describing one or more applications to the runtime catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    /// Always [`MANIFEST_SOURCE`].
    pub source: String,
    /// The applications this manifest declares.
    pub applications: Vec<ApplicationEntry>,
}

/// One application entry in a [`ManifestDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEntry {
    /// Catalog key.
    pub app_key: String,
    /// Always [`LAUNCH_TYPE_BINARY`].
    pub launch_type: String,
    /// Executable path with forward slashes only.
    pub binary_path_windows: String,
    /// Whether the application runs as a dashboard overlay.
    pub is_dashboard_overlay: bool,
    /// Display name.
    pub name: String,
    /// Localized strings keyed by locale.
    pub strings: BTreeMap<String, LocalizedStrings>,
}

/// Localized strings for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedStrings {
    /// Localized display name.
    pub name: String,
}

impl ManifestDocument {
    /// Render the document as 4-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> ManifestResult<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| serde_json::Error::custom(e).into())
    }

    /// Write the document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Write`] if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> ManifestResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "manifest written");
        Ok(())
    }

    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Serialize`] if the text is not a manifest.
    pub fn from_json(text: &str) -> ManifestResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ManifestDocument {
        let mut strings = BTreeMap::new();
        strings.insert(
            MANIFEST_LOCALE.to_owned(),
            LocalizedStrings {
                name: "My App".to_owned(),
            },
        );
        ManifestDocument {
            source: MANIFEST_SOURCE.to_owned(),
            applications: vec![ApplicationEntry {
                app_key: "user.generated.myapp".to_owned(),
                launch_type: LAUNCH_TYPE_BINARY.to_owned(),
                binary_path_windows: "C:/Apps/Foo/foo.exe".to_owned(),
                is_dashboard_overlay: true,
                name: "My App".to_owned(),
                strings,
            }],
        }
    }

    #[test]
    fn test_to_json_exact_layout() {
        let expected = r#"{
    "source": "builtin",
    "applications": [
        {
            "app_key": "user.generated.myapp",
            "launch_type": "binary",
            "binary_path_windows": "C:/Apps/Foo/foo.exe",
            "is_dashboard_overlay": true,
            "name": "My App",
            "strings": {
                "en_us": {
                    "name": "My App"
                }
            }
        }
    ]
}"#;
        assert_eq!(sample().to_json().unwrap(), expected);
    }

    #[test]
    fn test_write_to_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("myapp.vrmanifest");
        std::fs::write(&path, "stale").unwrap();

        sample().write_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(ManifestDocument::from_json(&text).unwrap(), sample());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("myapp.vrmanifest");

        let result = sample().write_to(&path);
        match result {
            Err(ManifestError::Write { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_ascii_name_is_written_as_utf8() {
        let mut doc = sample();
        doc.applications[0].name = "Äpp 中文 🎮".to_owned();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"name\": \"Äpp 中文 🎮\""));
        assert_eq!(ManifestDocument::from_json(&json).unwrap(), doc);
    }
}
