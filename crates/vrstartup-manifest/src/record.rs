//! The caller-owned application record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, ManifestResult};
use crate::key::AppKey;

/// A third-party executable to be registered with the runtime catalog.
///
/// The key is derived from the display name at construction and cannot be
/// set independently. Two records with the same display name share a key
/// even when they point at different executables.
///
/// Deserialization goes through [`ApplicationRecord::new`]: a serialized
/// `app_key` is ignored and re-derived, and an empty path is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct ApplicationRecord {
    app_key: AppKey,
    display_name: String,
    binary_path: PathBuf,
    is_overlay: bool,
}

/// The user-supplied part of a record.
#[derive(Deserialize)]
struct RecordFields {
    display_name: String,
    binary_path: PathBuf,
    is_overlay: bool,
}

impl TryFrom<RecordFields> for ApplicationRecord {
    type Error = ManifestError;

    fn try_from(fields: RecordFields) -> ManifestResult<Self> {
        Self::new(fields.binary_path, fields.display_name, fields.is_overlay)
    }
}

impl ApplicationRecord {
    /// Create a record for `binary_path`.
    ///
    /// The display name may be empty; the key then uses the fallback suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingExecutable`] if `binary_path` is empty.
    pub fn new(
        binary_path: impl Into<PathBuf>,
        display_name: impl Into<String>,
        is_overlay: bool,
    ) -> ManifestResult<Self> {
        let binary_path = binary_path.into();
        if binary_path.as_os_str().is_empty() {
            return Err(ManifestError::MissingExecutable);
        }

        let display_name = display_name.into();
        Ok(Self {
            app_key: AppKey::derive(&display_name),
            display_name,
            binary_path,
            is_overlay,
        })
    }

    /// The derived catalog key.
    #[must_use]
    pub fn app_key(&self) -> &AppKey {
        &self.app_key
    }

    /// The name shown in the runtime's library and dashboard.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Path to the executable, in host-native form.
    #[must_use]
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Whether the application is a dashboard overlay.
    #[must_use]
    pub fn is_overlay(&self) -> bool {
        self.is_overlay
    }
}

/// Suggest a display name from an executable path.
///
/// Uses the file stem with each word capitalised, where a word starts after
/// any non-alphabetic character (`my_tool2x.exe` becomes `My_Tool2X`).
/// Returns `None` when the path has no usable file stem.
#[must_use]
pub fn suggest_display_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    if stem.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(stem.len());
    let mut in_word = false;
    for c in stem.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    Some(out)
}
