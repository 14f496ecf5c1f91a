//! Application key derivation.
//!
//! The key is the identifier the runtime catalog files an application under.
//! It is never chosen by the user: it is derived from the display name, so the
//! same display name always maps to the same catalog entry.

use std::fmt;

use serde::Serialize;

/// Namespace every derived key lives under.
pub const APP_KEY_NAMESPACE: &str = "user.generated";

/// Key suffix used when the display name has no alphanumeric characters.
pub const FALLBACK_KEY_SUFFIX: &str = "unnamed_app";

/// A catalog key of the form `user.generated.<suffix>`.
/// Only obtainable through [`AppKey::derive`], so it is serialized but never
/// read back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AppKey(String);

impl AppKey {
    /// Derive the key for a display name.
    ///
    /// The name is reduced to its alphanumeric characters and lowercased. An
    /// empty result falls back to [`FALLBACK_KEY_SUFFIX`]; this never fails.
    #[must_use]
    pub fn derive(display_name: &str) -> Self {
        let suffix = sanitize_suffix(display_name);
        Self(format!("{APP_KEY_NAMESPACE}.{suffix}"))
    }

    /// The full key, namespace included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part of the key after the namespace.
    ///
    /// Also used as the manifest file stem.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.0
            .strip_prefix(APP_KEY_NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&self.0)
    }

    /// Whether the key was derived from a name with nothing usable in it.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.suffix() == FALLBACK_KEY_SUFFIX
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AppKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn sanitize_suffix(display_name: &str) -> String {
    // Lowercasing can expand into combining marks (e.g. 'İ'), so filter again.
    let suffix: String = display_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect();

    if suffix.is_empty() {
        FALLBACK_KEY_SUFFIX.to_owned()
    } else {
        suffix
    }
}
