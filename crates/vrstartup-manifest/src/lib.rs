//! vrstartup Manifest - application manifests for the VR runtime catalog.
//!
//! This crate provides:
//! - [`AppKey`] derivation from a display name
//! - [`ApplicationRecord`], the caller-owned description of a target executable
//! - [`ManifestDocument`], the JSON document the runtime reads
//! - [`ManifestBuilder`], the pure transformation from record to document and
//!   the computed on-disk location of that document
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use vrstartup_manifest::ManifestBuilder;
//!
//! let document = ManifestBuilder::build("My App", Path::new("C:\\Apps\\Foo\\foo.exe"), true);
//! let entry = &document.applications[0];
//!
//! assert_eq!(entry.app_key, "user.generated.myapp");
//! assert_eq!(entry.binary_path_windows, "C:/Apps/Foo/foo.exe");
//! assert!(entry.is_dashboard_overlay);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod builder;
mod document;
mod error;
mod key;
mod record;

pub use builder::{ManifestBuilder, PreparedManifest, manifest_path_for, to_manifest_path_string};
pub use document::{
    ApplicationEntry, LAUNCH_TYPE_BINARY, LocalizedStrings, MANIFEST_EXTENSION, MANIFEST_LOCALE,
    MANIFEST_SOURCE, ManifestDocument,
};
pub use error::{ManifestError, ManifestResult};
pub use key::{APP_KEY_NAMESPACE, AppKey, FALLBACK_KEY_SUFFIX};
pub use record::{ApplicationRecord, suggest_display_name};
