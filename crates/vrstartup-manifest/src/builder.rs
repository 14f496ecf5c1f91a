//! Record to manifest transformation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::document::{
    ApplicationEntry, LAUNCH_TYPE_BINARY, LocalizedStrings, MANIFEST_EXTENSION, MANIFEST_LOCALE,
    MANIFEST_SOURCE, ManifestDocument,
};
use crate::key::AppKey;
use crate::record::ApplicationRecord;

/// Builds manifest documents. Pure: no I/O happens here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestBuilder;

/// A manifest together with the key it declares and where it belongs on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedManifest {
    /// Key of the single application in the document.
    pub app_key: AppKey,
    /// The document to persist.
    pub document: ManifestDocument,
    /// Location next to the target executable.
    pub path: PathBuf,
}

impl ManifestBuilder {
    /// Build the manifest document for one application.
    #[must_use]
    pub fn build(display_name: &str, binary_path: &Path, is_overlay: bool) -> ManifestDocument {
        let app_key = AppKey::derive(display_name);

        let mut strings = BTreeMap::new();
        strings.insert(
            MANIFEST_LOCALE.to_owned(),
            LocalizedStrings {
                name: display_name.to_owned(),
            },
        );

        ManifestDocument {
            source: MANIFEST_SOURCE.to_owned(),
            applications: vec![ApplicationEntry {
                app_key: app_key.as_str().to_owned(),
                launch_type: LAUNCH_TYPE_BINARY.to_owned(),
                binary_path_windows: to_manifest_path_string(binary_path),
                is_dashboard_overlay: is_overlay,
                name: display_name.to_owned(),
                strings,
            }],
        }
    }

    /// Build the document for `record` and compute where it is persisted.
    #[must_use]
    pub fn prepare(record: &ApplicationRecord) -> PreparedManifest {
        PreparedManifest {
            app_key: record.app_key().clone(),
            document: Self::build(
                record.display_name(),
                record.binary_path(),
                record.is_overlay(),
            ),
            path: manifest_path_for(record.binary_path(), record.app_key()),
        }
    }
}

/// Manifest location for an executable: `<exe dir>/<key suffix>.vrmanifest`.
///
/// Uses the host-native path, so the manifest lands next to the executable
/// regardless of how the path is spelled inside the document.
#[must_use]
pub fn manifest_path_for(binary_path: &Path, app_key: &AppKey) -> PathBuf {
    let dir = binary_path.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}.{MANIFEST_EXTENSION}", app_key.suffix()))
}

/// Render a path for the manifest body: every backslash becomes `/`.
#[must_use]
pub fn to_manifest_path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_windows_path_example() {
        let doc = ManifestBuilder::build("My App", Path::new(r"C:\Apps\Foo\foo.exe"), true);

        assert_eq!(doc.source, "builtin");
        assert_eq!(doc.applications.len(), 1);
        let entry = &doc.applications[0];
        assert_eq!(entry.app_key, "user.generated.myapp");
        assert_eq!(entry.launch_type, "binary");
        assert_eq!(entry.binary_path_windows, "C:/Apps/Foo/foo.exe");
        assert!(entry.is_dashboard_overlay);
        assert_eq!(entry.name, "My App");
        assert_eq!(entry.strings.len(), 1);
        assert_eq!(entry.strings["en_us"].name, "My App");
    }

    #[test]
    fn test_build_forward_slash_path_untouched() {
        let doc = ManifestBuilder::build("Tool", Path::new("/opt/tool/run.sh"), false);
        let entry = &doc.applications[0];
        assert_eq!(entry.binary_path_windows, "/opt/tool/run.sh");
        assert!(!entry.is_dashboard_overlay);
    }

    #[test]
    fn test_build_mixed_separators_normalized() {
        let doc = ManifestBuilder::build("Tool", Path::new(r"D:/Games\VR/tool.bat"), false);
        assert_eq!(doc.applications[0].binary_path_windows, "D:/Games/VR/tool.bat");
    }

    #[test]
    fn test_build_never_contains_backslash() {
        for raw in [r"C:\a\b\c.exe", r"\\server\share\x.exe", r"rel\path.exe", "plain.exe"] {
            let doc = ManifestBuilder::build("X", Path::new(raw), false);
            assert!(!doc.applications[0].binary_path_windows.contains('\\'));
        }
    }

    #[test]
    fn test_build_unsanitizable_name_uses_fallback_key() {
        let doc = ManifestBuilder::build("???", Path::new("/opt/x"), false);
        assert_eq!(doc.applications[0].app_key, "user.generated.unnamed_app");
        assert_eq!(doc.applications[0].name, "???");
    }

    #[test]
    fn test_manifest_path_next_to_executable() {
        let key = AppKey::derive("My App");
        let path = manifest_path_for(Path::new("/opt/apps/foo/foo"), &key);
        assert_eq!(path, Path::new("/opt/apps/foo/myapp.vrmanifest"));
    }

    #[test]
    fn test_manifest_path_bare_file_name() {
        let key = AppKey::derive("My App");
        let path = manifest_path_for(Path::new("foo.exe"), &key);
        assert_eq!(path, Path::new("myapp.vrmanifest"));
    }

    #[test]
    fn test_prepare_matches_build() {
        let record = ApplicationRecord::new("/opt/apps/foo/foo", "My App", true).unwrap();
        let prepared = ManifestBuilder::prepare(&record);

        assert_eq!(prepared.app_key.as_str(), "user.generated.myapp");
        assert_eq!(
            prepared.document,
            ManifestBuilder::build("My App", Path::new("/opt/apps/foo/foo"), true)
        );
        assert_eq!(prepared.path, Path::new("/opt/apps/foo/myapp.vrmanifest"));
    }
}
