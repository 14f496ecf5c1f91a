//! Filesystem fixtures and test setup helpers.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tempfile::TempDir;
use vrstartup_manifest::{ApplicationRecord, MANIFEST_EXTENSION};

/// A temporary directory holding a fake executable to register.
///
/// The directory is removed when the fixture is dropped.
#[derive(Debug)]
pub struct TargetFixture {
    dir: TempDir,
    executable: PathBuf,
}

impl TargetFixture {
    /// Create a directory containing an empty file named `file_name`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or file cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(file_name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let executable = dir.path().join(file_name);
        std::fs::write(&executable, b"").expect("create fake executable");
        Self { dir, executable }
    }

    /// The directory the executable lives in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// The fake executable.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// A record for the executable.
    ///
    /// # Panics
    ///
    /// Never in practice: the executable path is non-empty.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn record(&self, display_name: &str, is_overlay: bool) -> ApplicationRecord {
        ApplicationRecord::new(&self.executable, display_name, is_overlay)
            .expect("fixture executable path is non-empty")
    }

    /// Where the manifest for a key suffix is expected.
    #[must_use]
    pub fn manifest_path(&self, suffix: &str) -> PathBuf {
        self.dir
            .path()
            .join(format!("{suffix}.{MANIFEST_EXTENSION}"))
    }

    /// Manifest files currently in the directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be read.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn manifest_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.dir.path())
            .expect("read fixture dir")
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION))
            .collect();
        files.sort();
        files
    }
}

/// Route `tracing` output through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Honors `RUST_LOG`.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
