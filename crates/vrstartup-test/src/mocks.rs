//! Mock implementations for testing.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use vrstartup_manifest::ManifestDocument;
use vrstartup_registrar::Pause;
use vrstartup_runtime::{
    ApplicationCatalog, ApplicationErrorCode, ApplicationType, RuntimeError, RuntimeResult,
    VrRuntime,
};

/// A call made against a [`MockRuntime`] or its catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    /// `init`.
    Init(ApplicationType),
    /// `application_catalog`.
    OpenCatalog,
    /// `add_application_manifest`.
    AddManifest {
        /// Manifest path passed in.
        path: PathBuf,
        /// Whether the registration was temporary.
        temporary: bool,
    },
    /// `is_application_installed`.
    IsInstalled(String),
    /// `set_application_auto_launch`.
    SetAutoLaunch {
        /// Key passed in.
        app_key: String,
        /// Requested flag.
        enabled: bool,
    },
    /// `error_name_from_code`.
    ErrorName(ApplicationErrorCode),
    /// `shutdown`.
    Shutdown,
}

/// A catalog call that should fail outside the result-code channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFault {
    /// `add_application_manifest` returns a transport error.
    AddManifest,
    /// `is_application_installed` returns a transport error.
    InstallQuery,
    /// `set_application_auto_launch` returns a transport error.
    AutoLaunch,
    /// `add_application_manifest` panics.
    PanicOnAddManifest,
}

#[derive(Debug, Default)]
struct MockState {
    init_failure: Option<String>,
    interface_failure: Option<String>,
    add_result: Option<ApplicationErrorCode>,
    auto_launch_result: Option<ApplicationErrorCode>,
    install_lag: bool,
    fault: Option<MockFault>,
    error_names: HashMap<i32, String>,
    failing_name_lookup: bool,
    connected: bool,
    installed: BTreeMap<String, PathBuf>,
    auto_launch: BTreeSet<String>,
    calls: Vec<RuntimeCall>,
    shutdowns: usize,
}

/// In-memory [`VrRuntime`] with a scriptable catalog.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect the call log through another.
///
/// Without scripting, the catalog behaves like a real one: added manifests
/// are parsed from disk and their keys become installed, re-adding a
/// manifest replaces the entry for its key, and auto-launch can only be set
/// for installed keys.
#[derive(Debug, Clone, Default)]
pub struct MockRuntime {
    state: Arc<Mutex<MockState>>,
}

impl MockRuntime {
    /// Create a mock that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `init` fail with `diagnostic`.
    #[must_use]
    pub fn with_init_failure(self, diagnostic: impl Into<String>) -> Self {
        self.lock().init_failure = Some(diagnostic.into());
        self
    }

    /// Make opening the catalog fail after a successful `init`.
    #[must_use]
    pub fn with_interface_failure(self, reason: impl Into<String>) -> Self {
        self.lock().interface_failure = Some(reason.into());
        self
    }

    /// Return `code` from every `add_application_manifest`.
    #[must_use]
    pub fn with_add_result(self, code: ApplicationErrorCode) -> Self {
        self.lock().add_result = Some(code);
        self
    }

    /// Return `code` from every `set_application_auto_launch`.
    #[must_use]
    pub fn with_auto_launch_result(self, code: ApplicationErrorCode) -> Self {
        self.lock().auto_launch_result = Some(code);
        self
    }

    /// Report every key as not installed, as if the catalog lagged behind.
    #[must_use]
    pub fn with_install_lag(self) -> Self {
        self.lock().install_lag = true;
        self
    }

    /// Inject a fault into one catalog call.
    #[must_use]
    pub fn with_fault(self, fault: MockFault) -> Self {
        self.lock().fault = Some(fault);
        self
    }

    /// Name `code` as `name` instead of the default `VRApplicationError_*`.
    #[must_use]
    pub fn with_error_name(self, code: ApplicationErrorCode, name: impl Into<String>) -> Self {
        self.lock().error_names.insert(code.raw(), name.into());
        self
    }

    /// Make every error name lookup fail.
    #[must_use]
    pub fn with_failing_name_lookup(self) -> Self {
        self.lock().failing_name_lookup = true;
        self
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.lock().calls.clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&RuntimeCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Number of `init` calls.
    #[must_use]
    pub fn init_count(&self) -> usize {
        self.count_calls(|c| matches!(c, RuntimeCall::Init(_)))
    }

    /// Number of `shutdown` calls.
    #[must_use]
    pub fn shutdown_count(&self) -> usize {
        self.lock().shutdowns
    }

    /// Whether a connection is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Installed keys, sorted.
    #[must_use]
    pub fn installed_keys(&self) -> Vec<String> {
        self.lock().installed.keys().cloned().collect()
    }

    /// Manifest path the key was installed from.
    #[must_use]
    pub fn manifest_for(&self, app_key: &str) -> Option<PathBuf> {
        self.lock().installed.get(app_key).cloned()
    }

    /// Whether auto-launch is enabled for the key.
    #[must_use]
    pub fn is_auto_launch(&self, app_key: &str) -> bool {
        self.lock().auto_launch.contains(app_key)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VrRuntime for MockRuntime {
    type Catalog = MockCatalog;

    fn init(&mut self, application_type: ApplicationType) -> RuntimeResult<()> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::Init(application_type));
        if let Some(diagnostic) = &state.init_failure {
            return Err(RuntimeError::unreachable(diagnostic.clone()));
        }
        state.connected = true;
        Ok(())
    }

    fn application_catalog(&mut self) -> RuntimeResult<MockCatalog> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::OpenCatalog);
        if let Some(reason) = &state.interface_failure {
            return Err(RuntimeError::InterfaceUnavailable(reason.clone()));
        }
        Ok(MockCatalog {
            state: Arc::clone(&self.state),
        })
    }

    fn shutdown(&mut self) {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::Shutdown);
        state.shutdowns = state.shutdowns.saturating_add(1);
        state.connected = false;
    }
}

/// Catalog handed out by [`MockRuntime`].
#[derive(Debug)]
pub struct MockCatalog {
    state: Arc<Mutex<MockState>>,
}

impl MockCatalog {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ApplicationCatalog for MockCatalog {
    fn add_application_manifest(
        &mut self,
        manifest_path: &Path,
        temporary: bool,
    ) -> RuntimeResult<ApplicationErrorCode> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::AddManifest {
            path: manifest_path.to_path_buf(),
            temporary,
        });
        match state.fault {
            Some(MockFault::AddManifest) => {
                return Err(RuntimeError::Transport("connection lost".into()));
            },
            Some(MockFault::PanicOnAddManifest) => {
                drop(state);
                panic!("injected panic in add_application_manifest");
            },
            _ => {},
        }
        if let Some(code) = state.add_result {
            return Ok(code);
        }

        let Ok(text) = std::fs::read_to_string(manifest_path) else {
            return Ok(ApplicationErrorCode::NoManifest);
        };
        let Ok(document) = ManifestDocument::from_json(&text) else {
            return Ok(ApplicationErrorCode::InvalidManifest);
        };
        for entry in document.applications {
            state
                .installed
                .insert(entry.app_key, manifest_path.to_path_buf());
        }
        Ok(ApplicationErrorCode::None)
    }

    fn is_application_installed(&mut self, app_key: &str) -> RuntimeResult<bool> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::IsInstalled(app_key.to_owned()));
        if state.fault == Some(MockFault::InstallQuery) {
            return Err(RuntimeError::Transport("connection lost".into()));
        }
        Ok(!state.install_lag && state.installed.contains_key(app_key))
    }

    fn set_application_auto_launch(
        &mut self,
        app_key: &str,
        auto_launch: bool,
    ) -> RuntimeResult<ApplicationErrorCode> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::SetAutoLaunch {
            app_key: app_key.to_owned(),
            enabled: auto_launch,
        });
        if state.fault == Some(MockFault::AutoLaunch) {
            return Err(RuntimeError::Transport("connection lost".into()));
        }
        if let Some(code) = state.auto_launch_result {
            return Ok(code);
        }
        if !state.installed.contains_key(app_key) {
            return Ok(ApplicationErrorCode::UnknownApplication);
        }
        if auto_launch {
            state.auto_launch.insert(app_key.to_owned());
        } else {
            state.auto_launch.remove(app_key);
        }
        Ok(ApplicationErrorCode::None)
    }

    fn error_name_from_code(&self, code: ApplicationErrorCode) -> RuntimeResult<String> {
        let mut state = self.lock();
        state.calls.push(RuntimeCall::ErrorName(code));
        if state.failing_name_lookup {
            return Err(RuntimeError::Transport("name lookup failed".into()));
        }
        Ok(state
            .error_names
            .get(&code.raw())
            .cloned()
            .unwrap_or_else(|| format!("VRApplicationError_{code:?}")))
    }
}

/// [`Pause`] that records requested durations instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingPause {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPause {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far.
    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}
