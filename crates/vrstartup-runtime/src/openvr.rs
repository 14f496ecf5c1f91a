//! Native backend over the runtime's `openvr_api` shared library.
//!
//! The library is loaded lazily on first use. Connection management goes
//! through the flat `VR_*` exports; catalog calls go through the
//! `IVRApplications` C function table.

#![allow(unsafe_code)]

use std::ffi::{CStr, CString, OsString, c_char, c_void};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use libloading::Library;
use tracing::{debug, warn};

use crate::error::{RuntimeError, RuntimeResult};
use crate::traits::{ApplicationCatalog, VrRuntime};
use crate::types::{ApplicationErrorCode, ApplicationType};

type InitInternal2Fn = unsafe extern "C" fn(*mut i32, i32, *const c_char) -> isize;
type ShutdownInternalFn = unsafe extern "C" fn();
type GetGenericInterfaceFn = unsafe extern "C" fn(*const c_char, *mut i32) -> isize;
type InitErrorDescriptionFn = unsafe extern "C" fn(i32) -> *const c_char;
type IsRuntimeInstalledFn = unsafe extern "C" fn() -> bool;

type AddManifestFn = unsafe extern "system" fn(*const c_char, bool) -> i32;
type IsInstalledFn = unsafe extern "system" fn(*const c_char) -> bool;
type ErrorNameFn = unsafe extern "system" fn(i32) -> *const c_char;
type SetAutoLaunchFn = unsafe extern "system" fn(*const c_char, bool) -> i32;

/// Function-table interface name for `IVRApplications_007`.
const APPLICATIONS_FN_TABLE: &CStr = c"FnTable:IVRApplications_007";

/// Prefix of the `IVRApplications_007` function table, up to and including
/// `SetApplicationAutoLaunch`. Slots this backend never calls are opaque.
#[repr(C)]
struct ApplicationsFnTable {
    add_application_manifest: Option<AddManifestFn>,
    _remove_application_manifest: *const c_void,
    is_application_installed: Option<IsInstalledFn>,
    // GetApplicationCount through GetApplicationProcessId.
    _lookup_and_launch: [*const c_void; 10],
    get_applications_error_name_from_enum: Option<ErrorNameFn>,
    // GetApplicationPropertyString, ...Bool, ...Uint64.
    _properties: [*const c_void; 3],
    set_application_auto_launch: Option<SetAutoLaunchFn>,
}

/// [`VrRuntime`] backed by the installed `openvr_api` library.
#[derive(Debug, Default)]
pub struct OpenVrRuntime {
    library_path: Option<PathBuf>,
    library: Option<Library>,
    connected: bool,
}

impl OpenVrRuntime {
    /// Use the platform library name on the loader search path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the library from an explicit path.
    #[must_use]
    pub fn with_library_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Platform file name of the runtime client library.
    #[must_use]
    pub fn library_name() -> OsString {
        libloading::library_filename("openvr_api")
    }

    /// The path or name the library is loaded from.
    #[must_use]
    pub fn library_location(&self) -> PathBuf {
        self.library_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(Self::library_name()))
    }

    /// Load the client library if it is not loaded yet.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Unreachable`] if the library cannot be loaded.
    pub fn load(&mut self) -> RuntimeResult<()> {
        if self.library.is_some() {
            return Ok(());
        }
        let location = self.library_location();
        // SAFETY: loading runs the library's initialisers; `openvr_api` has
        // no load-time side effects beyond symbol resolution.
        let library = unsafe { Library::new(&location) }.map_err(|e| {
            RuntimeError::unreachable(format!(
                "failed to load {}: {e} (is the VR runtime installed?)",
                location.display()
            ))
        })?;
        debug!(path = %location.display(), "loaded runtime client library");
        self.library = Some(library);
        Ok(())
    }

    /// Ask the client library whether a runtime is installed on this machine.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Unreachable`] if the library cannot be loaded
    /// or lacks the export.
    pub fn is_runtime_installed(&mut self) -> RuntimeResult<bool> {
        self.load()?;
        let library = self.library()?;
        // SAFETY: signature matches `VR_IsRuntimeInstalled` in openvr_capi.h.
        unsafe {
            let installed = symbol::<IsRuntimeInstalledFn>(library, b"VR_IsRuntimeInstalled\0")?;
            Ok(installed())
        }
    }

    fn library(&self) -> RuntimeResult<&Library> {
        self.library
            .as_ref()
            .ok_or_else(|| RuntimeError::unreachable("runtime client library not loaded"))
    }

    fn describe_init_error(library: &Library, code: i32) -> String {
        // SAFETY: signature matches `VR_GetVRInitErrorAsEnglishDescription`;
        // the returned string is static inside the library.
        let description = unsafe {
            symbol::<InitErrorDescriptionFn>(library, b"VR_GetVRInitErrorAsEnglishDescription\0")
                .ok()
                .map(|describe| describe(code))
                .and_then(|ptr| c_string(ptr))
        };
        match description {
            Some(text) => format!("{text} (init error {code})"),
            None => format!("init error {code}"),
        }
    }
}

impl VrRuntime for OpenVrRuntime {
    type Catalog = OpenVrCatalog;

    fn init(&mut self, application_type: ApplicationType) -> RuntimeResult<()> {
        self.load()?;
        let library = self.library()?;

        let mut error: i32 = 0;
        // SAFETY: signature matches `VR_InitInternal2`; a null startup info
        // pointer is accepted by the runtime.
        unsafe {
            let init = symbol::<InitInternal2Fn>(library, b"VR_InitInternal2\0")?;
            init(&raw mut error, application_type.raw(), std::ptr::null());
        }

        if error != 0 {
            return Err(RuntimeError::unreachable(Self::describe_init_error(
                library, error,
            )));
        }
        self.connected = true;
        Ok(())
    }

    fn application_catalog(&mut self) -> RuntimeResult<OpenVrCatalog> {
        let library = self.library()?;
        let mut error: i32 = 0;
        // SAFETY: signature matches `VR_GetGenericInterface`; the returned
        // value is a pointer to the requested function table or 0.
        let raw = unsafe {
            let get = symbol::<GetGenericInterfaceFn>(library, b"VR_GetGenericInterface\0")
                .map_err(|e| RuntimeError::InterfaceUnavailable(e.to_string()))?;
            get(APPLICATIONS_FN_TABLE.as_ptr(), &raw mut error)
        };

        let table = NonNull::new(raw as *mut ApplicationsFnTable).filter(|_| error == 0);
        match table {
            Some(table) => Ok(OpenVrCatalog { table }),
            None => Err(RuntimeError::InterfaceUnavailable(format!(
                "{} (init error {error})",
                APPLICATIONS_FN_TABLE.to_string_lossy()
            ))),
        }
    }

    fn shutdown(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        let Ok(library) = self.library() else {
            return;
        };
        // SAFETY: signature matches `VR_ShutdownInternal`; only called after
        // a successful init.
        unsafe {
            match symbol::<ShutdownInternalFn>(library, b"VR_ShutdownInternal\0") {
                Ok(shutdown) => shutdown(),
                Err(e) => warn!(error = %e, "runtime client library has no shutdown export"),
            }
        }
    }
}

/// The `IVRApplications` interface of a live connection.
///
/// Valid only while the [`OpenVrRuntime`] that produced it stays connected;
/// [`RuntimeSession`](crate::RuntimeSession) drops it before shutting down.
#[derive(Debug)]
pub struct OpenVrCatalog {
    table: NonNull<ApplicationsFnTable>,
}

impl OpenVrCatalog {
    fn table(&self) -> &ApplicationsFnTable {
        // SAFETY: the pointer came from `VR_GetGenericInterface` and the
        // table lives as long as the connection.
        unsafe { self.table.as_ref() }
    }
}

impl ApplicationCatalog for OpenVrCatalog {
    fn add_application_manifest(
        &mut self,
        manifest_path: &Path,
        temporary: bool,
    ) -> RuntimeResult<ApplicationErrorCode> {
        let add = self
            .table()
            .add_application_manifest
            .ok_or_else(|| missing_slot("AddApplicationManifest"))?;
        let path = to_c_string(&manifest_path.to_string_lossy())?;
        // SAFETY: `path` outlives the call; the runtime copies it.
        let raw = unsafe { add(path.as_ptr(), temporary) };
        Ok(ApplicationErrorCode::from_raw(raw))
    }

    fn is_application_installed(&mut self, app_key: &str) -> RuntimeResult<bool> {
        let installed = self
            .table()
            .is_application_installed
            .ok_or_else(|| missing_slot("IsApplicationInstalled"))?;
        let key = to_c_string(app_key)?;
        // SAFETY: `key` outlives the call.
        Ok(unsafe { installed(key.as_ptr()) })
    }

    fn set_application_auto_launch(
        &mut self,
        app_key: &str,
        auto_launch: bool,
    ) -> RuntimeResult<ApplicationErrorCode> {
        let set = self
            .table()
            .set_application_auto_launch
            .ok_or_else(|| missing_slot("SetApplicationAutoLaunch"))?;
        let key = to_c_string(app_key)?;
        // SAFETY: `key` outlives the call.
        let raw = unsafe { set(key.as_ptr(), auto_launch) };
        Ok(ApplicationErrorCode::from_raw(raw))
    }

    fn error_name_from_code(&self, code: ApplicationErrorCode) -> RuntimeResult<String> {
        let name = self
            .table()
            .get_applications_error_name_from_enum
            .ok_or_else(|| missing_slot("GetApplicationsErrorNameFromEnum"))?;
        // SAFETY: the returned string is static inside the runtime.
        let ptr = unsafe { name(code.raw()) };
        // SAFETY: non-null pointers from the runtime are NUL-terminated.
        unsafe { c_string(ptr) }
            .ok_or_else(|| RuntimeError::Transport(format!("no name for result code {code}")))
    }
}

/// Look up `name` in `library`.
///
/// # Safety
///
/// `T` must match the export's real signature.
unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> RuntimeResult<T> {
    // SAFETY: forwarded to the caller.
    unsafe { library.get::<T>(name) }
        .map(|sym| *sym)
        .map_err(|e| {
            let export = String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name));
            RuntimeError::unreachable(format!("missing export {export}: {e}"))
        })
}

/// Copy a C string owned by the runtime.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: forwarded to the caller.
    let text = unsafe { CStr::from_ptr(ptr) };
    Some(text.to_string_lossy().into_owned())
}

fn to_c_string(value: &str) -> RuntimeResult<CString> {
    CString::new(value)
        .map_err(|_| RuntimeError::Transport(format!("{value:?} contains a NUL byte")))
}

fn missing_slot(name: &str) -> RuntimeError {
    RuntimeError::Transport(format!("runtime function table has no {name}"))
}
