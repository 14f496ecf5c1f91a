//! The runtime collaborator surface.

use std::path::Path;

use crate::error::RuntimeResult;
use crate::types::{ApplicationErrorCode, ApplicationType};

/// A connection point to the VR runtime process.
///
/// Implementations are driven through [`RuntimeSession`](crate::RuntimeSession),
/// which guarantees `shutdown` is called exactly once after a successful
/// `init`. Calling the methods directly bypasses that guarantee.
pub trait VrRuntime {
    /// Application-management handle produced by a live connection.
    type Catalog: ApplicationCatalog;

    /// Connect to the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Unreachable`](crate::RuntimeError::Unreachable)
    /// if the runtime is not installed or not reachable.
    fn init(&mut self, application_type: ApplicationType) -> RuntimeResult<()>;

    /// Obtain the application-management interface of the live connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime does not expose the interface.
    fn application_catalog(&mut self) -> RuntimeResult<Self::Catalog>;

    /// Disconnect from the runtime.
    fn shutdown(&mut self);
}

/// The runtime's application catalog.
///
/// Catalog rejections are reported through [`ApplicationErrorCode`]; the
/// `Err` side is reserved for calls that could not be made at all.
pub trait ApplicationCatalog {
    /// Register the manifest at `manifest_path`.
    ///
    /// A `temporary` registration is forgotten when the runtime restarts.
    ///
    /// # Errors
    ///
    /// Returns an error if the call could not be delivered.
    fn add_application_manifest(
        &mut self,
        manifest_path: &Path,
        temporary: bool,
    ) -> RuntimeResult<ApplicationErrorCode>;

    /// Whether the catalog knows `app_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call could not be delivered.
    fn is_application_installed(&mut self, app_key: &str) -> RuntimeResult<bool>;

    /// Turn auto-launch for `app_key` on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the call could not be delivered.
    fn set_application_auto_launch(
        &mut self,
        app_key: &str,
        auto_launch: bool,
    ) -> RuntimeResult<ApplicationErrorCode>;

    /// The runtime's name for a result code.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime has no name for the code or the call
    /// could not be delivered.
    fn error_name_from_code(&self, code: ApplicationErrorCode) -> RuntimeResult<String>;
}
