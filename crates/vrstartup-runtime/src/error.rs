//! Runtime error types.

use thiserror::Error;

/// Errors raised while talking to the VR runtime.
///
/// Result codes the catalog returns for a rejected request are not errors
/// at this level; they come back as [`ApplicationErrorCode`] values.
///
/// [`ApplicationErrorCode`]: crate::ApplicationErrorCode
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime is not installed, not running, or refused the connection.
    #[error("VR runtime unreachable: {diagnostic}")]
    Unreachable {
        /// Diagnostic reported by the runtime or the library loader.
        diagnostic: String,
    },

    /// Connected, but the application-management interface is unavailable.
    #[error("application management interface unavailable: {0}")]
    InterfaceUnavailable(String),

    /// A call into an open session failed outside the catalog's result codes.
    #[error("runtime call failed: {0}")]
    Transport(String),

    /// The session has already been released.
    #[error("runtime session already released")]
    SessionClosed,
}

impl RuntimeError {
    /// Shorthand for [`RuntimeError::Unreachable`].
    pub fn unreachable(diagnostic: impl Into<String>) -> Self {
        Self::Unreachable {
            diagnostic: diagnostic.into(),
        }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
