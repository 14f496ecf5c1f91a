//! Registration error types.

use thiserror::Error;
use vrstartup_manifest::ManifestError;
use vrstartup_runtime::{ApplicationErrorCode, RuntimeError};

use crate::outcome::FailureStage;

/// Why a registration attempt stopped.
///
/// Each variant corresponds to exactly one [`FailureStage`].
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The manifest could not be written next to the executable.
    #[error("{0}")]
    ManifestWrite(#[source] ManifestError),

    /// The runtime could not be reached or its catalog could not be opened.
    #[error("{0}")]
    SessionInit(#[source] RuntimeError),

    /// The catalog rejected the manifest.
    #[error("{name}")]
    Catalog {
        /// The runtime's name for the result code.
        name: String,
        /// The result code.
        code: ApplicationErrorCode,
    },

    /// The catalog rejected the auto-launch request.
    #[error("{name}")]
    AutoLaunch {
        /// The runtime's name for the result code.
        name: String,
        /// The result code.
        code: ApplicationErrorCode,
    },

    /// Anything else, e.g. a runtime call that could not be delivered.
    #[error("{0}")]
    Unexpected(String),
}

impl RegistrationError {
    /// The step this error terminated.
    #[must_use]
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::ManifestWrite(_) => FailureStage::ManifestWrite,
            Self::SessionInit(_) => FailureStage::SessionInit,
            Self::Catalog { .. } => FailureStage::AddManifest,
            Self::AutoLaunch { .. } => FailureStage::AutoLaunch,
            Self::Unexpected(_) => FailureStage::Unexpected,
        }
    }
}

/// Failures of calls made inside an open session are unexpected: catalog
/// rejections arrive as result codes, not as errors.
impl From<RuntimeError> for RegistrationError {
    fn from(e: RuntimeError) -> Self {
        Self::Unexpected(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        assert_eq!(
            RegistrationError::ManifestWrite(ManifestError::MissingExecutable).stage(),
            FailureStage::ManifestWrite
        );
        assert_eq!(
            RegistrationError::SessionInit(RuntimeError::unreachable("down")).stage(),
            FailureStage::SessionInit
        );
        assert_eq!(
            RegistrationError::Catalog {
                name: "x".into(),
                code: ApplicationErrorCode::InvalidManifest,
            }
            .stage(),
            FailureStage::AddManifest
        );
        assert_eq!(
            RegistrationError::AutoLaunch {
                name: "x".into(),
                code: ApplicationErrorCode::UnknownApplication,
            }
            .stage(),
            FailureStage::AutoLaunch
        );
        assert_eq!(
            RegistrationError::Unexpected("boom".into()).stage(),
            FailureStage::Unexpected
        );
    }

    #[test]
    fn test_catalog_message_is_translated_name() {
        let err = RegistrationError::Catalog {
            name: "VRApplicationError_InvalidManifest".into(),
            code: ApplicationErrorCode::InvalidManifest,
        };
        assert_eq!(err.to_string(), "VRApplicationError_InvalidManifest");
    }

    #[test]
    fn test_runtime_error_in_session_is_unexpected() {
        let err: RegistrationError = RuntimeError::Transport("pipe closed".into()).into();
        assert_eq!(err.stage(), FailureStage::Unexpected);
        assert!(err.to_string().contains("pipe closed"));
    }
}
