//! Registration states and outcomes.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use vrstartup_manifest::AppKey;

/// Progress of one registration attempt.
///
/// Advances strictly in declaration order, except that exactly one of
/// `InstallConfirmed` and `InstallAssumedAfterWait` is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    /// Nothing done yet.
    Idle,
    /// The manifest file exists next to the executable.
    ManifestWritten,
    /// A runtime session is open.
    SessionOpen,
    /// The catalog accepted the manifest.
    ManifestRegistered,
    /// The catalog reported the key as installed.
    InstallConfirmed,
    /// The key was not reported yet; the fixed wait elapsed.
    InstallAssumedAfterWait,
    /// Auto-launch is enabled. Terminal success.
    AutoLaunchSet,
}

impl RegistrationState {
    /// Whether the catalog holds the registration in this state.
    #[must_use]
    pub fn is_registered(self) -> bool {
        matches!(
            self,
            Self::ManifestRegistered
                | Self::InstallConfirmed
                | Self::InstallAssumedAfterWait
                | Self::AutoLaunchSet
        )
    }
}

/// The step at which a registration attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Writing the manifest file.
    ManifestWrite,
    /// Connecting to the runtime.
    SessionInit,
    /// Submitting the manifest to the catalog.
    AddManifest,
    /// Enabling auto-launch.
    AutoLaunch,
    /// Anything not covered above.
    Unexpected,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ManifestWrite => "ManifestWrite",
            Self::SessionInit => "SessionInit",
            Self::AddManifest => "AddManifest",
            Self::AutoLaunch => "AutoLaunch",
            Self::Unexpected => "Unexpected",
        };
        f.write_str(s)
    }
}

/// Success or failure of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Registered with auto-launch enabled.
    Success,
    /// Stopped at `stage`.
    Failed {
        /// Step that failed.
        stage: FailureStage,
        /// Human-readable reason.
        message: String,
    },
}

/// Result of one [`register`](crate::ApplicationRegistrar::register) call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationOutcome {
    /// Key the application was registered under.
    pub app_key: AppKey,
    /// Where the manifest was (or would have been) written.
    pub manifest_path: PathBuf,
    /// Last state reached before the attempt ended.
    pub reached: RegistrationState,
    /// Final status.
    #[serde(flatten)]
    pub status: RegistrationStatus,
}

impl RegistrationOutcome {
    /// A successful outcome.
    #[must_use]
    pub fn success(app_key: AppKey, manifest_path: PathBuf) -> Self {
        Self {
            app_key,
            manifest_path,
            reached: RegistrationState::AutoLaunchSet,
            status: RegistrationStatus::Success,
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failed(
        app_key: AppKey,
        manifest_path: PathBuf,
        reached: RegistrationState,
        stage: FailureStage,
        message: impl Into<String>,
    ) -> Self {
        Self {
            app_key,
            manifest_path,
            reached,
            status: RegistrationStatus::Failed {
                stage,
                message: message.into(),
            },
        }
    }

    /// Whether the attempt succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RegistrationStatus::Success
    }

    /// The failed step, if any.
    #[must_use]
    pub fn failure_stage(&self) -> Option<FailureStage> {
        match &self.status {
            RegistrationStatus::Success => None,
            RegistrationStatus::Failed { stage, .. } => Some(*stage),
        }
    }

    /// The failure message, if any.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match &self.status {
            RegistrationStatus::Success => None,
            RegistrationStatus::Failed { message, .. } => Some(message),
        }
    }
}
