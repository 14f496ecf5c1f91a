//! Runtime value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the process identifies itself to the runtime when connecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    /// Not a scene, overlay, or utility.
    Other,
    /// A 3D scene application.
    Scene,
    /// An overlay application.
    Overlay,
    /// Connects only if the runtime is already running; never starts it.
    Background,
    /// A short-lived tool that needs the runtime but no rendering.
    #[default]
    Utility,
}

impl ApplicationType {
    /// Every variant, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Other,
        Self::Scene,
        Self::Overlay,
        Self::Background,
        Self::Utility,
    ];

    /// The value passed to the runtime.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            Self::Other => 0,
            Self::Scene => 1,
            Self::Overlay => 2,
            Self::Background => 3,
            Self::Utility => 4,
        }
    }

    /// Lowercase name, as used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Scene => "scene",
            Self::Overlay => "overlay",
            Self::Background => "background",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown application type '{s}'; \
                     expected one of: other, scene, overlay, background, utility"
                )
            })
    }
}

/// Result code of a catalog request.
///
/// The runtime's known codes are listed as variants; anything else is kept
/// verbatim in [`ApplicationErrorCode::Unknown`]. Names are not hard-coded
/// here: use [`ErrorTranslator`](crate::ErrorTranslator) to ask the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ApplicationErrorCode {
    /// The request succeeded.
    None,
    AppKeyAlreadyExists,
    NoManifest,
    NoApplication,
    InvalidIndex,
    UnknownApplication,
    IpcFailed,
    ApplicationAlreadyRunning,
    InvalidManifest,
    InvalidApplication,
    LaunchFailed,
    ApplicationAlreadyStarting,
    LaunchInProgress,
    OldApplicationQuitting,
    TransitionAborted,
    IsTemplate,
    SteamVrIsExiting,
    BufferTooSmall,
    PropertyNotSet,
    UnknownProperty,
    InvalidParameter,
    NotImplemented,
    /// A code this build does not know about.
    Unknown(i32),
}

impl ApplicationErrorCode {
    /// Map a raw runtime value onto a code.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::None,
            100 => Self::AppKeyAlreadyExists,
            101 => Self::NoManifest,
            102 => Self::NoApplication,
            103 => Self::InvalidIndex,
            104 => Self::UnknownApplication,
            105 => Self::IpcFailed,
            106 => Self::ApplicationAlreadyRunning,
            107 => Self::InvalidManifest,
            108 => Self::InvalidApplication,
            109 => Self::LaunchFailed,
            110 => Self::ApplicationAlreadyStarting,
            111 => Self::LaunchInProgress,
            112 => Self::OldApplicationQuitting,
            113 => Self::TransitionAborted,
            114 => Self::IsTemplate,
            115 => Self::SteamVrIsExiting,
            200 => Self::BufferTooSmall,
            201 => Self::PropertyNotSet,
            202 => Self::UnknownProperty,
            203 => Self::InvalidParameter,
            300 => Self::NotImplemented,
            other => Self::Unknown(other),
        }
    }

    /// The raw runtime value.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::AppKeyAlreadyExists => 100,
            Self::NoManifest => 101,
            Self::NoApplication => 102,
            Self::InvalidIndex => 103,
            Self::UnknownApplication => 104,
            Self::IpcFailed => 105,
            Self::ApplicationAlreadyRunning => 106,
            Self::InvalidManifest => 107,
            Self::InvalidApplication => 108,
            Self::LaunchFailed => 109,
            Self::ApplicationAlreadyStarting => 110,
            Self::LaunchInProgress => 111,
            Self::OldApplicationQuitting => 112,
            Self::TransitionAborted => 113,
            Self::IsTemplate => 114,
            Self::SteamVrIsExiting => 115,
            Self::BufferTooSmall => 200,
            Self::PropertyNotSet => 201,
            Self::UnknownProperty => 202,
            Self::InvalidParameter => 203,
            Self::NotImplemented => 300,
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether this is the "no error" code.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::None
    }
}

impl From<i32> for ApplicationErrorCode {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for ApplicationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}
