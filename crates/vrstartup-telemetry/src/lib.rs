//! vrstartup Telemetry - logging setup on top of `tracing`.
//!
//! ```rust,no_run
//! use vrstartup_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), vrstartup_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("vrstartup_runtime=debug");
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LOG_FILE_PREFIX, LogConfig, LogFormat, setup_logging};
