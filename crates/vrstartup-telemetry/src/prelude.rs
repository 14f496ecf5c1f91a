//! Commonly used types for convenient import.
//!
//! ```rust,no_run
//! use vrstartup_telemetry::prelude::*;
//!
//! # fn main() -> TelemetryResult<()> {
//! setup_logging(&LogConfig::new("debug").with_format(LogFormat::Compact))?;
//! tracing::info!("ready");
//! # Ok(())
//! # }
//! ```

pub use crate::{TelemetryError, TelemetryResult};

pub use crate::{LogConfig, LogFormat, setup_logging};
