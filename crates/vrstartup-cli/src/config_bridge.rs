//! Bridge from `vrstartup_config::Config` to domain types.

use anyhow::{Context, Result};
use vrstartup_config::Config;
use vrstartup_runtime::{ApplicationType, OpenVrRuntime};
use vrstartup_telemetry::LogConfig;

/// Logging settings for this run. `--verbose` raises the level to `debug`;
/// without a usable config, logs go to stderr in compact form.
pub(crate) fn to_log_config(config: Option<&Config>, verbose: bool) -> LogConfig {
    let mut log_config = config.map_or_else(LogConfig::default, |c| LogConfig::from(&c.logging));
    if verbose {
        "debug".clone_into(&mut log_config.level);
    }
    log_config
}

/// The application type registration sessions connect as.
pub(crate) fn application_type(config: &Config) -> Result<ApplicationType> {
    config
        .runtime
        .application_type
        .parse::<ApplicationType>()
        .map_err(anyhow::Error::msg)
        .context("invalid runtime.application_type")
}

/// The native runtime, honoring `runtime.library_path`.
pub(crate) fn open_runtime(config: &Config) -> OpenVrRuntime {
    match &config.runtime.library_path {
        Some(path) => OpenVrRuntime::with_library_path(path),
        None => OpenVrRuntime::new(),
    }
}
