#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for vrstartup.
//!
//! # Usage
//!
//! ```rust,no_run
//! use vrstartup_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("application type: {}", resolved.config.runtime.application_type);
//! ```
//!
//! # Precedence
//!
//! From highest to lowest:
//!
//! 1. **Explicit file** passed with `--config`
//! 2. **User** (`~/.vrstartup/config.toml`, or `$VRSTARTUP_HOME/config.toml`)
//! 3. **Environment variables** (`VRSTARTUP_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! This crate depends on no other vrstartup crate; string values such as
//! `runtime.application_type` are turned into domain types by the caller.

/// Environment variable fallbacks.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered merging with source tracking.
pub mod merge;
/// Resolved configuration display.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use merge::{ConfigLayer, FieldSources};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain, reading the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit_file: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit_file, None, &env::collect_env_vars())
    }

    /// Load configuration from a single file, without layering.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
