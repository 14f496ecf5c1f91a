//! Configuration validation rules.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{APPLICATION_TYPES, Config, LOG_FORMATS, LOG_LEVELS};

/// Validate a fully merged configuration.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] naming the first offending field.
pub fn validate(config: &Config) -> ConfigResult<()> {
    one_of(
        "runtime.application_type",
        &config.runtime.application_type,
        APPLICATION_TYPES,
    )?;
    one_of("logging.level", &config.logging.level, LOG_LEVELS)?;
    one_of("logging.format", &config.logging.format, LOG_FORMATS)?;

    if let Some(path) = &config.runtime.library_path
        && path.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError {
            field: "runtime.library_path".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }

    if let Some(dir) = &config.logging.file_dir
        && dir.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError {
            field: "logging.file_dir".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }

    for directive in &config.logging.directives {
        if directive.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "logging.directives".to_owned(),
                message: "directives must not be blank".to_owned(),
            });
        }
    }

    Ok(())
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            field: field.to_owned(),
            message: format!("'{value}' is not one of: {}", allowed.join(", ")),
        })
    }
}
