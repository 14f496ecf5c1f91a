//! CLI handlers for the `vrstartup config` subcommand.

use std::path::Path;

use anyhow::{Result, bail};
use vrstartup_config::env::{ENV_HOME, ENV_LOG, ENV_OPENVR_LIBRARY, collect_env_vars};
use vrstartup_config::loader::user_config_dir;
use vrstartup_config::{ResolvedConfig, ShowFormat};

fn parse_format(format: &str) -> Result<ShowFormat> {
    match format {
        "toml" => Ok(ShowFormat::Toml),
        "json" => Ok(ShowFormat::Json),
        other => bail!("unknown format '{other}', expected toml or json"),
    }
}

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(resolved: ResolvedConfig, format: &str) -> Result<()> {
    let output = resolved
        .show(parse_format(format)?)
        .map_err(|e| anyhow::anyhow!("failed to format config: {e}"))?;

    println!("{output}");
    Ok(())
}

/// Show all config file paths that are checked.
pub(crate) fn show_paths(explicit_file: Option<&Path>) -> Result<()> {
    let user_dir = user_config_dir(None, &collect_env_vars())?;
    let paths = ResolvedConfig::config_paths(&user_dir, explicit_file);

    println!("Configuration files checked (in precedence order, lowest first):\n");
    for (i, path) in paths.iter().enumerate() {
        let exists = Path::new(path).exists();
        let status = if exists { "found" } else { "not found" };
        println!("  {}. {path}  [{status}]", i.saturating_add(1));
    }

    println!("\nEnvironment variables:");
    println!("  {ENV_OPENVR_LIBRARY} -> runtime.library_path");
    println!("  {ENV_LOG}            -> logging.level");
    println!("  {ENV_HOME}           -> user config directory");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("toml").unwrap(), ShowFormat::Toml);
        assert_eq!(parse_format("json").unwrap(), ShowFormat::Json);
        assert!(parse_format("yaml").is_err());
    }
}
