//! Source-annotated display for `config show`.

use std::fmt::{self, Write as _};
use std::path::Path;

use serde::Serialize;

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path to the layer that set it.
    pub field_sources: FieldSources,
    /// Config files that were loaded, lowest precedence first.
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with a source comment on each value.
    Toml,
    /// Plain JSON.
    Json,
}

impl ResolvedConfig {
    /// Render the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn show(&self, format: ShowFormat) -> Result<String, fmt::Error> {
        match format {
            ShowFormat::Toml => self.show_toml(),
            ShowFormat::Json => show_json(&self.config),
        }
    }

    fn show_toml(&self) -> Result<String, fmt::Error> {
        let body = toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?;

        let mut output = String::new();
        output.push_str("# Resolved vrstartup configuration\n");
        output.push_str("# Source annotations: [defaults] [user] [--config] [env]\n");
        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                writeln!(output, "#   {}. {path}", i.saturating_add(1))?;
            }
        }
        output.push('\n');

        let mut section = String::new();
        for line in body.lines() {
            let trimmed = line.trim();
            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                name.clone_into(&mut section);
            }
            match self.annotate_line(trimmed, &section) {
                Some(annotation) => writeln!(output, "{line}  # {annotation}")?,
                None => writeln!(output, "{line}")?,
            }
        }

        Ok(output)
    }

    fn annotate_line(&self, trimmed: &str, section: &str) -> Option<String> {
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }
        let key = trimmed.split('=').next()?.trim();
        let field_path = if section.is_empty() {
            key.to_owned()
        } else {
            format!("{section}.{key}")
        };
        self.field_sources
            .get(&field_path)
            .map(|layer| format!("[{layer}]"))
    }

    /// Config file locations checked during loading, lowest precedence
    /// first.
    #[must_use]
    pub fn config_paths(user_dir: &Path, explicit_file: Option<&Path>) -> Vec<String> {
        let mut paths = vec![user_dir.join("config.toml").display().to_string()];
        if let Some(path) = explicit_file {
            paths.push(path.display().to_string());
        }
        paths
    }
}

fn show_json<T: Serialize>(value: &T) -> Result<String, fmt::Error> {
    serde_json::to_string_pretty(value).map_err(|_| fmt::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ConfigLayer;

    fn resolved() -> ResolvedConfig {
        let mut field_sources = FieldSources::new();
        field_sources.insert("logging.level".into(), ConfigLayer::Environment);
        field_sources.insert("registration.overlay".into(), ConfigLayer::Defaults);
        ResolvedConfig {
            config: Config::default(),
            field_sources,
            loaded_files: vec!["/home/u/.vrstartup/config.toml".into()],
        }
    }

    #[test]
    fn test_show_toml_annotates_by_section() {
        let output = resolved().show(ShowFormat::Toml).unwrap();
        assert!(output.contains("Resolved vrstartup configuration"));
        assert!(output.contains("1. /home/u/.vrstartup/config.toml"));
        assert!(output.contains("level = \"warn\"  # [env]"));
        assert!(output.contains("overlay = true  # [defaults]"));
    }

    #[test]
    fn test_show_json_is_valid() {
        let output = resolved().show(ShowFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["runtime"]["application_type"], "utility");
    }

    #[test]
    fn test_config_paths() {
        let paths = ResolvedConfig::config_paths(
            Path::new("/home/u/.vrstartup"),
            Some(Path::new("/tmp/extra.toml")),
        );
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("config.toml"));
        assert_eq!(paths[1], "/tmp/extra.toml");
    }
}
