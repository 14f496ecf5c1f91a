//! Environment variable fallbacks.
//!
//! Environment variables fill in fields that no config file set. They never
//! override a value from a file, but they do override built-in defaults.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Path to the runtime client library.
pub const ENV_OPENVR_LIBRARY: &str = "VRSTARTUP_OPENVR_LIBRARY";

/// Default log level.
pub const ENV_LOG: &str = "VRSTARTUP_LOG";

/// Alternate directory holding the user `config.toml`.
pub const ENV_HOME: &str = "VRSTARTUP_HOME";

struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: ENV_OPENVR_LIBRARY,
        field_path: "runtime.library_path",
    },
    EnvMapping {
        var_name: ENV_LOG,
        field_path: "logging.level",
    },
];

/// Apply environment fallbacks to fields not set by any file layer.
///
/// Empty values are ignored. Returns the number of variables applied.
pub fn apply_env_fallbacks<S: BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let set_by_file = sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        let Some(val) = env_vars.get(mapping.var_name).filter(|v| !v.is_empty()) else {
            continue;
        };
        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );
        set_field(merged, mapping.field_path, toml::Value::String(val.clone()));
        sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
        count = count.saturating_add(1);
    }

    count
}

/// Collect the current process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Set a dotted `section.key` field, creating the section table if needed.
fn set_field(root: &mut toml::Value, path: &str, val: toml::Value) {
    let Some((section, key)) = path.split_once('.') else {
        return;
    };
    let Some(table) = root.as_table_mut() else {
        return;
    };
    let section = table
        .entry(section)
        .or_insert(toml::Value::Table(toml::map::Map::new()));
    if let Some(section) = section.as_table_mut() {
        section.insert(key.to_owned(), val);
    }
}
