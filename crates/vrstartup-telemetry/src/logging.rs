//! Logging configuration and subscriber installation.
//!
//! Events go to stderr, leaving stdout to command output, or to daily
//! rolling files when a log directory is configured.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::{TelemetryError, TelemetryResult};

/// File name prefix for rolling log files (`vrstartup.2026-01-15`).
pub const LOG_FILE_PREFIX: &str = "vrstartup";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// Single line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
    /// The default `tracing-subscriber` format.
    Full,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
            Self::Full => "full",
        })
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "full" => Ok(Self::Full),
            other => Err(TelemetryError::ConfigError(format!(
                "unknown log format '{other}'"
            ))),
        }
    }
}

/// What to log, how, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level filter, e.g. `warn`.
    pub level: String,
    /// Line format.
    pub format: LogFormat,
    /// Per-target overrides, e.g. `vrstartup_runtime=debug`.
    pub directives: Vec<String>,
    /// Directory for rolling log files; stderr when `None`.
    pub file_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("warn")
    }
}

impl LogConfig {
    /// Compact stderr logging at `level`.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            directives: Vec::new(),
            file_dir: None,
        }
    }

    /// Set the line format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Add a per-target directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Write to daily rolling files in `directory` instead of stderr.
    #[must_use]
    pub fn with_file_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.file_dir = Some(directory.into());
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(format!("invalid level: {e}")))?;

        for raw in &self.directives {
            let directive = raw.parse().map_err(|e| {
                TelemetryError::ConfigError(format!("invalid directive '{raw}': {e}"))
            })?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    fn fmt_layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        // Escape codes only make sense on a terminal.
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(self.file_dir.is_none());

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Full => layer.boxed(),
        }
    }
}

#[cfg(feature = "config")]
impl From<&vrstartup_config::LoggingSection> for LogConfig {
    /// Map the `[logging]` section. The config loader has already rejected
    /// unknown formats, so a parse failure here falls back to the default.
    fn from(section: &vrstartup_config::LoggingSection) -> Self {
        Self {
            level: section.level.clone(),
            format: section.format.parse().unwrap_or_default(),
            directives: section.directives.clone(),
            file_dir: section.file_dir.clone(),
        }
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::ConfigError`] for an invalid level, directive
/// or log directory, and [`TelemetryError::InitError`] if a global
/// subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;

    let layer = match &config.file_dir {
        None => config.fmt_layer(std::io::stderr),
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                TelemetryError::ConfigError(format!(
                    "failed to create log directory {}: {e}",
                    dir.display()
                ))
            })?;
            config.fmt_layer(rolling::daily(dir, LOG_FILE_PREFIX))
        },
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}
