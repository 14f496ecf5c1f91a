//! Human-readable progress reporting.

use std::fmt;

use serde::Serialize;
use tracing::{error, info, warn};

/// Severity of a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLevel {
    /// A step is starting or has finished normally.
    Info,
    /// Something unusual that does not stop the attempt.
    Warning,
    /// The attempt succeeded.
    Success,
    /// The attempt failed.
    Error,
}

/// One line of progress output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressLine {
    /// Severity.
    pub level: ProgressLevel,
    /// Text shown to the user.
    pub message: String,
}

impl ProgressLine {
    /// Create a line.
    pub fn new(level: ProgressLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProgressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives progress lines in the order they are produced.
pub trait ProgressSink {
    /// Accept one line.
    fn emit(&mut self, line: ProgressLine);
}

impl ProgressSink for Vec<ProgressLine> {
    fn emit(&mut self, line: ProgressLine) {
        self.push(line);
    }
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _line: ProgressLine) {}
}

/// Forwards lines to a sink and mirrors them into the log.
pub(crate) struct Reporter<'s> {
    sink: &'s mut dyn ProgressSink,
}

impl<'s> Reporter<'s> {
    pub(crate) fn new(sink: &'s mut dyn ProgressSink) -> Self {
        Self { sink }
    }

    pub(crate) fn info(&mut self, message: impl Into<String>) {
        let line = ProgressLine::new(ProgressLevel::Info, message);
        info!(target: "vrstartup::progress", "{}", line.message);
        self.sink.emit(line);
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let line = ProgressLine::new(ProgressLevel::Warning, message);
        warn!(target: "vrstartup::progress", "{}", line.message);
        self.sink.emit(line);
    }

    pub(crate) fn success(&mut self, message: impl Into<String>) {
        let line = ProgressLine::new(ProgressLevel::Success, message);
        info!(target: "vrstartup::progress", "{}", line.message);
        self.sink.emit(line);
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let line = ProgressLine::new(ProgressLevel::Error, message);
        error!(target: "vrstartup::progress", "{}", line.message);
        self.sink.emit(line);
    }
}
