//! Injected logging abstraction.
//!
//! Each map instance carries its own [`Logger`] value instead of sharing
//! process-wide mutable state. The default sink forwards to [`tracing`]
//! events; consumers may register a custom sink and an independent minimum
//! level filter through the configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Severity levels, ordered from most to least verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    /// Suppresses all output.
    #[default]
    Off,
}

/// Pluggable sink taking a severity and a message.
pub type LogSink = Arc<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Per-instance logger with a minimum-level filter and an optional custom sink.
#[derive(Clone, Default)]
pub struct Logger {
    level: LogLevel,
    sink: Option<LogSink>,
}

impl Logger {
    pub fn new(level: LogLevel, sink: Option<LogSink>) -> Self {
        Self { level, sink }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Replaces the default tracing sink with a custom one.
    pub fn register_sink(&mut self, sink: LogSink) {
        self.sink = Some(sink);
    }

    pub fn log(&self, level: LogLevel, msg: &str) {
        if level == LogLevel::Off || level < self.level {
            return;
        }
        match &self.sink {
            Some(sink) => sink(level, msg),
            None => match level {
                LogLevel::Error => tracing::error!("{}", msg),
                LogLevel::Warn => tracing::warn!("{}", msg),
                LogLevel::Info => tracing::info!("{}", msg),
                LogLevel::Debug => tracing::debug!("{}", msg),
                LogLevel::Trace => tracing::trace!("{}", msg),
                LogLevel::Off => {}
            },
        }
    }

    pub fn error(&self, msg: &str) {
        self.log(LogLevel::Error, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.log(LogLevel::Warn, msg);
    }

    pub fn info(&self, msg: &str) {
        self.log(LogLevel::Info, msg);
    }

    pub fn debug(&self, msg: &str) {
        self.log(LogLevel::Debug, msg);
    }

    pub fn trace(&self, msg: &str) {
        self.log(LogLevel::Trace, msg);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}
