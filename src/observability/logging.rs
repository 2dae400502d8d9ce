//! Structured logging.
//!
//! # Responsibilities
//! - Build the process-wide base logger from config
//! - Pick JSON or human-readable output
//! - Hand log writes to a non-blocking sink
//!
//! # Design Decisions
//! - The base logger is a handle around a `tracing::Dispatch`; the request
//!   pipeline emits through the handle, not the ambient global default
//! - Level filtering happens in the subscriber, before any formatting
//! - Installing the handle as the global default is a one-shot step

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self as tfmt, MakeWriter},
    layer::SubscriberExt,
    EnvFilter,
};

/// Log severities, in ascending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// No tracing counterpart; emitted as `ERROR` on [`FATAL_TARGET`]
    /// with `fatal = true`.
    Fatal,
}

/// Target carried by every fatal entry. A `fatal` minimum keeps only this
/// target, so plain `ERROR` entries stay below it.
pub const FATAL_TARGET: &str = "user_service::fatal";

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Filter directive understood by `EnvFilter`.
    fn directive(self) -> Cow<'static, str> {
        match self {
            LogLevel::Fatal => Cow::Owned(format!("off,{}=error", FATAL_TARGET)),
            other => Cow::Borrowed(other.as_str()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected one of trace, debug, info, warn, error, fatal)")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// Output mode of the base logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for machines.
    Json,
    /// Colorized single-line output, for humans.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{}' (expected json or pretty)", other)),
        }
    }
}

/// Resolved logger settings, fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include backtraces in "unhandled error" entries.
    pub backtraces: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            backtraces: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("a global logger has already been installed")]
    AlreadyInstalled,
}

/// Process-wide base logger.
///
/// Cheap to clone; every clone shares the same subscriber and sink.
#[derive(Clone, Debug)]
pub struct BaseLogger {
    dispatch: Dispatch,
    settings: LogSettings,
}

impl BaseLogger {
    /// Build a base logger writing to `writer`.
    pub fn new<W>(settings: LogSettings, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let filter = EnvFilter::new(settings.level.directive().as_ref());
        let registry = tracing_subscriber::registry().with(filter);

        let dispatch = match settings.format {
            LogFormat::Json => Dispatch::new(
                registry.with(
                    tfmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(false)
                        .with_span_list(false)
                        .with_writer(writer),
                ),
            ),
            LogFormat::Pretty => Dispatch::new(
                registry.with(
                    tfmt::layer()
                        .with_ansi(true)
                        .with_target(false)
                        .with_timer(tfmt::time::ChronoLocal::new("%H:%M:%S %z".to_string()))
                        .with_writer(writer),
                ),
            ),
        };

        Self { dispatch, settings }
    }

    /// Build a base logger on stdout behind a non-blocking writer.
    ///
    /// Entries are queued and written by a worker thread; the returned guard
    /// flushes the queue when dropped and must live as long as the process.
    pub fn stdout(settings: LogSettings) -> (Self, WorkerGuard) {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        (Self::new(settings, writer), guard)
    }

    /// Install this logger as the process default for code that logs
    /// through the `tracing` macros directly.
    pub fn install_global(&self) -> Result<(), LoggingError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|_| LoggingError::AlreadyInstalled)
    }

    pub fn settings(&self) -> LogSettings {
        self.settings
    }

    pub fn level(&self) -> LogLevel {
        self.settings.level
    }

    /// Run `f` with this logger as the current dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
