//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid config.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::observability::{LogFormat, LogLevel, LogSettings};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Runtime mode; drives logging defaults.
    pub environment: RuntimeMode,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Request limits.
    pub limits: LimitsConfig,
}

impl ServiceConfig {
    /// Resolve the base logger settings, filling unset options from the
    /// runtime mode.
    pub fn log_settings(&self) -> LogSettings {
        let development = self.environment == RuntimeMode::Development;
        LogSettings {
            level: self.logging.level,
            format: self.logging.format.unwrap_or(if development {
                LogFormat::Pretty
            } else {
                LogFormat::Json
            }),
            backtraces: self.logging.backtrace.unwrap_or(development),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Development,
    #[default]
    Production,
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuntimeMode::Development => "development",
            RuntimeMode::Production => "production",
        })
    }
}

impl FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port; 0 picks an ephemeral port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum severity (trace, debug, info, warn, error, fatal).
    pub level: LogLevel,

    /// Output mode. Unset: pretty in development, JSON otherwise.
    pub format: Option<LogFormat>,

    /// Log backtraces of unhandled errors. Unset: on in development.
    pub backtrace: Option<bool>,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Total time allowed for a request, in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
        }
    }
}
