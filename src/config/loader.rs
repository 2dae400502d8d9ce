//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    Env { key: &'static str, reason: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load configuration: optional TOML file, then process environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: ServiceConfig = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `APP_ENV`, `HOST`, `PORT`, `LOG_LEVEL`, `LOG_FORMAT` and
/// `LOG_BACKTRACE` from `lookup`. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("APP_ENV") {
        config.environment = v.parse().map_err(|reason| ConfigError::Env { key: "APP_ENV", reason })?;
    }
    if let Some(v) = get("HOST") {
        config.listener.host = v;
    }
    if let Some(v) = get("PORT") {
        config.listener.port = v.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
            key: "PORT",
            reason: e.to_string(),
        })?;
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.logging.level = v.parse().map_err(|e: crate::observability::logging::ParseLevelError| {
            ConfigError::Env {
                key: "LOG_LEVEL",
                reason: e.to_string(),
            }
        })?;
    }
    if let Some(v) = get("LOG_FORMAT") {
        config.logging.format = Some(v.parse().map_err(|reason| ConfigError::Env { key: "LOG_FORMAT", reason })?);
    }
    if let Some(v) = get("LOG_BACKTRACE") {
        config.logging.backtrace = Some(parse_bool(&v).ok_or_else(|| ConfigError::Env {
            key: "LOG_BACKTRACE",
            reason: format!("expected true/false, got '{}'", v),
        })?);
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RuntimeMode;
    use crate::observability::{LogFormat, LogLevel};
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("APP_ENV", "development"),
                ("HOST", "127.0.0.1"),
                ("PORT", "4000"),
                ("LOG_LEVEL", "warn"),
                ("LOG_FORMAT", "json"),
                ("LOG_BACKTRACE", "off"),
            ]),
        )
        .unwrap();

        assert_eq!(config.environment, RuntimeMode::Development);
        assert_eq!(config.listener.bind_address(), "127.0.0.1:4000");
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, Some(LogFormat::Json));
        assert_eq!(config.logging.backtrace, Some(false));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, env(&[("LOG_LEVEL", ""), ("PORT", " ")])).unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.listener.port, 3000);
    }

    #[test]
    fn test_bad_env_values_are_rejected() {
        let mut config = ServiceConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("LOG_LEVEL", "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "LOG_LEVEL", .. }));

        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "PORT", .. }));
    }

    #[test]
    fn test_load_from_file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nport = 8080\n\n[limits]\nrequest_timeout_secs = 5").unwrap();

        let config = load_config_with(Some(file.path()), env(&[("PORT", "9090")])).unwrap();
        assert_eq!(config.limits.request_timeout_secs, 5);
        assert_eq!(config.listener.port, 9090);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_blank_host_from_file_fails_validation() {
        // Blank env values are ignored, so the default host survives.
        let config = load_config_with(None, env(&[("HOST", "   ")])).unwrap();
        assert_eq!(config.listener.host, ServiceConfig::default().listener.host);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nhost = \"\"").unwrap();
        let err = load_config_with(Some(file.path()), env(&[])).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref errors) if errors.as_slice() == [ValidationError::EmptyHost])
        );
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nrequest_timeout_secs = 0").unwrap();

        let err = load_config_with(Some(file.path()), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config_with(Some(Path::new("/definitely/not/here.toml")), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
