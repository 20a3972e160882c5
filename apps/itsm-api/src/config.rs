//! Service configuration read from the environment

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected 'text' or 'json'".to_string()),
        }
    }
}

/// Runtime configuration of the HTTP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used in Location headers and hypermedia links
    pub external_address: String,
    /// Number of records shown per page in lists
    pub per_page: u32,
    /// Deadline for a single service call
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            external_address: "http://localhost:8080".to_string(),
            per_page: 10,
            request_timeout: Duration::from_millis(5000),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let per_page: u32 = parse_or(&lookup, "ITSM_PER_PAGE", defaults.per_page)?;
        if per_page < 1 {
            return Err(invalid("ITSM_PER_PAGE", per_page, "must be at least 1"));
        }

        let timeout_ms: u64 = parse_or(
            &lookup,
            "ITSM_REQUEST_TIMEOUT_MS",
            defaults.request_timeout.as_millis() as u64,
        )?;
        if timeout_ms < 1 {
            return Err(invalid(
                "ITSM_REQUEST_TIMEOUT_MS",
                timeout_ms,
                "must be at least 1",
            ));
        }

        Ok(Self {
            host: lookup("ITSM_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "ITSM_PORT", defaults.port)?,
            external_address: lookup("ITSM_EXTERNAL_ADDRESS")
                .map(|addr| addr.trim_end_matches('/').to_string())
                .unwrap_or(defaults.external_address),
            per_page,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format: parse_or(&lookup, "ITSM_LOG_FORMAT", defaults.log_format)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: ToString,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|err: T::Err| invalid(name, value, err.to_string())),
    }
}

fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        reason: reason.into(),
    }
}
