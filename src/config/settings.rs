//! Configuration structures.
//!
//! [`FileConfig`] maps directly to the optional JSON configuration file.
//! [`Config`] is the resolved, validated configuration the server runs with.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable holding the WeatherAPI key.
pub const API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Environment variable holding the HTTP listening port.
pub const PORT_VAR: &str = "PORT";

/// Environment variable overriding the upstream base URL.
pub const BASE_URL_VAR: &str = "WEATHER_API_BASE_URL";

/// Default HTTP listening port.
pub const DEFAULT_PORT: u16 = 3003;

/// Default upstream WeatherAPI base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Optional configuration file contents.
///
/// Every field is optional; environment variables take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// HTTP listening port.
    #[serde(default)]
    pub port: Option<u16>,

    /// Upstream WeatherAPI base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Upstream request timeout in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Resolved server configuration.
#[derive(Clone)]
pub struct Config {
    /// WeatherAPI key. Never log this directly; use [`Config::masked_api_key`].
    pub api_key: String,
    /// Upstream base URL without a trailing slash.
    pub base_url: String,
    /// HTTP listening port.
    pub port: u16,
    /// Upstream request timeout.
    pub request_timeout: Duration,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Config {
    /// Creates a configuration with defaults for everything but the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            logging: LoggingConfig::default(),
        }
    }

    /// Sets the upstream base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Resolves a configuration from file values and an environment lookup.
    ///
    /// Environment values override file values.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, the port is not a valid
    /// number, or validation fails.
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let port = match env(PORT_VAR).filter(|p| !p.trim().is_empty()) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let base_url = env(BASE_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = Self {
            api_key,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            port,
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            logging: file.logging,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid base URL '{}'. Must start with http:// or https://",
                    self.base_url
                ),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError {
                message: "request_timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the API key with everything but the first and last four
    /// characters hidden.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() < 8 {
            return "****".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.masked_api_key())
            .field("base_url", &self.base_url)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("logging", &self.logging)
            .finish()
    }
}
