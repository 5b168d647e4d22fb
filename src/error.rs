//! Error types for weather-mcp-server.
//!
//! # Security Note
//!
//! Error messages never include the WeatherAPI key. Upstream URLs carry the
//! key as a query parameter, so transport errors are stripped of their URL
//! before being turned into a message.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The upstream API key is not set.
    #[error("WEATHER_API_KEY is required (get a free key at https://www.weatherapi.com/)")]
    MissingApiKey,

    /// The listening port could not be parsed.
    #[error("invalid port '{value}': expected an integer between 0 and 65535")]
    InvalidPort {
        /// The rejected value.
        value: String,
    },

    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },

    /// The upstream HTTP client could not be built.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors raised while building the tool registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Two tools were registered under the same name.
    #[error("tool '{name}' is already registered")]
    DuplicateTool {
        /// The clashing tool name.
        name: String,
    },
}

/// Shape errors in `tools/call` params, detected before a tool is resolved.
///
/// The `Display` output is the protocol error message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `params` or `params.arguments` is not an object.
    #[error("invalid arguments")]
    InvalidArguments,

    /// `params.name` is missing or not a string.
    #[error("tool name required")]
    MissingToolName,
}

/// Errors returned by tool handlers.
///
/// The `Display` output is surfaced verbatim as the protocol error message.
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required argument is missing or empty.
    #[error("parameter '{0}' is required")]
    MissingArgument(&'static str),

    /// An argument is present but unusable.
    #[error("{0}")]
    InvalidArgument(String),

    /// The upstream service could not be reached.
    #[error("error connecting to WeatherAPI: {0}")]
    Upstream(String),

    /// The upstream service answered with a non-success status.
    #[error("WeatherAPI error (status {status}): {hint}")]
    UpstreamStatus {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// What the caller should double-check.
        hint: &'static str,
    },

    /// The upstream payload could not be decoded.
    #[error("error decoding response: {0}")]
    Decode(String),
}

/// Errors from the line-stream transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Reading from the input stream failed.
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// Writing to the output stream failed.
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),

    /// A response could not be serialised.
    #[error("failed to serialise response: {0}")]
    Serialise(#[source] serde_json::Error),
}

/// Errors from the HTTP transport.
#[derive(Error, Debug)]
pub enum HttpServerError {
    /// Binding the TCP listener failed.
    #[error("failed to bind {addr}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an IO error.
    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn missing_api_key_names_variable() {
        assert!(ConfigError::MissingApiKey
            .to_string()
            .contains("WEATHER_API_KEY"));
    }

    #[test]
    fn tool_error_messages() {
        assert_eq!(
            ToolError::MissingArgument("location").to_string(),
            "parameter 'location' is required"
        );
        let status = ToolError::UpstreamStatus {
            status: 401,
            hint: "check the API key",
        };
        assert_eq!(
            status.to_string(),
            "WeatherAPI error (status 401): check the API key"
        );
    }

    #[test]
    fn duplicate_tool_display() {
        let error = RegistryError::DuplicateTool {
            name: "get_forecast".to_string(),
        };
        assert!(error.to_string().contains("get_forecast"));
    }
}
