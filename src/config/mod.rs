//! Configuration loading.
//!
//! The WeatherAPI key is read from the environment only. Other settings can
//! come from an optional JSON configuration file, with environment variables
//! taking precedence.
//!
//! # Configuration File Locations
//!
//! 1. Path given as the `CONFIG_FILE` CLI argument (must exist)
//! 2. Default location, used only when present:
//!    - **Linux/macOS:** `~/.weather-mcp-server/config.json`
//!    - **Windows:** `%USERPROFILE%\.weather-mcp-server\config.json`

mod settings;

pub use settings::{
    Config, FileConfig, LoggingConfig, API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL, DEFAULT_PORT,
    DEFAULT_TIMEOUT_SECS, PORT_VAR,
};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns the default configuration directory.
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".weather-mcp-server"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Loads the server configuration from the process environment and an
/// optional configuration file.
///
/// If `path` is `None`, the default location is used when it exists.
///
/// # Errors
///
/// Returns an error if:
/// - `WEATHER_API_KEY` is not set
/// - An explicitly named configuration file cannot be found, read or parsed
/// - A setting is invalid
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(p) => read_config_file(p)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(p) => read_config_file(&p)?,
            None => FileConfig::default(),
        },
    };

    Config::from_sources(file, |key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_path_exists() {
        let path = default_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("config.json"));
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_config_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn read_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"port": 4000, "logging": {{"level": "info"}}}}"#).unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.port, Some(4000));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn read_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
