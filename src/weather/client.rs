//! WeatherAPI HTTP client.

use std::fmt;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, ToolError};

/// Shared client for `GET {base_url}/{endpoint}.json` calls.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    masked_key: String,
}

impl WeatherClient {
    /// Creates a client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("weather-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            masked_key: config.masked_api_key(),
        })
    }

    /// Returns the upstream base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches and decodes one endpoint.
    ///
    /// `hint` is appended to the error when the upstream answers with a
    /// non-success status.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] if the request fails, the status is not
    /// `200 OK`, or the payload cannot be decoded into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        hint: &'static str,
    ) -> Result<T, ToolError> {
        let url = format!("{}/{endpoint}.json", self.base_url);
        debug!(endpoint, "Requesting WeatherAPI");

        // The key travels in the query string, so URLs are stripped from
        // reqwest errors before they reach a message.
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| ToolError::Upstream(e.without_url().to_string()))?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "WeatherAPI responded");

        if status != StatusCode::OK {
            return Err(ToolError::UpstreamStatus {
                status: status.as_u16(),
                hint,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ToolError::Decode(e.without_url().to_string()))
    }
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.masked_key)
            .finish_non_exhaustive()
    }
}
