//! `get_forecast` tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::ToolError;
use crate::mcp::arguments::Arguments;
use crate::mcp::registry::{ToolDescriptor, ToolHandler};
use crate::weather::client::WeatherClient;
use crate::weather::models::ForecastResponse;
use crate::weather::LOCATION_DESCRIPTION;

/// Tool name.
pub const NAME: &str = "get_forecast";

/// Forecast length used when `days` is absent or out of range.
pub const DEFAULT_DAYS: u8 = 3;

/// Longest forecast the upstream serves.
pub const MAX_DAYS: u8 = 10;

/// Published definition.
#[must_use]
pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Get the weather forecast for a location",
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": LOCATION_DESCRIPTION
                },
                "days": {
                    "type": "number",
                    "description": "Number of forecast days (1-10)",
                    "default": DEFAULT_DAYS
                },
                "aqi": {
                    "type": "string",
                    "description": "Include air quality data (yes/no)",
                    "default": "no"
                },
                "alerts": {
                    "type": "string",
                    "description": "Include weather alerts (yes/no)",
                    "default": "no"
                }
            },
            "required": ["location"]
        }),
    )
}

/// Reads `days`, truncating fractions. Values outside `1..=10` fall back to
/// [`DEFAULT_DAYS`].
#[must_use]
#[allow(clippy::cast_possible_truncation)] // truncation toward zero is intended
pub fn forecast_days(arguments: &Arguments) -> u8 {
    arguments
        .optional_number("days")
        .map(|d| d.trunc() as i64)
        .and_then(|d| u8::try_from(d).ok())
        .filter(|d| (1..=MAX_DAYS).contains(d))
        .unwrap_or(DEFAULT_DAYS)
}

/// Handler for [`NAME`].
#[derive(Debug, Clone)]
pub struct Forecast {
    client: Arc<WeatherClient>,
}

impl Forecast {
    /// Creates the handler.
    #[must_use]
    pub const fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for Forecast {
    async fn call(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let location = arguments.required_str("location")?;
        let days = forecast_days(arguments);
        let days_param = days.to_string();

        let response: ForecastResponse = self
            .client
            .get(
                "forecast",
                &[
                    ("q", location),
                    ("days", days_param.as_str()),
                    ("aqi", arguments.str_or("aqi", "no")),
                    ("alerts", arguments.str_or("alerts", "no")),
                ],
                "check the location and API key",
            )
            .await?;

        Ok(format_forecast(&response, days))
    }
}

/// Renders a `forecast.json` payload.
#[must_use]
pub fn format_forecast(response: &ForecastResponse, days: u8) -> String {
    let loc = &response.location;
    let mut out = format!(
        "🌦️ WEATHER FORECAST ({days} days)\n\
         📍 Location: {}, {}, {}\n\
         🕐 Local time: {}\n\n",
        loc.name, loc.region, loc.country, loc.localtime,
    );

    for (i, fd) in response.forecast.forecastday.iter().enumerate() {
        let day = &fd.day;
        out.push_str(&format!(
            "📅 DAY {} - {}\n\
             🌡️  Temperature: {:.1}°C - {:.1}°C (average: {:.1}°C)\n\
             🌦️  Condition: {}\n\
             💧 Average humidity: {:.0}%\n\
             💨 Max wind: {:.1} km/h\n\
             🌧️  Total precipitation: {:.1} mm\n\
             ☀️  UV index: {:.1}\n\
             🌅 Sunrise: {} | 🌇 Sunset: {}\n\
             🌙 Moon phase: {}\n\n",
            i + 1,
            fd.date,
            day.mintemp_c,
            day.maxtemp_c,
            day.avgtemp_c,
            day.condition.text,
            day.avghumidity,
            day.maxwind_kph,
            day.totalprecip_mm,
            day.uv,
            fd.astro.sunrise,
            fd.astro.sunset,
            fd.astro.moon_phase,
        ));
    }

    out
}
