//! `get_current_weather` tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::ToolError;
use crate::mcp::arguments::Arguments;
use crate::mcp::registry::{ToolDescriptor, ToolHandler};
use crate::weather::client::WeatherClient;
use crate::weather::models::{AirQuality, CurrentWeatherResponse};
use crate::weather::LOCATION_DESCRIPTION;

/// Tool name.
pub const NAME: &str = "get_current_weather";

/// Published definition.
#[must_use]
pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Get the current weather for a specific location",
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": LOCATION_DESCRIPTION
                },
                "aqi": {
                    "type": "string",
                    "description": "Include air quality data (yes/no)",
                    "default": "no"
                }
            },
            "required": ["location"]
        }),
    )
}

/// Handler for [`NAME`].
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    client: Arc<WeatherClient>,
}

impl CurrentWeather {
    /// Creates the handler.
    #[must_use]
    pub const fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CurrentWeather {
    async fn call(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let location = arguments.required_str("location")?;
        let aqi = arguments.str_or("aqi", "no");

        let response: CurrentWeatherResponse = self
            .client
            .get(
                "current",
                &[("q", location), ("aqi", aqi)],
                "check the location and API key",
            )
            .await?;

        Ok(format_current(&response))
    }
}

/// Renders a `current.json` payload.
#[must_use]
pub fn format_current(response: &CurrentWeatherResponse) -> String {
    let loc = &response.location;
    let cur = &response.current;

    let mut out = format!(
        "🌤️ CURRENT WEATHER\n\
         📍 Location: {}, {}, {}\n\
         🌡️  Temperature: {:.1}°C ({:.1}°F)\n\
         🌦️  Condition: {}\n\
         💨 Wind: {:.1} km/h {}\n\
         💧 Humidity: {:.0}%\n\
         ☁️  Cloud cover: {:.0}%\n\
         👁️  Visibility: {:.1} km\n\
         🌡️  Feels like: {:.1}°C\n\
         📊 Pressure: {:.1} mb\n\
         🌧️  Precipitation: {:.1} mm\n\
         ☀️  UV index: {:.1}\n\
         \n\
         ⏰ Last updated: {}",
        loc.name,
        loc.region,
        loc.country,
        cur.temp_c,
        cur.temp_f,
        cur.condition.text,
        cur.wind_kph,
        cur.wind_dir,
        cur.humidity,
        cur.cloud,
        cur.vis_km,
        cur.feelslike_c,
        cur.pressure_mb,
        cur.precip_mm,
        cur.uv,
        cur.last_updated,
    );

    if let Some(aq) = &cur.air_quality {
        append_air_quality(&mut out, aq);
    }

    out
}

fn append_air_quality(out: &mut String, aq: &AirQuality) {
    out.push_str(&format!(
        "\n\n🌬️  AIR QUALITY\n\
         • CO: {:.1} µg/m³\n\
         • NO2: {:.1} µg/m³\n\
         • O3: {:.1} µg/m³\n\
         • SO2: {:.1} µg/m³\n\
         • PM2.5: {:.1} µg/m³\n\
         • PM10: {:.1} µg/m³\n\
         • US EPA index: {}\n\
         • UK DEFRA index: {}",
        aq.co, aq.no2, aq.o3, aq.so2, aq.pm2_5, aq.pm10, aq.us_epa_index, aq.gb_defra_index,
    ));
}
