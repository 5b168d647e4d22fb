//! `get_astronomy` tool.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde_json::json;

use crate::error::ToolError;
use crate::mcp::arguments::Arguments;
use crate::mcp::registry::{ToolDescriptor, ToolHandler};
use crate::weather::client::WeatherClient;
use crate::weather::models::AstronomyResponse;
use crate::weather::LOCATION_DESCRIPTION;

/// Tool name.
pub const NAME: &str = "get_astronomy";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Published definition.
#[must_use]
pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Get astronomy data for a location and date",
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": LOCATION_DESCRIPTION
                },
                "date": {
                    "type": "string",
                    "description": "Date in YYYY-MM-DD format (optional, defaults to today)"
                }
            },
            "required": ["location"]
        }),
    )
}

/// Resolves the `date` argument against `today`.
///
/// An absent, non-string or empty `date` means `today`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidArgument`] if `date` is not `YYYY-MM-DD`.
pub fn resolve_date(arguments: &Arguments, today: NaiveDate) -> Result<NaiveDate, ToolError> {
    let Some(date) = arguments.optional_str("date").filter(|d| !d.is_empty()) else {
        return Ok(today);
    };

    let invalid =
        || ToolError::InvalidArgument("invalid date format, use YYYY-MM-DD".to_string());
    if !is_iso_date_shape(date) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid())
}

/// Exact `DDDD-DD-DD` layout. `chrono` alone also accepts unpadded and
/// signed fields.
fn is_iso_date_shape(date: &str) -> bool {
    date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Handler for [`NAME`].
#[derive(Debug, Clone)]
pub struct Astronomy {
    client: Arc<WeatherClient>,
}

impl Astronomy {
    /// Creates the handler.
    #[must_use]
    pub const fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for Astronomy {
    async fn call(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let location = arguments.required_str("location")?;
        let date = resolve_date(arguments, Local::now().date_naive())?
            .format(DATE_FORMAT)
            .to_string();

        let response: AstronomyResponse = self
            .client
            .get(
                "astronomy",
                &[("q", location), ("dt", date.as_str())],
                "check the location, date and API key",
            )
            .await?;

        Ok(format_astronomy(&response, &date))
    }
}

/// Renders an `astronomy.json` payload.
#[must_use]
pub fn format_astronomy(response: &AstronomyResponse, date: &str) -> String {
    let loc = &response.location;
    let astro = &response.astronomy.astro;

    format!(
        "🌌 ASTRONOMY DATA\n\
         📍 Location: {}, {}, {}\n\
         📅 Date: {date}\n\
         🌐 Coordinates: {:.2}, {:.2}\n\
         🕐 Local time: {}\n\
         \n\
         🌅 SUN\n\
         • Sunrise: {}\n\
         • Sunset: {}\n\
         \n\
         🌙 MOON\n\
         • Moonrise: {}\n\
         • Moonset: {}\n\
         • Moon phase: {}\n\
         \n\
         💡 Time zone: {}",
        loc.name,
        loc.region,
        loc.country,
        loc.lat,
        loc.lon,
        loc.localtime,
        astro.sunrise,
        astro.sunset,
        astro.moonrise,
        astro.moonset,
        astro.moon_phase,
        loc.tz_id,
    )
}
