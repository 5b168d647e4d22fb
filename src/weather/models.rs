//! WeatherAPI payload models.
//!
//! Only the fields the tools render are modelled. Missing fields decode to
//! their defaults.

use serde::Deserialize;

/// Location block shared by most endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub tz_id: String,
    pub localtime: String,
}

/// Weather condition summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: i64,
}

/// Air quality readings, present when requested with `aqi=yes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AirQuality {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: i64,
    #[serde(rename = "gb-defra-index")]
    pub gb_defra_index: i64,
}

/// Current conditions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Current {
    pub last_updated: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub humidity: f64,
    pub cloud: f64,
    pub feelslike_c: f64,
    pub vis_km: f64,
    pub uv: f64,
    pub air_quality: Option<AirQuality>,
}

/// `current.json` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentWeatherResponse {
    pub location: Location,
    pub current: Current,
}

/// Daily aggregate within a forecast.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Day {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub avgtemp_c: f64,
    pub maxwind_kph: f64,
    pub totalprecip_mm: f64,
    pub avghumidity: f64,
    pub uv: f64,
    pub condition: Condition,
}

/// Sun and moon times.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
}

/// One day of a forecast.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForecastDay {
    pub date: String,
    pub day: Day,
    pub astro: Astro,
}

/// Forecast container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

/// `forecast.json` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForecastResponse {
    pub location: Location,
    pub forecast: Forecast,
}

/// One `search.json` match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub id: i64,
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub url: String,
}

/// Astronomy container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Astronomy {
    pub astro: Astro,
}

/// `astronomy.json` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AstronomyResponse {
    pub location: Location,
    pub astronomy: Astronomy,
}
