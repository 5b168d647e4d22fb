//! WeatherAPI-backed tools.
//!
//! Each tool module exposes its `NAME`, a `descriptor()` for `tools/list`,
//! a handler type implementing [`ToolHandler`](crate::mcp::ToolHandler),
//! and a pure formatter that turns the upstream payload into the text
//! returned to the client.
//!
//! | Tool                  | Endpoint          |
//! |-----------------------|-------------------|
//! | `get_current_weather` | `current.json`    |
//! | `get_forecast`        | `forecast.json`   |
//! | `search_locations`    | `search.json`     |
//! | `get_astronomy`       | `astronomy.json`  |

pub mod astronomy;
pub mod client;
pub mod current;
pub mod forecast;
pub mod models;
pub mod search;

use std::sync::Arc;

pub use client::WeatherClient;

use crate::error::RegistryError;
use crate::mcp::registry::ToolRegistry;

/// Shared schema text for `location` arguments.
pub(crate) const LOCATION_DESCRIPTION: &str =
    "City name, coordinates (lat,lon), postal code, or IP address";

/// Builds the registry holding every weather tool, in publication order.
///
/// # Errors
///
/// Returns an error if two tools share a name.
pub fn build_registry(client: Arc<WeatherClient>) -> Result<ToolRegistry, RegistryError> {
    let mut builder = ToolRegistry::builder();
    builder
        .register(
            current::descriptor(),
            Arc::new(current::CurrentWeather::new(Arc::clone(&client))),
        )?
        .register(
            forecast::descriptor(),
            Arc::new(forecast::Forecast::new(Arc::clone(&client))),
        )?
        .register(
            search::descriptor(),
            Arc::new(search::SearchLocations::new(Arc::clone(&client))),
        )?
        .register(
            astronomy::descriptor(),
            Arc::new(astronomy::Astronomy::new(client)),
        )?;
    Ok(builder.build())
}
