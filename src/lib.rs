//! weather-mcp-server: MCP server exposing WeatherAPI lookups as tools
//!
//! One request dispatcher is reachable over two transports: newline-delimited
//! JSON on stdin/stdout and JSON bodies over HTTP. Both speak the same
//! `{id, method, params}` → `{id, result | error}` envelope.
//!
//! # Tools
//!
//! - `get_current_weather` — current conditions, optionally with air quality
//! - `get_forecast` — 1 to 10 day forecast
//! - `search_locations` — place name lookup
//! - `get_astronomy` — sun and moon times for a date
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`mcp`] — Protocol, dispatcher and transports
//! - [`shutdown`] — Signal handling
//! - [`weather`] — WeatherAPI client and tool handlers

pub mod config;
pub mod error;
pub mod mcp;
pub mod shutdown;
pub mod weather;
