//! `search_locations` tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::ToolError;
use crate::mcp::arguments::Arguments;
use crate::mcp::registry::{ToolDescriptor, ToolHandler};
use crate::weather::client::WeatherClient;
use crate::weather::models::SearchResult;

/// Tool name.
pub const NAME: &str = "search_locations";

/// Published definition.
#[must_use]
pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        NAME,
        "Search locations by name to get detailed information",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "City or place name to search for"
                }
            },
            "required": ["query"]
        }),
    )
}

/// Handler for [`NAME`].
#[derive(Debug, Clone)]
pub struct SearchLocations {
    client: Arc<WeatherClient>,
}

impl SearchLocations {
    /// Creates the handler.
    #[must_use]
    pub const fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for SearchLocations {
    async fn call(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let query = arguments.required_str("query")?;

        let results: Vec<SearchResult> = self
            .client
            .get("search", &[("q", query)], "check the query and API key")
            .await?;

        Ok(format_search(query, &results))
    }
}

/// Renders `search.json` matches.
#[must_use]
pub fn format_search(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("❌ No locations found for query: {query}");
    }

    let mut out = format!(
        "🔍 LOCATION SEARCH\n\
         📝 Query: \"{query}\"\n\
         📍 Results found: {}\n\n",
        results.len()
    );

    for (i, location) in results.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n   \
             📍 Region: {}, {}\n   \
             🌐 Coordinates: {:.2}, {:.2}\n   \
             🔗 ID: {}\n\n",
            i + 1,
            location.name,
            location.region,
            location.country,
            location.lat,
            location.lon,
            location.id,
        ));
    }

    out.push_str("💡 Tip: any of these names can be used with the other weather tools.");
    out
}
