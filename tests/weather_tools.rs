//! End-to-end tool calls against a local stand-in for WeatherAPI.
//!
//! A small axum app bound to an ephemeral port serves canned payloads for
//! each endpoint and records the query strings it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use weather_mcp_server::config::Config;
use weather_mcp_server::mcp::protocol::{Request, RequestId};
use weather_mcp_server::mcp::Dispatcher;
use weather_mcp_server::weather::{build_registry, WeatherClient};

type Seen = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn upstream(
    State(seen): State<Seen>,
    Path(endpoint): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> HttpResponse {
    seen.lock()
        .unwrap()
        .push((endpoint.clone(), query.clone()));

    if query.get("key").map(String::as_str) != Some("testkey") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": 2006, "message": "API key is invalid."}})),
        )
            .into_response();
    }

    let q = query.get("q").cloned().unwrap_or_default();
    let body = match endpoint.as_str() {
        "current.json" => current_payload(),
        "forecast.json" => forecast_payload(),
        "astronomy.json" => astronomy_payload(),
        "search.json" if q == "Atlantis" => json!([]),
        "search.json" => search_payload(),
        "garbage.json" => return "not json".into_response(),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(body).into_response()
}

fn location() -> Value {
    json!({
        "name": "Madrid", "region": "Madrid", "country": "Spain",
        "lat": 40.4, "lon": -3.68, "tz_id": "Europe/Madrid",
        "localtime": "2024-06-21 12:00"
    })
}

fn current_payload() -> Value {
    json!({
        "location": location(),
        "current": {
            "last_updated": "2024-06-21 11:45",
            "temp_c": 28.0, "temp_f": 82.4,
            "condition": {"text": "Sunny", "icon": "", "code": 1000},
            "wind_kph": 11.2, "wind_dir": "SW",
            "pressure_mb": 1016.0, "precip_mm": 0.0,
            "humidity": 30, "cloud": 0, "feelslike_c": 27.1,
            "vis_km": 10.0, "uv": 8.0
        }
    })
}

fn forecast_payload() -> Value {
    json!({
        "location": location(),
        "forecast": {"forecastday": [{
            "date": "2024-06-21",
            "day": {
                "maxtemp_c": 33.0, "mintemp_c": 19.5, "avgtemp_c": 26.2,
                "maxwind_kph": 15.1, "totalprecip_mm": 0.0, "avghumidity": 28,
                "uv": 9.0, "condition": {"text": "Sunny"}
            },
            "astro": {"sunrise": "06:44 AM", "sunset": "09:48 PM", "moon_phase": "Waxing Gibbous"}
        }]}
    })
}

fn astronomy_payload() -> Value {
    json!({
        "location": location(),
        "astronomy": {"astro": {
            "sunrise": "06:44 AM", "sunset": "09:48 PM",
            "moonrise": "08:01 PM", "moonset": "04:12 AM",
            "moon_phase": "Waxing Gibbous"
        }}
    })
}

fn search_payload() -> Value {
    json!([
        {"id": 1, "name": "Madrid", "region": "Madrid", "country": "Spain", "lat": 40.4, "lon": -3.68},
        {"id": 2, "name": "Madrid", "region": "Cundinamarca", "country": "Colombia", "lat": 4.73, "lon": -74.26}
    ])
}

/// Starts the stand-in upstream on an ephemeral port.
async fn spawn_upstream() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/v1/{endpoint}", get(upstream))
        .with_state(Arc::clone(&seen));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn client(api_key: &str, addr: SocketAddr) -> WeatherClient {
    let config = Config::new(api_key).with_base_url(format!("http://{addr}/v1"));
    WeatherClient::new(&config).unwrap()
}

/// Returns a dispatcher wired to a fresh upstream.
async fn setup(api_key: &str) -> (Dispatcher, Seen) {
    let (addr, seen) = spawn_upstream().await;
    let registry = Arc::new(build_registry(Arc::new(client(api_key, addr))).unwrap());
    (Dispatcher::new(registry), seen)
}

async fn call_tool(dispatcher: &Dispatcher, name: &str, arguments: Value) -> Value {
    let request = Request::new(
        Some(RequestId::from(1)),
        "tools/call",
        Some(json!({"name": name, "arguments": arguments})),
    );
    serde_json::to_value(dispatcher.handle(request).await).unwrap()
}

fn text_of(response: &Value) -> &str {
    assert_eq!(response["result"]["content"][0]["type"], "text", "{response}");
    response["result"]["content"][0]["text"].as_str().unwrap()
}

// =============================================================================
// Successful Calls
// =============================================================================

#[tokio::test]
async fn test_current_weather() {
    let (dispatcher, seen) = setup("testkey").await;
    let response = call_tool(&dispatcher, "get_current_weather", json!({"location": "Madrid"})).await;

    let text = text_of(&response);
    assert!(text.contains("Madrid, Madrid, Spain"));
    assert!(text.contains("28.0°C (82.4°F)"));
    assert!(text.contains("Sunny"));

    let seen = seen.lock().unwrap();
    let (endpoint, query) = &seen[0];
    assert_eq!(endpoint, "current.json");
    assert_eq!(query["q"], "Madrid");
    assert_eq!(query["aqi"], "no");
}

#[tokio::test]
async fn test_forecast_passes_clamped_days() {
    let (dispatcher, seen) = setup("testkey").await;
    let response = call_tool(
        &dispatcher,
        "get_forecast",
        json!({"location": "Madrid", "days": 42, "alerts": "yes"}),
    )
    .await;

    let text = text_of(&response);
    assert!(text.contains("WEATHER FORECAST (3 days)"));
    assert!(text.contains("DAY 1 - 2024-06-21"));
    assert!(text.contains("19.5°C - 33.0°C"));

    let seen = seen.lock().unwrap();
    let (_, query) = &seen[0];
    assert_eq!(query["days"], "3");
    assert_eq!(query["alerts"], "yes");
    assert_eq!(query["aqi"], "no");
}

#[tokio::test]
async fn test_search_locations() {
    let (dispatcher, _) = setup("testkey").await;
    let response = call_tool(&dispatcher, "search_locations", json!({"query": "Madrid"})).await;

    let text = text_of(&response);
    assert!(text.contains("Results found: 2"));
    assert!(text.contains("Cundinamarca, Colombia"));
}

#[tokio::test]
async fn test_search_without_matches() {
    let (dispatcher, _) = setup("testkey").await;
    let response = call_tool(&dispatcher, "search_locations", json!({"query": "Atlantis"})).await;

    assert_eq!(
        text_of(&response),
        "❌ No locations found for query: Atlantis"
    );
}

#[tokio::test]
async fn test_astronomy_with_explicit_date() {
    let (dispatcher, seen) = setup("testkey").await;
    let response = call_tool(
        &dispatcher,
        "get_astronomy",
        json!({"location": "Madrid", "date": "2024-06-21"}),
    )
    .await;

    let text = text_of(&response);
    assert!(text.contains("Date: 2024-06-21"));
    assert!(text.contains("Moonrise: 08:01 PM"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].1["dt"], "2024-06-21");
}

#[tokio::test]
async fn test_astronomy_defaults_to_today() {
    let (dispatcher, seen) = setup("testkey").await;
    let response = call_tool(&dispatcher, "get_astronomy", json!({"location": "Madrid"})).await;
    assert!(response.get("error").is_none(), "{response}");

    let seen = seen.lock().unwrap();
    let dt = &seen[0].1["dt"];
    assert!(chrono::NaiveDate::parse_from_str(dt, "%Y-%m-%d").is_ok(), "{dt}");
}

// =============================================================================
// Upstream Failures
// =============================================================================

#[tokio::test]
async fn test_rejected_api_key() {
    let (dispatcher, _) = setup("wrong-key").await;
    let response = call_tool(&dispatcher, "get_current_weather", json!({"location": "Madrid"})).await;

    assert_eq!(response["error"]["code"], 500);
    let message = response["error"]["message"].as_str().unwrap();
    assert!(
        message.starts_with("WeatherAPI error (status 401)"),
        "{message}"
    );
}

#[tokio::test]
async fn test_undecodable_payload() {
    let (addr, _) = spawn_upstream().await;
    let err = client("testkey", addr)
        .get::<Value>("garbage", &[], "unused")
        .await
        .unwrap_err();
    assert!(
        err.to_string().starts_with("error decoding response:"),
        "{err}"
    );
}

#[tokio::test]
async fn test_unknown_endpoint_status() {
    let (addr, _) = spawn_upstream().await;
    let err = client("testkey", addr)
        .get::<Value>("history", &[], "check the request")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "WeatherAPI error (status 404): check the request"
    );
}
