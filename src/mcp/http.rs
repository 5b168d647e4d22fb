//! HTTP transport.
//!
//! Routes:
//!
//! - `POST /`: one request body in, one response body out
//! - `GET /tools`: the tool list without the response envelope
//! - `GET /health`: liveness
//!
//! Protocol errors are always returned with status `200`; the envelope
//! carries the error. CORS is open to any origin for GET, POST and OPTIONS
//! with any header, since the service holds no per-user credentials.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::Method,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::error::HttpServerError;
use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::protocol::{decode_request, Response};

/// Service name reported by the health endpoint.
pub const HEALTH_SERVICE_NAME: &str = "Weather MCP Server";

/// Builds the axum `Router` with all routes and middleware.
pub fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", post(handle_mcp))
        .route("/tools", get(handle_tools))
        .route("/health", get(handle_health))
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(dispatcher)
}

async fn handle_mcp(State(dispatcher): State<Arc<Dispatcher>>, body: Bytes) -> Json<Response> {
    let response = match decode_request(&body) {
        Ok(request) => dispatcher.handle(request).await,
        Err(response) => {
            debug!(id = ?response.id, "Malformed request body");
            response
        }
    };
    Json(response)
}

async fn handle_tools(State(dispatcher): State<Arc<Dispatcher>>) -> Json<Value> {
    Json(dispatcher.tools_list_result())
}

async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": HEALTH_SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn log_requests(req: Request, next: Next) -> impl IntoResponse {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let res = next.run(req).await;
    debug!(%method, %path, status = res.status().as_u16(), "HTTP request");
    res
}

/// Axum-based HTTP server for the MCP transport.
pub struct HttpServer {
    addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    /// Creates a server listening on all interfaces at `port`.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>, port: u16) -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            dispatcher,
        }
    }

    /// Returns the address the server will bind.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves requests until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> Result<(), HttpServerError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| HttpServerError::Bind {
                addr: self.addr.to_string(),
                source: e,
            })?;

        info!(addr = %self.addr, "HTTP server listening");

        axum::serve(listener, build_router(self.dispatcher))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(HttpServerError::Serve)
    }
}
