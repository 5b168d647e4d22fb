//! Transport-agnostic request routing.
//!
//! The protocol is stateless: every request is routed on its `method` alone
//! and answered with exactly one [`Response`].
//!
//! | method       | outcome                                          |
//! |--------------|--------------------------------------------------|
//! | `initialize` | protocol version, capabilities, server info      |
//! | `tools/list` | registered tool descriptors, registration order  |
//! | `tools/call` | handler output as text content, or an error      |
//! | other        | `method not found` error                         |

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::mcp::arguments::extract_tool_call;
use crate::mcp::protocol::{
    ErrorCode, Request, RequestId, Response, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::registry::{ToolDescriptor, ToolRegistry};

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities. The tool list never changes at runtime.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {}

/// Server information for the initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a successful tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// Routes decoded requests to protocol metadata or registered tools.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over a frozen registry.
    #[must_use]
    pub const fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this dispatcher routes to.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one request.
    pub async fn handle(&self, request: Request) -> Response {
        let Request { id, method, params } = request;
        debug!(method = %method, id = ?id, "Dispatching request");

        match method.as_str() {
            "initialize" => Response::success(id, Self::initialize_result()),
            "tools/list" => Response::success(id, self.tools_list_result()),
            "tools/call" => self.handle_tools_call(id, params.as_ref()).await,
            _ => {
                debug!(method = %method, "Unknown method");
                Response::failure(
                    id,
                    ErrorCode::NotFound,
                    format!("method not found: {method}"),
                )
            }
        }
    }

    /// Static payload returned by `initialize`.
    #[must_use]
    pub fn initialize_result() -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        })
    }

    /// Payload returned by `tools/list` (and `GET /tools`).
    #[must_use]
    pub fn tools_list_result(&self) -> Value {
        let tools: Vec<&ToolDescriptor> = self.registry.descriptors().collect();
        json!({ "tools": tools })
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(&self, id: Option<RequestId>, params: Option<&Value>) -> Response {
        let call = match extract_tool_call(params) {
            Ok(call) => call,
            Err(e) => {
                debug!(error = %e, "Rejected tool call");
                return Response::failure(id, ErrorCode::InvalidRequest, e.to_string());
            }
        };

        let Some(tool) = self.registry.lookup(&call.name) else {
            return Response::failure(
                id,
                ErrorCode::NotFound,
                format!("tool not found: {}", call.name),
            );
        };

        debug!(tool = %call.name, "Calling tool");
        let text = match tool.handler.call(&call.arguments).await {
            Ok(text) => text,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                return Response::failure(id, ErrorCode::ToolFailed, e.to_string());
            }
        };

        match serde_json::to_value(ToolCallResult::text(text)) {
            Ok(result) => Response::success(id, result),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialise tool call result");
                Response::failure(
                    id,
                    ErrorCode::ToolFailed,
                    "internal error: failed to serialise result",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::ToolError;
    use crate::mcp::arguments::Arguments;
    use crate::mcp::registry::ToolHandler;

    struct Shout;

    #[async_trait]
    impl ToolHandler for Shout {
        async fn call(&self, arguments: &Arguments) -> Result<String, ToolError> {
            Ok(arguments.required_str("text")?.to_uppercase())
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut builder = ToolRegistry::builder();
        builder
            .register(
                ToolDescriptor::new("shout", "Upper-cases text", json!({"type": "object"})),
                Arc::new(Shout),
            )
            .unwrap();
        Dispatcher::new(Arc::new(builder.build()))
    }

    fn call(name: &str, arguments: Value) -> Request {
        Request::new(
            Some(RequestId::from(9)),
            "tools/call",
            Some(json!({"name": name, "arguments": arguments})),
        )
    }

    #[tokio::test]
    async fn initialize_returns_static_metadata() {
        let response = dispatcher()
            .handle(Request::new(Some(RequestId::from(1)), "initialize", None))
            .await;
        let result = response.result().unwrap();
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn tools_list_is_idempotent() {
        let dispatcher = dispatcher();
        let first = dispatcher
            .handle(Request::new(None, "tools/list", None))
            .await;
        let second = dispatcher
            .handle(Request::new(None, "tools/list", None))
            .await;
        assert_eq!(first, second);
        assert_eq!(first.result().unwrap()["tools"][0]["name"], "shout");
    }

    #[tokio::test]
    async fn tool_call_wraps_text() {
        let response = dispatcher().handle(call("shout", json!({"text": "hi"}))).await;
        assert_eq!(response.id, Some(RequestId::from(9)));
        let result = response.result().unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "HI");
    }

    #[tokio::test]
    async fn handler_error_is_propagated_verbatim() {
        let response = dispatcher().handle(call("shout", json!({}))).await;
        let error = response.error_data().unwrap();
        assert_eq!(error.code, 500);
        assert_eq!(error.message, "parameter 'text' is required");
        assert!(response.result().is_none());
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let response = dispatcher().handle(call("bogus", json!({}))).await;
        let error = response.error_data().unwrap();
        assert_eq!(error.code, 404);
        assert_eq!(error.message, "tool not found: bogus");
    }

    #[tokio::test]
    async fn validation_error_precedes_lookup() {
        let response = dispatcher()
            .handle(Request::new(
                Some(RequestId::from(3)),
                "tools/call",
                Some(json!({"name": "bogus"})),
            ))
            .await;
        let error = response.error_data().unwrap();
        assert_eq!(error.code, 400);
        assert_eq!(error.message, "invalid arguments");
    }

    #[tokio::test]
    async fn unknown_method_is_not_found() {
        let response = dispatcher()
            .handle(Request::new(Some(RequestId::from("m")), "resources/list", None))
            .await;
        assert_eq!(response.id, Some(RequestId::from("m")));
        let error = response.error_data().unwrap();
        assert_eq!(error.code, 404);
        assert_eq!(error.message, "method not found: resources/list");
    }

    #[test]
    fn tool_call_result_text() {
        let result = ToolCallResult::text("Hello, world!");
        assert_eq!(result.content.len(), 1);

        match &result.content[0] {
            ToolContent::Text { text } => assert_eq!(text, "Hello, world!"),
        }
    }
}
