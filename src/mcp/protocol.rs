//! MCP message types shared by both transports.
//!
//! # Message Shapes
//!
//! - **Request**: `{"id": ..., "method": "...", "params": {...}}`
//! - **Response**: `{"id": ..., "result": ...}` or `{"id": ..., "error": {"code", "message"}}`
//!
//! The line-stream transport additionally tags every response with
//! `"jsonrpc": "2.0"`; the HTTP transport does not.
//!
//! # Identity
//!
//! The `id` of a request is opaque and echoed verbatim. A missing or `null`
//! id is answered with `"id": null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "weather-mcp-server";

/// Tag applied to responses on the line-stream transport.
pub const JSONRPC_VERSION: &str = "2.0";

/// A request identifier: a string or any JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID, kept in its original representation.
    Number(serde_json::Number),
    /// String request ID.
    String(String),
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// An inbound MCP request.
///
/// Any `jsonrpc` member is accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Transport-assigned identifier, echoed into the response.
    #[serde(default)]
    pub id: Option<RequestId>,

    /// The method to invoke.
    pub method: String,

    /// Optional parameters for the method.
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Creates a request.
    #[must_use]
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }
}

/// Protocol error codes.
///
/// Codes mirror HTTP status semantics but are only ever carried inside the
/// response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed message, missing tool name or malformed arguments.
    InvalidRequest,
    /// Unknown method or unknown tool.
    NotFound,
    /// The tool handler failed.
    ToolFailed,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidRequest => 400,
            Self::NotFound => 404,
            Self::ToolFailed => 500,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::NotFound => "not found",
            Self::ToolFailed => "tool execution failed",
        }
    }
}

/// The `error` member of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,
}

impl ErrorData {
    /// Creates a new error from an error code.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.default_message().to_string(),
        }
    }

    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }
}

/// Either the result or the error of a response; never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Successful result payload.
    Result(Value),
    /// Error details.
    Error(ErrorData),
}

/// An outbound MCP response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// `"2.0"` on the line-stream transport, absent on HTTP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<&'static str>,

    /// The request ID this response corresponds to.
    pub id: Option<RequestId>,

    /// Result or error.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    /// Creates a success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: None,
            id,
            outcome: Outcome::Result(result),
        }
    }

    /// Creates an error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // ErrorData contains String
    pub fn error(id: Option<RequestId>, error: ErrorData) -> Self {
        Self {
            jsonrpc: None,
            id,
            outcome: Outcome::Error(error),
        }
    }

    /// Creates an error response from a code and message.
    #[must_use]
    pub fn failure(id: Option<RequestId>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::error(id, ErrorData::with_message(code, message))
    }

    /// Tags the response for the line-stream transport.
    #[must_use]
    pub fn with_jsonrpc_tag(mut self) -> Self {
        self.jsonrpc = Some(JSONRPC_VERSION);
        self
    }

    /// Returns the result payload, if this is a success response.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    /// Returns the error details, if this is an error response.
    #[must_use]
    pub const fn error_data(&self) -> Option<&ErrorData> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(error) => Some(error),
        }
    }

    /// Returns `true` if this is an error response.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

/// Decodes one raw message into a [`Request`].
///
/// On failure, returns the error response to send back. Its `id` is taken
/// from the message when the JSON itself was well formed and carried a
/// usable `id`, and is `None` otherwise.
///
/// # Errors
///
/// Returns an error response if the bytes are not JSON or are not a request
/// object.
pub fn decode_request(raw: impl AsRef<[u8]>) -> Result<Request, Response> {
    let value: Value = serde_json::from_slice(raw.as_ref()).map_err(|_| malformed(None))?;

    let id = value
        .get("id")
        .and_then(|v| RequestId::deserialize(v).ok());

    serde_json::from_value(value).map_err(|_| malformed(id))
}

fn malformed(id: Option<RequestId>) -> Response {
    Response::failure(id, ErrorCode::InvalidRequest, "invalid request JSON")
}
