//! Model Context Protocol (MCP) server implementation.
//!
//! One transport-agnostic [`Dispatcher`] serves two transports: a line
//! stream (stdin/stdout) and HTTP. Each transport only frames bytes into
//! requests and responses back into bytes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │   ┌─────────────┐                                            │
//! │   │ Line stream │──┐   ┌────────────┐    ┌──────────────┐    │
//! │   │   (stdio)   │  ├──▶│ Dispatcher │───▶│ ToolRegistry │    │
//! │   └─────────────┘  │   │  (router)  │    │  (handlers)  │    │
//! │   ┌─────────────┐  │   └────────────┘    └──────────────┘    │
//! │   │    HTTP     │──┘         │                               │
//! │   │   (axum)    │            ▼                               │
//! │   └─────────────┘   Request ──▶ Response {id, result|error}  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod arguments;
pub mod dispatcher;
pub mod http;
pub mod protocol;
pub mod registry;
pub mod stdio;
pub mod transport;

pub use arguments::{extract_tool_call, Arguments, ToolCall};
pub use dispatcher::Dispatcher;
pub use http::{build_router, HttpServer};
pub use protocol::{decode_request, ErrorCode, Request, RequestId, Response, MCP_PROTOCOL_VERSION};
pub use registry::{ToolDescriptor, ToolHandler, ToolRegistry, ToolRegistryBuilder};
pub use stdio::StdioServer;
pub use transport::LineTransport;
