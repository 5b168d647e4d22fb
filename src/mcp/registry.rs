//! The tool registry.
//!
//! A [`ToolRegistry`] is assembled once at startup through a
//! [`ToolRegistryBuilder`] and is read-only afterwards, so it can be shared
//! between transports behind an `Arc` without locking.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{RegistryError, ToolError};
use crate::mcp::arguments::Arguments;

/// A tool definition as published by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A tool implementation.
///
/// Handlers own whatever configuration they need and receive the validated
/// argument map. The returned text is wrapped into the response as-is.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] whose message is surfaced verbatim to the caller.
    async fn call(&self, arguments: &Arguments) -> Result<String, ToolError>;
}

/// A registry entry: descriptor plus handler.
#[derive(Clone)]
pub struct RegisteredTool {
    /// Published definition.
    pub descriptor: ToolDescriptor,
    /// Implementation.
    pub handler: Arc<dyn ToolHandler>,
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Collects tools before the registry is frozen.
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    tools: IndexMap<String, RegisteredTool>,
}

impl ToolRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] if a tool with the same name
    /// was already registered.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<&mut Self, RegistryError> {
        if self.tools.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateTool {
                name: descriptor.name,
            });
        }

        self.tools.insert(
            descriptor.name.clone(),
            RegisteredTool {
                descriptor,
                handler,
            },
        );
        Ok(self)
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

/// Immutable name → tool mapping, ordered by registration.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// Looks a tool up by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Returns all descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values().map(|tool| &tool.descriptor)
    }

    /// Returns all tool names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn call(&self, arguments: &Arguments) -> Result<String, ToolError> {
            Ok(arguments.required_str("text")?.to_string())
        }
    }

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor::new(name, "test tool", json!({"type": "object"}))
    }

    #[test]
    fn keeps_registration_order() {
        let mut builder = ToolRegistry::builder();
        for name in ["zeta", "alpha", "mid"] {
            builder.register(descriptor(name), Arc::new(Echo)).unwrap();
        }
        let registry = builder.build();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert_eq!(
            registry
                .descriptors()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>(),
            ["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut builder = ToolRegistry::builder();
        builder.register(descriptor("echo"), Arc::new(Echo)).unwrap();
        let err = builder
            .register(descriptor("echo"), Arc::new(Echo))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateTool {
                name: "echo".to_string()
            }
        );
    }

    #[test]
    fn lookup_hit_and_miss() {
        let mut builder = ToolRegistry::builder();
        builder.register(descriptor("echo"), Arc::new(Echo)).unwrap();
        let registry = builder.build();

        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("Echo").is_none());
        assert!(!registry.is_empty());
    }

    #[test]
    fn descriptor_serialises_camel_case() {
        let value = serde_json::to_value(descriptor("echo")).unwrap();
        assert_eq!(value["name"], "echo");
        assert_eq!(value["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn handler_is_callable_through_registry() {
        let mut builder = ToolRegistry::builder();
        builder.register(descriptor("echo"), Arc::new(Echo)).unwrap();
        let registry = builder.build();

        let tool = registry.lookup("echo").unwrap();
        let arguments = Arguments::new(json!({"text": "hi"}).as_object().unwrap().clone());
        assert_eq!(tool.handler.call(&arguments).await.unwrap(), "hi");
    }
}
