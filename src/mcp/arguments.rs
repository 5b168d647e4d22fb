//! Tool-call argument extraction.
//!
//! [`extract_tool_call`] only checks the shape needed to dispatch: `params`
//! is an object, `name` is a string and `arguments` is an object. Field-level
//! checks belong to each tool handler, which reads fields through the typed
//! accessors on [`Arguments`].

use serde_json::{Map, Value};

use crate::error::{ToolError, ValidationError};

/// A validated `tools/call` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    pub arguments: Arguments,
}

/// Extracts the tool name and argument map from `tools/call` params.
///
/// # Errors
///
/// Returns a [`ValidationError`] when `params` is not an object, `name` is
/// missing or not a string, or `arguments` is missing or not an object,
/// checked in that order.
pub fn extract_tool_call(params: Option<&Value>) -> Result<ToolCall, ValidationError> {
    let Some(Value::Object(params)) = params else {
        return Err(ValidationError::InvalidArguments);
    };

    let Some(Value::String(name)) = params.get("name") else {
        return Err(ValidationError::MissingToolName);
    };

    let Some(Value::Object(arguments)) = params.get("arguments") else {
        return Err(ValidationError::InvalidArguments);
    };

    Ok(ToolCall {
        name: name.clone(),
        arguments: Arguments::new(arguments.clone()),
    })
}

/// An untyped argument map with typed per-field accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Wraps an argument map.
    #[must_use]
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reads a required, non-empty string field.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::MissingArgument`] if the field is absent, not a
    /// string, or empty.
    pub fn required_str(&self, key: &'static str) -> Result<&str, ToolError> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Err(ToolError::MissingArgument(key)),
        }
    }

    /// Reads an optional string field. Non-string values are ignored.
    #[must_use]
    pub fn optional_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Reads an optional string field, falling back to `default`.
    #[must_use]
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.optional_str(key).unwrap_or(default)
    }

    /// Reads an optional numeric field. Non-numeric values are ignored.
    #[must_use]
    pub fn optional_number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self::new(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => Arguments::new(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn extract_valid_call() {
        let params = json!({"name": "get_forecast", "arguments": {"location": "Paris"}});
        let call = extract_tool_call(Some(&params)).unwrap();
        assert_eq!(call.name, "get_forecast");
        assert_eq!(call.arguments.optional_str("location"), Some("Paris"));
    }

    #[test]
    fn params_must_be_object() {
        assert_eq!(
            extract_tool_call(None),
            Err(ValidationError::InvalidArguments)
        );
        assert_eq!(
            extract_tool_call(Some(&json!("get_forecast"))),
            Err(ValidationError::InvalidArguments)
        );
    }

    #[test]
    fn name_is_checked_before_arguments() {
        let params = json!({"arguments": "nope"});
        assert_eq!(
            extract_tool_call(Some(&params)),
            Err(ValidationError::MissingToolName)
        );

        let params = json!({"name": 5, "arguments": {}});
        assert_eq!(
            extract_tool_call(Some(&params)),
            Err(ValidationError::MissingToolName)
        );
    }

    #[test]
    fn arguments_must_be_object() {
        for arguments in [json!(null), json!([]), json!("x"), json!(3)] {
            let params = json!({"name": "bogus", "arguments": arguments});
            assert_eq!(
                extract_tool_call(Some(&params)),
                Err(ValidationError::InvalidArguments)
            );
        }

        let params = json!({"name": "bogus"});
        assert_eq!(
            extract_tool_call(Some(&params)),
            Err(ValidationError::InvalidArguments)
        );
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::InvalidArguments.to_string(),
            "invalid arguments"
        );
        assert_eq!(
            ValidationError::MissingToolName.to_string(),
            "tool name required"
        );
    }

    #[test]
    fn required_str_rejects_missing_empty_and_non_string() {
        let arguments = args(json!({"empty": "", "number": 4, "ok": "yes"}));
        assert_eq!(arguments.required_str("ok").unwrap(), "yes");
        for key in ["empty", "number", "absent"] {
            let err = arguments.required_str(key).unwrap_err();
            assert_eq!(err.to_string(), format!("parameter '{key}' is required"));
        }
    }

    #[test]
    fn optional_accessors() {
        let arguments = args(json!({"aqi": "yes", "days": 5, "flag": true}));
        assert_eq!(arguments.str_or("aqi", "no"), "yes");
        assert_eq!(arguments.str_or("alerts", "no"), "no");
        assert_eq!(arguments.str_or("flag", "no"), "no");
        assert_eq!(arguments.optional_number("days"), Some(5.0));
        assert_eq!(arguments.optional_number("aqi"), None);
        assert!(arguments.get("flag").is_some());
    }
}
