//! Tool handle descriptors and dispatch.
//!
//! A [`ToolHandle`] is configuration data: it names an operation, describes
//! its parameters, and declares which [`ToolHandler`](crate::handler::ToolHandler)
//! executes it. Handler-specific fields (such as the HTTP `request` template)
//! are kept in [`ToolHandle::extra`] and interpreted by the handler.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::security::SecurityObject;
use crate::value::ToolValue;
use serde::{Deserialize, Serialize};

/// An immutable descriptor of one externally invocable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolHandle {
    /// The name of the tool.
    pub name: String,
    /// A description of the tool's purpose and behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the tool's parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
    /// Security scheme configuration for the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityObject>,
    /// Name of the handler that executes the tool.
    #[serde(alias = "protocol")]
    pub handler: String,
    /// Handler-specific fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ToolHandle {
    /// Creates a handle with the given name and handler.
    pub fn new(name: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
            security: None,
            handler: handler.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the parameter schema.
    #[must_use]
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Sets the security configuration.
    #[must_use]
    pub fn with_security(mut self, security: SecurityObject) -> Self {
        self.security = Some(security);
        self
    }

    /// Sets a handler-specific field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Returns a handler-specific field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// Parses a handle from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ToolError> {
        serde_json::from_value(value).map_err(|err| ToolError::invalid_handle(err.to_string()))
    }

    /// Parses a handle from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ToolError> {
        serde_json::from_str(json).map_err(|err| ToolError::invalid_handle(err.to_string()))
    }
}

/// Executes `handle` with the handler registered under its declared name.
///
/// # Errors
///
/// Returns [`ToolError::UnknownHandler`] when no handler is registered under
/// `handle.handler`; otherwise returns the handler's result unchanged.
pub async fn execute_tool_handle(
    context: &ToolContext,
    handle: &ToolHandle,
    args: ToolValue,
) -> Result<ToolValue, ToolError> {
    let Some(handler) = context.tool_handlers().get(&handle.handler) else {
        tracing::warn!(
            tool = %handle.name,
            handler = %handle.handler,
            "no handler registered for tool handle"
        );
        return Err(ToolError::unknown_handler(&handle.handler));
    };

    tracing::debug!(tool = %handle.name, handler = %handle.handler, "executing tool handle");
    handler.execute(context, handle, args).await
}
