//! Typed view of an HTTP tool handle.

use toolhandle_core::{ToolError, ToolHandle};

static ABSENT_TEMPLATE: serde_json::Value = serde_json::Value::Null;

/// The HTTP-specific fields of a [`ToolHandle`].
///
/// ```json
/// {
///   "name": "get-item",
///   "handler": "http",
///   "request": { "url": "https://api.example.com/items/{id}" },
///   "responses": { "2xx": { "$ref": "body" }, "404": "not found" }
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HttpHandle<'a> {
    /// The underlying handle.
    pub handle: &'a ToolHandle,
    /// Template producing the request form (`method`, `url`, `headers`, `body`).
    pub request: &'a serde_json::Value,
    /// Response templates keyed by status code, status class (`"4xx"`) or `"default"`.
    pub responses: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

impl<'a> HttpHandle<'a> {
    /// Reads the HTTP fields of `handle`.
    ///
    /// A missing `request` field yields a null template, which fails later as
    /// an invalid request template. `response` is accepted as an alias of
    /// `responses`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidHandle`] if `responses` is not an object.
    pub fn from_tool_handle(handle: &'a ToolHandle) -> Result<Self, ToolError> {
        let request = handle.field("request").unwrap_or(&ABSENT_TEMPLATE);
        let responses = match handle.field("responses").or_else(|| handle.field("response")) {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(ToolError::invalid_handle(format!(
                    "responses of {:?} must be an object, got {other}",
                    handle.name
                )));
            }
        };
        Ok(Self {
            handle,
            request,
            responses,
        })
    }

    /// Location of the request template, for diagnostics.
    #[must_use]
    pub fn request_location(&self) -> String {
        format!("{}#/request", self.handle.name)
    }
}
