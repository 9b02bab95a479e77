//! Error types for tool handle execution.

use thiserror::Error;

/// Boxed error source carried by transport and credential failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while composing a context or executing a tool handle.
///
/// Request-template errors are raised before any network effect and carry the
/// offending value (rendered as JSON) together with the location of the
/// template that produced it.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No handler is registered under the handle's declared handler name.
    #[error("Unknown tool handler: {name:?}")]
    UnknownHandler {
        /// The requested handler name.
        name: String,
    },

    /// The request template did not produce a keyed record.
    #[error("Invalid request template: {value}")]
    InvalidRequestTemplate {
        /// JSON rendering of the offending value.
        value: String,
        /// Location of the template that produced the value.
        location: Option<String>,
    },

    /// The request method is not a valid method string.
    #[error("Invalid request method: {value}")]
    InvalidMethod {
        /// JSON rendering of the offending value.
        value: String,
        /// Location of the template that produced the value.
        location: Option<String>,
    },

    /// The request URL is absent, not a string, or not parseable.
    #[error("Invalid request URL: {value}")]
    InvalidUrl {
        /// JSON rendering of the offending value.
        value: String,
        /// Location of the template that produced the value.
        location: Option<String>,
    },

    /// The request headers field is present but not a keyed record.
    #[error("Invalid request headers: {value}")]
    InvalidHeaders {
        /// JSON rendering of the offending value.
        value: String,
        /// Location of the template that produced the value.
        location: Option<String>,
    },

    /// A single request header has a non-string or unencodable value.
    #[error("Invalid request header {name:?}: {value}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// JSON rendering of the offending value.
        value: String,
        /// Location of the template that produced the value.
        location: Option<String>,
    },

    /// A credential cookie name violates the RFC 6265 token grammar.
    #[error("Invalid cookie name: {name:?}")]
    InvalidCookieName {
        /// The rejected cookie name.
        name: String,
    },

    /// A handle descriptor could not be interpreted.
    #[error("Invalid tool handle: {0}")]
    InvalidHandle(String),

    /// Template compilation or transformation failed.
    #[error("Template error: {0}")]
    Template(String),

    /// A content decoder failed to decode a response body.
    #[error("Failed to decode {content_type} content: {message}")]
    Decode {
        /// Content type of the decoder that failed.
        content_type: String,
        /// Decoder failure message.
        message: String,
    },

    /// Reading a byte stream failed.
    #[error("Stream error: {0}")]
    Stream(String),

    /// Credential resolution failed.
    #[error("Credential error: {message}")]
    Credential {
        /// Error message.
        message: String,
        /// The underlying error source.
        #[source]
        source: Option<BoxError>,
    },

    /// The transport failed to execute a request.
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// The underlying error source.
        #[source]
        source: Option<BoxError>,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    /// Creates an [`UnknownHandler`](Self::UnknownHandler).
    pub fn unknown_handler(name: impl Into<String>) -> Self {
        Self::UnknownHandler { name: name.into() }
    }

    /// Creates a [`Template`](Self::Template).
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Creates an [`InvalidHandle`](Self::InvalidHandle).
    pub fn invalid_handle(msg: impl Into<String>) -> Self {
        Self::InvalidHandle(msg.into())
    }

    /// Creates a [`Decode`](Self::Decode).
    pub fn decode(content_type: impl Into<String>, msg: impl ToString) -> Self {
        Self::Decode {
            content_type: content_type.into(),
            message: msg.to_string(),
        }
    }

    /// Creates a [`Stream`](Self::Stream).
    pub fn stream(msg: impl ToString) -> Self {
        Self::Stream(msg.to_string())
    }

    /// Creates a [`Credential`](Self::Credential) without an underlying source.
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a [`Transport`](Self::Transport) wrapping the original error.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns the template location attached to a request-template error.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::InvalidRequestTemplate { location, .. }
            | Self::InvalidMethod { location, .. }
            | Self::InvalidUrl { location, .. }
            | Self::InvalidHeaders { location, .. }
            | Self::InvalidHeader { location, .. } => location.as_deref(),
            _ => None,
        }
    }
}
