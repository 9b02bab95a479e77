//! HTTP-specific context configuration.
//!
//! Fetch options are attached to a [`ToolContext`] as an extension, so the
//! core context stays protocol-agnostic.

use crate::request::HttpRequest;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;
use toolhandle_core::{ToolContext, ToolContextOptions, ToolError, ToolHandle, init_tool_context};

/// Extra options forwarded to the transport with each request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Total request timeout.
    pub timeout: Option<Duration>,
    /// Headers that replace same-named request headers.
    pub headers: IndexMap<String, String>,
}

impl FetchOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds an override header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Computes fetch options per request.
#[async_trait]
pub trait FetchOptionsResolver: Send + Sync + 'static {
    /// Returns the options for `request`, or `None` for no extra options.
    async fn resolve(
        &self,
        request: &HttpRequest,
        handle: &ToolHandle,
    ) -> Result<Option<FetchOptions>, ToolError>;
}

/// Where fetch options come from.
#[derive(Clone)]
pub enum FetchOptionsSource {
    /// The same options for every request.
    Static(FetchOptions),
    /// Options computed per request.
    Dynamic(Arc<dyn FetchOptionsResolver>),
}

impl std::fmt::Debug for FetchOptionsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(options) => f.debug_tuple("Static").field(options).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<FetchOptions> for FetchOptionsSource {
    fn from(options: FetchOptions) -> Self {
        Self::Static(options)
    }
}

impl From<Arc<dyn FetchOptionsResolver>> for FetchOptionsSource {
    fn from(resolver: Arc<dyn FetchOptionsResolver>) -> Self {
        Self::Dynamic(resolver)
    }
}

impl FetchOptionsSource {
    /// Resolves the options for `request`.
    ///
    /// # Errors
    ///
    /// Propagates errors from a dynamic resolver.
    pub async fn resolve(
        &self,
        request: &HttpRequest,
        handle: &ToolHandle,
    ) -> Result<Option<FetchOptions>, ToolError> {
        match self {
            Self::Static(options) => Ok(Some(options.clone())),
            Self::Dynamic(resolver) => resolver.resolve(request, handle).await,
        }
    }
}

/// Options for configuring an HTTP tool context.
#[derive(Debug, Default)]
pub struct HttpContextOptions {
    /// Protocol-agnostic options.
    pub tool: ToolContextOptions,
    /// Fetch options, replacing any inherited source.
    pub fetch_options: Option<FetchOptionsSource>,
}

impl HttpContextOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protocol-agnostic options.
    #[must_use]
    pub fn with_tool_options(mut self, tool: ToolContextOptions) -> Self {
        self.tool = tool;
        self
    }

    /// Sets the fetch options source.
    #[must_use]
    pub fn with_fetch_options(mut self, source: impl Into<FetchOptionsSource>) -> Self {
        self.fetch_options = Some(source.into());
        self
    }
}

impl From<ToolContextOptions> for HttpContextOptions {
    fn from(tool: ToolContextOptions) -> Self {
        Self {
            tool,
            fetch_options: None,
        }
    }
}

/// Returns a new context with `options` merged over `context`.
#[must_use]
pub fn init_http_context(context: ToolContext, options: HttpContextOptions) -> ToolContext {
    let HttpContextOptions {
        tool,
        fetch_options,
    } = options;
    let context = init_tool_context(context, tool);
    match fetch_options {
        Some(source) => context.with_extension(source),
        None => context,
    }
}

/// Creates a context with the HTTP handler and security scheme registered.
#[must_use]
pub fn create_http_context(options: HttpContextOptions) -> ToolContext {
    let base = init_tool_context(
        ToolContext::new(),
        ToolContextOptions::new()
            .with_tool_handlers(vec![crate::handler::HttpToolHandler::shared()])
            .with_security_schemes(vec![crate::security::HttpSecurityScheme::shared()]),
    );
    init_http_context(base, options)
}

/// Returns the fetch options source attached to `context`.
#[must_use]
pub fn fetch_options(context: &ToolContext) -> Option<&FetchOptionsSource> {
    context.extension::<FetchOptionsSource>()
}
