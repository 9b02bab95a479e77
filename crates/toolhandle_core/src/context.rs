//! Shared execution context and its composition.
//!
//! A [`ToolContext`] is built once per application scope and then shared,
//! read-only, by every invocation. Contexts are composed in layers:
//! [`init_tool_context`] takes a base context and a set of
//! [`ToolContextOptions`] and returns a new context with the options merged
//! over the base. Registry options are merged per [`Registry::merged`].
//!
//! ```
//! use std::sync::Arc;
//! use toolhandle_core::content::{ContentDecoder, TextDecoder};
//! use toolhandle_core::context::{ToolContextOptions, create_tool_context};
//!
//! let decoder: Arc<dyn ContentDecoder> = Arc::new(TextDecoder::new("application/xml"));
//! let context = create_tool_context(
//!     ToolContextOptions::new().with_content_decoders(vec![decoder]),
//! );
//! assert!(context.content_decoders().contains("application/xml"));
//! assert!(context.content_decoders().contains("application/json"));
//! ```

use crate::content::{ContentDecoder, builtin_decoders};
use crate::credential::CredentialResolver;
use crate::handler::ToolHandler;
use crate::registry::{Registrations, Registry};
use crate::security::SecurityScheme;
use crate::template::{BasicTemplateEngine, TemplateEngine};
use std::sync::Arc;

/// Context for tool handle execution.
///
/// Cloning is cheap: registries hold shared records.
#[derive(Clone)]
pub struct ToolContext {
    content_decoders: Registry<dyn ContentDecoder>,
    tool_handlers: Registry<dyn ToolHandler>,
    security_schemes: Registry<dyn SecurityScheme>,
    credential_resolver: Option<Arc<dyn CredentialResolver>>,
    template_engine: Arc<dyn TemplateEngine>,
    extensions: http::Extensions,
}

impl core::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolContext")
            .field("content_decoders", &self.content_decoders)
            .field("tool_handlers", &self.tool_handlers)
            .field("security_schemes", &self.security_schemes)
            .field("credential_resolver", &self.credential_resolver.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolContext {
    /// Creates a context with the built-in content decoders, no handlers,
    /// no security schemes, no credential resolver, and the
    /// [`BasicTemplateEngine`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            content_decoders: builtin_decoders(),
            tool_handlers: Registry::new(),
            security_schemes: Registry::new(),
            credential_resolver: None,
            template_engine: Arc::new(BasicTemplateEngine),
            extensions: http::Extensions::new(),
        }
    }

    /// Returns the registered content decoders.
    #[must_use]
    pub fn content_decoders(&self) -> &Registry<dyn ContentDecoder> {
        &self.content_decoders
    }

    /// Returns the registered tool handlers.
    #[must_use]
    pub fn tool_handlers(&self) -> &Registry<dyn ToolHandler> {
        &self.tool_handlers
    }

    /// Returns the registered security schemes.
    #[must_use]
    pub fn security_schemes(&self) -> &Registry<dyn SecurityScheme> {
        &self.security_schemes
    }

    /// Returns the credential resolver, if any.
    #[must_use]
    pub fn credential_resolver(&self) -> Option<&Arc<dyn CredentialResolver>> {
        self.credential_resolver.as_ref()
    }

    /// Returns the template engine.
    #[must_use]
    pub fn template_engine(&self) -> &Arc<dyn TemplateEngine> {
        &self.template_engine
    }

    /// Returns handler-specific configuration of type `T`.
    #[must_use]
    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// Returns this context with handler-specific configuration attached.
    ///
    /// Replaces any previous value of the same type.
    #[must_use]
    pub fn with_extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }
}

/// Options for configuring a tool context.
#[derive(Default)]
pub struct ToolContextOptions {
    /// Additional content decoders.
    pub content_decoders: Option<Registrations<dyn ContentDecoder>>,
    /// Additional tool handlers.
    pub tool_handlers: Option<Registrations<dyn ToolHandler>>,
    /// Additional security schemes.
    pub security_schemes: Option<Registrations<dyn SecurityScheme>>,
    /// Credential resolver, replacing any inherited one.
    pub credential_resolver: Option<Arc<dyn CredentialResolver>>,
    /// Template engine, replacing the inherited one.
    pub template_engine: Option<Arc<dyn TemplateEngine>>,
}

impl core::fmt::Debug for ToolContextOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolContextOptions")
            .field("content_decoders", &self.content_decoders)
            .field("tool_handlers", &self.tool_handlers)
            .field("security_schemes", &self.security_schemes)
            .field("credential_resolver", &self.credential_resolver.is_some())
            .field("template_engine", &self.template_engine.is_some())
            .finish()
    }
}

impl ToolContextOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content decoders to merge.
    #[must_use]
    pub fn with_content_decoders(
        mut self,
        decoders: impl Into<Registrations<dyn ContentDecoder>>,
    ) -> Self {
        self.content_decoders = Some(decoders.into());
        self
    }

    /// Sets the tool handlers to merge.
    #[must_use]
    pub fn with_tool_handlers(mut self, handlers: impl Into<Registrations<dyn ToolHandler>>) -> Self {
        self.tool_handlers = Some(handlers.into());
        self
    }

    /// Sets the security schemes to merge.
    #[must_use]
    pub fn with_security_schemes(
        mut self,
        schemes: impl Into<Registrations<dyn SecurityScheme>>,
    ) -> Self {
        self.security_schemes = Some(schemes.into());
        self
    }

    /// Sets the credential resolver.
    #[must_use]
    pub fn with_credential_resolver(mut self, resolver: Arc<dyn CredentialResolver>) -> Self {
        self.credential_resolver = Some(resolver);
        self
    }

    /// Sets the template engine.
    #[must_use]
    pub fn with_template_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.template_engine = Some(engine);
        self
    }
}

/// Returns a new context with `options` merged over `context`.
#[must_use]
pub fn init_tool_context(context: ToolContext, options: ToolContextOptions) -> ToolContext {
    let ToolContextOptions {
        content_decoders,
        tool_handlers,
        security_schemes,
        credential_resolver,
        template_engine,
    } = options;

    ToolContext {
        content_decoders: merge(context.content_decoders, content_decoders),
        tool_handlers: merge(context.tool_handlers, tool_handlers),
        security_schemes: merge(context.security_schemes, security_schemes),
        credential_resolver: credential_resolver.or(context.credential_resolver),
        template_engine: template_engine.unwrap_or(context.template_engine),
        extensions: context.extensions,
    }
}

/// Creates a new context from the defaults of [`ToolContext::new`].
#[must_use]
pub fn create_tool_context(options: ToolContextOptions) -> ToolContext {
    init_tool_context(ToolContext::new(), options)
}

fn merge<T>(existing: Registry<T>, registrations: Option<Registrations<T>>) -> Registry<T>
where
    T: ?Sized + crate::registry::Registrable,
{
    match registrations {
        Some(registrations) => existing.merged(registrations),
        None => existing,
    }
}
