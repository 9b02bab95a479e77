//! Protocol-agnostic runtime for declarative tool handles.
//!
//! A [`ToolHandle`] describes an external operation as templates over
//! caller-supplied arguments. Executing a handle dispatches to the
//! [`ToolHandler`] registered under the handle's declared handler name; the
//! handler builds a concrete request with the context's [`TemplateEngine`],
//! applies credentials from the [`CredentialResolver`], executes it, decodes
//! the result with a [`ContentDecoder`], and renders the final value.
//!
//! ```
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use toolhandle_core::{
//!     ToolContext, ToolContextOptions, ToolError, ToolHandle, ToolHandler, ToolValue,
//!     execute_tool_handle, init_tool_context,
//! };
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ToolHandler for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn execute(
//!         &self,
//!         _context: &ToolContext,
//!         _handle: &ToolHandle,
//!         args: ToolValue,
//!     ) -> Result<ToolValue, ToolError> {
//!         Ok(args)
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let handler: Arc<dyn ToolHandler> = Arc::new(Echo);
//! let context = init_tool_context(
//!     ToolContext::new(),
//!     ToolContextOptions::new().with_tool_handlers(vec![handler]),
//! );
//! let handle = ToolHandle::new("say", "echo");
//! let result = execute_tool_handle(&context, &handle, ToolValue::from("hi")).await?;
//! assert_eq!(result, ToolValue::from("hi"));
//! # Ok::<(), ToolError>(())
//! # }).unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`ToolContext`]: shared, read-only registries and configuration
//! - [`ToolHandle`] / [`execute_tool_handle`]: descriptors and dispatch
//! - [`ToolHandler`]: pluggable protocol handlers
//! - [`ContentDecoder`] / [`decode_content`]: media-type driven decoding
//! - [`Credential`] / [`CredentialResolver`]: per-invocation credentials
//! - [`TemplateEngine`] / [`Transformer`]: template compilation contract

pub mod content;
pub mod context;
pub mod credential;
pub mod error;
pub mod handle;
pub mod handler;
pub mod registry;
pub mod security;
pub mod stream;
pub mod template;
pub mod value;

// Re-export core types at crate root.
pub use content::{ContentDecoder, MediaType, content_decoder, decode_content};
pub use context::{ToolContext, ToolContextOptions, create_tool_context, init_tool_context};
pub use credential::{Credential, CredentialObject, CredentialResolver, HttpCredential};
pub use error::ToolError;
pub use handle::{ToolHandle, execute_tool_handle};
pub use handler::ToolHandler;
pub use registry::{Registrable, Registrations, Registry};
pub use security::{SecurityObject, SecurityScheme};
pub use stream::ByteStream;
pub use template::{BasicTemplateEngine, TemplateEngine, Transformer};
pub use value::{Payload, ToolMap, ToolValue};
