//! # Toolhandle Internal Library
//!
//! Re-exports the toolhandle crates for convenience.

/// Protocol-agnostic runtime: context, registries, decoders and dispatch.
pub use toolhandle_core;

/// HTTP protocol handler.
#[cfg(feature = "http")]
pub use toolhandle_http;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use toolhandle_core::{
        Credential, CredentialResolver, HttpCredential, Payload, SecurityObject, ToolContext,
        ToolContextOptions, ToolError, ToolHandle, ToolHandler, ToolValue, create_tool_context,
        execute_tool_handle, init_tool_context,
    };

    #[cfg(feature = "http")]
    pub use toolhandle_http::{
        EnvCredentialResolver, FetchOptions, FetchOptionsSource, HttpContextOptions,
        HttpToolHandler, HttpTransport, create_http_context, init_http_context,
    };
}
