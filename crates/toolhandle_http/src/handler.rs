//! The HTTP protocol handler.

use crate::context::fetch_options;
use crate::credential::apply_http_credentials;
use crate::handle::HttpHandle;
use crate::request::transform_http_request;
use crate::response::transform_http_response;
use crate::transport::{HttpTransport, ReqwestTransport};
use async_trait::async_trait;
use std::sync::Arc;
use toolhandle_core::{Credential, ToolContext, ToolError, ToolHandle, ToolHandler, ToolValue};

/// Name under which [`HttpToolHandler`] is registered.
pub const HTTP_HANDLER: &str = "http";

/// Executes tool handles over HTTP.
///
/// Each invocation runs, in order:
///
/// 1. request construction from the handle's `request` template
/// 2. credential resolution and application (`"http"` credentials only)
/// 3. fetch-options resolution
/// 4. the transport call
/// 5. body decoding by `Content-Type`
/// 6. response-template selection and rendering
///
/// Any failure in steps 1 to 3 happens before the transport is called.
#[derive(Clone)]
pub struct HttpToolHandler {
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for HttpToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpToolHandler").finish_non_exhaustive()
    }
}

impl Default for HttpToolHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpToolHandler {
    /// Creates a handler using a [`ReqwestTransport`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Creates a handler using `transport`.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Returns a default handler as a shared registry entry.
    #[must_use]
    pub fn shared() -> Arc<dyn ToolHandler> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl ToolHandler for HttpToolHandler {
    fn name(&self) -> &str {
        HTTP_HANDLER
    }

    async fn execute(
        &self,
        context: &ToolContext,
        handle: &ToolHandle,
        args: ToolValue,
    ) -> Result<ToolValue, ToolError> {
        let http = HttpHandle::from_tool_handle(handle)?;

        let mut request = transform_http_request(context, &http, args).await?;
        tracing::debug!(
            tool = %handle.name,
            method = %request.method,
            url = %request.url,
            "built http request"
        );

        if let Some(resolver) = context.credential_resolver() {
            match resolver.resolve(handle, context).await? {
                Some(Credential::Http(credential)) => {
                    request = apply_http_credentials(&request, &credential)?;
                    tracing::debug!(tool = %handle.name, scheme = "http", "applied credentials");
                }
                Some(other) => {
                    tracing::trace!(
                        tool = %handle.name,
                        scheme = other.scheme(),
                        "ignoring credentials for unsupported scheme"
                    );
                }
                None => {}
            }
        }

        let options = match fetch_options(context) {
            Some(source) => source.resolve(&request, handle).await?,
            None => None,
        };

        let response = self.transport.send(request, options).await?;
        tracing::debug!(
            tool = %handle.name,
            status = response.status,
            "received http response"
        );

        transform_http_response(context, http.responses, response).await
    }
}
