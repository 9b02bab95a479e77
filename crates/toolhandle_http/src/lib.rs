//! HTTP protocol handler for toolhandle.
//!
//! [`HttpToolHandler`] executes tool handles whose `handler` is `"http"`.
//! The handle's `request` template renders the invocation arguments into a
//! request, and its `responses` templates render the decoded response:
//!
//! ```json
//! {
//!   "name": "get-item",
//!   "handler": "http",
//!   "request": {
//!     "method": "GET",
//!     "url": "https://api.example.com/items/{id}"
//!   },
//!   "responses": {
//!     "2xx": { "$ref": "body.name" },
//!     "404": "missing"
//!   }
//! }
//! ```
//!
//! Use [`create_http_context`] for a context with the handler and the
//! `"http"` security scheme registered, or register
//! [`HttpToolHandler::with_transport`] yourself to supply a custom
//! [`HttpTransport`].

pub mod context;
pub mod credential;
pub mod handle;
pub mod handler;
pub mod request;
pub mod response;
pub mod security;
pub mod transport;

pub use context::{
    FetchOptions, FetchOptionsResolver, FetchOptionsSource, HttpContextOptions,
    create_http_context, fetch_options, init_http_context,
};
pub use credential::apply_http_credentials;
pub use handle::HttpHandle;
pub use handler::{HTTP_HANDLER, HttpToolHandler};
pub use request::{HttpRequest, transform_http_request};
pub use response::{HttpResponse, select_response_template, transform_http_response};
pub use security::{EnvCredentialResolver, HttpAuthMethod, HttpSecurityObject, HttpSecurityScheme};
pub use transport::{HttpTransport, ReqwestTransport};
