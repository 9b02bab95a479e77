//! HTTP transports.

use crate::context::FetchOptions;
use crate::request::{HttpRequest, header_pair};
use crate::response::HttpResponse;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Method, StatusCode};
use toolhandle_core::ToolError;

/// Executes HTTP requests.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends `request` with the resolved `options`.
    async fn send(
        &self,
        request: HttpRequest,
        options: Option<FetchOptions>,
    ) -> Result<HttpResponse, ToolError>;
}

/// Transport backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport using `client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
        options: Option<FetchOptions>,
    ) -> Result<HttpResponse, ToolError> {
        let HttpRequest {
            method,
            url,
            mut headers,
            body,
        } = request;

        let mut timeout = None;
        if let Some(options) = options {
            for (name, value) in &options.headers {
                let (name, value) = header_pair(name, value, None)?;
                headers.insert(name, value);
            }
            timeout = options.timeout;
        }

        let bodiless_method = method == Method::HEAD;
        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(ToolError::transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = if bodiless_method || is_null_body_status(status) {
            None
        } else {
            Some(
                response
                    .bytes_stream()
                    .map_err(ToolError::transport)
                    .boxed(),
            )
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Statuses whose responses never carry a body.
fn is_null_body_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 101 | 103 | 204 | 205 | 304)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_body_statuses() {
        for code in [101, 103, 204, 205, 304] {
            assert!(is_null_body_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }
        for code in [100, 200, 202, 206, 302, 404, 500] {
            assert!(!is_null_body_status(StatusCode::from_u16(code).unwrap()), "{code}");
        }
    }
}
