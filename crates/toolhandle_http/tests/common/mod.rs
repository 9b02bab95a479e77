//! Shared helpers for toolhandle_http integration tests.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::collections::VecDeque;
use std::sync::{Mutex, Once};
use toolhandle_core::ToolError;
use toolhandle_core::stream::byte_stream;
use toolhandle_http::{FetchOptions, HttpRequest, HttpResponse, HttpTransport};

static INIT: Once = Once::new();

/// Installs a `tracing` subscriber once, filtered by `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A canned response: status, content type and body chunks.
///
/// `chunks` of `None` stands for a response without a body.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub status_text: &'static str,
    pub content_type: Option<&'static str>,
    pub chunks: Option<Vec<Vec<u8>>>,
}

impl Canned {
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            status_text: "",
            content_type: Some("application/json"),
            chunks: Some(vec![body.to_string().into_bytes()]),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            status_text: "",
            content_type: Some("text/plain; charset=utf-8"),
            chunks: Some(vec![body.as_bytes().to_vec()]),
        }
    }

    pub fn bodiless(status: u16, content_type: &'static str) -> Self {
        Self {
            status,
            status_text: "",
            content_type: Some(content_type),
            chunks: None,
        }
    }

    pub fn with_status_text(mut self, status_text: &'static str) -> Self {
        self.status_text = status_text;
        self
    }
}

/// An in-memory transport that records requests and replays canned responses.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<(HttpRequest, Option<FetchOptions>)>>,
}

impl MockTransport {
    pub fn new(responses: impl IntoIterator<Item = Canned>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<(HttpRequest, Option<FetchOptions>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(
        &self,
        request: HttpRequest,
        options: Option<FetchOptions>,
    ) -> Result<HttpResponse, ToolError> {
        self.requests.lock().unwrap().push((request, options));
        let canned = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ToolError::Transport {
                message: "no canned response left".to_string(),
                source: None,
            })?;

        let mut response = HttpResponse::new(canned.status, canned.status_text);
        if let Some(content_type) = canned.content_type {
            response
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response.body = canned.chunks.map(byte_stream);
        Ok(response)
    }
}
