//! HTTP responses, response-template selection and rendering.

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use std::fmt;
use toolhandle_core::{ByteStream, ToolContext, ToolError, ToolMap, ToolValue, decode_content};

/// A response as returned by an [`HttpTransport`](crate::HttpTransport).
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Status text.
    pub status_text: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body, if any.
    pub body: Option<ByteStream>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .field("body", &self.body.is_some())
            .finish()
    }
}

impl HttpResponse {
    /// Creates a bodiless response.
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Returns the response's `Content-Type`, if present and readable.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

/// Selects the response template for `status`.
///
/// Tries the exact status (`"404"`), then its class (the first digit
/// followed by `xx`, `"4xx"`), then `"default"`. Null templates count as
/// undefined.
#[must_use]
pub fn select_response_template(
    templates: &serde_json::Map<String, serde_json::Value>,
    status: u16,
) -> Option<(&str, &serde_json::Value)> {
    let exact = status.to_string();
    let class = format!("{}xx", &exact[..1]);
    [exact.as_str(), class.as_str(), "default"]
        .into_iter()
        .find_map(|key| {
            templates
                .get_key_value(key)
                .filter(|(_, template)| !template.is_null())
                .map(|(key, template)| (key.as_str(), template))
        })
}

/// Decodes `response` and renders it through the selected template.
///
/// Without a matching template the decoded body is returned as is.
///
/// # Errors
///
/// Propagates decode, stream and template errors.
pub async fn transform_http_response(
    context: &ToolContext,
    templates: Option<&serde_json::Map<String, serde_json::Value>>,
    response: HttpResponse,
) -> Result<ToolValue, ToolError> {
    let HttpResponse {
        status,
        status_text,
        headers,
        body,
    } = response;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let body = decode_content(body, content_type, context).await?;

    let Some((key, template)) = templates.and_then(|t| select_response_template(t, status))
    else {
        tracing::trace!(status, "no response template, returning decoded body");
        return Ok(body);
    };
    tracing::trace!(status, template = key, "rendering response template");

    let mut record = ToolMap::with_capacity(4);
    record.insert("status".to_string(), ToolValue::from(status));
    record.insert("statusText".to_string(), ToolValue::String(status_text));
    record.insert("headers".to_string(), ToolValue::Object(flatten_headers(&headers)));
    record.insert("body".to_string(), body);

    let transformer = context.template_engine().parse_template(template, context).await?;
    transformer.transform(ToolValue::Object(record)).await
}

/// Flattens a header collection into a keyed record of lower-case names.
///
/// Repeated headers are joined with `", "`.
pub(crate) fn flatten_headers(headers: &HeaderMap) -> ToolMap {
    let mut flat: ToolMap = ToolMap::with_capacity(headers.keys_len());
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        flat.insert(name.as_str().to_string(), ToolValue::String(joined));
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn templates(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn selection_prefers_exact_then_class_then_default() {
        let t = templates(json!({"404": "A", "4xx": "B", "default": "C"}));
        assert_eq!(select_response_template(&t, 404).map(|(k, _)| k), Some("404"));
        assert_eq!(select_response_template(&t, 403).map(|(k, _)| k), Some("4xx"));
        assert_eq!(select_response_template(&t, 500).map(|(k, _)| k), Some("default"));
    }

    #[test]
    fn selection_without_templates_finds_nothing() {
        assert!(select_response_template(&templates(json!({})), 200).is_none());
        assert!(select_response_template(&templates(json!({"4xx": "x"})), 200).is_none());
    }

    #[test]
    fn class_key_uses_the_first_digit() {
        let t = templates(json!({"0xx": "zero", "1xx": "one", "4xx": "four"}));
        assert_eq!(select_response_template(&t, 42).map(|(k, _)| k), Some("4xx"));
        assert_eq!(select_response_template(&t, 1000).map(|(k, _)| k), Some("1xx"));
        assert_eq!(select_response_template(&t, 7).map(|(k, _)| k), None);
    }

    #[test]
    fn null_templates_are_skipped() {
        let t = templates(json!({"200": null, "2xx": "ok"}));
        assert_eq!(select_response_template(&t, 200).map(|(k, _)| k), Some("2xx"));
    }

    #[test]
    fn repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("x-tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let flat = flatten_headers(&headers);
        assert_eq!(flat["x-tag"], ToolValue::from("a, b"));
        assert_eq!(flat["content-type"], ToolValue::from("text/plain"));
    }
}
