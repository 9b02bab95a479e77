//! HTTP request construction from request templates.
//!
//! The request template is rendered with the invocation arguments into a
//! request form: a keyed record with the fields
//!
//! - `method`: optional string, `GET` when absent
//! - `url`: required absolute URL string
//! - `headers`: optional record of string values
//! - `body`: optional; a [`Payload`](toolhandle_core::Payload) contributes its
//!   headers, which take precedence over same-named templated headers
//!
//! Every validation failure is raised before the transport is invoked.

use crate::handle::HttpHandle;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use toolhandle_core::{ToolContext, ToolError, ToolValue};

/// A concrete HTTP request, ready for a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Creates a bodiless request without headers.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Renders the handle's request template with `args` and validates the
/// resulting request form.
///
/// # Errors
///
/// Returns [`ToolError::InvalidRequestTemplate`], [`ToolError::InvalidMethod`],
/// [`ToolError::InvalidUrl`], [`ToolError::InvalidHeaders`] or
/// [`ToolError::InvalidHeader`] for malformed request forms, and propagates
/// template engine errors.
pub async fn transform_http_request(
    context: &ToolContext,
    handle: &HttpHandle<'_>,
    args: ToolValue,
) -> Result<HttpRequest, ToolError> {
    let transformer = context
        .template_engine()
        .parse_template(handle.request, context)
        .await?;
    let form = transformer.transform(args).await?;
    request_from_form(form, &handle.request_location())
}

/// Validates a rendered request form and converts it into an [`HttpRequest`].
pub(crate) fn request_from_form(form: ToolValue, location: &str) -> Result<HttpRequest, ToolError> {
    let ToolValue::Object(mut form) = form else {
        return Err(ToolError::InvalidRequestTemplate {
            value: form.to_json_string(),
            location: Some(location.to_string()),
        });
    };

    let method = match form.shift_remove("method") {
        None | Some(ToolValue::Null) => Method::GET,
        Some(ToolValue::String(method)) => parse_method(&method).ok_or_else(|| {
            ToolError::InvalidMethod {
                value: ToolValue::String(method.clone()).to_json_string(),
                location: Some(format!("{location}/method")),
            }
        })?,
        Some(other) => {
            return Err(ToolError::InvalidMethod {
                value: other.to_json_string(),
                location: Some(format!("{location}/method")),
            });
        }
    };

    let url = match form.shift_remove("url") {
        Some(ToolValue::String(url)) => Url::parse(&url).map_err(|_| ToolError::InvalidUrl {
            value: ToolValue::String(url.clone()).to_json_string(),
            location: Some(format!("{location}/url")),
        })?,
        other => {
            return Err(ToolError::InvalidUrl {
                value: other.unwrap_or_default().to_json_string(),
                location: Some(format!("{location}/url")),
            });
        }
    };

    let mut headers = HeaderMap::new();
    match form.shift_remove("headers") {
        None | Some(ToolValue::Null) => {}
        Some(ToolValue::Object(templated)) => {
            let header_location = format!("{location}/headers");
            for (name, value) in &templated {
                let Some(text) = value.as_str() else {
                    return Err(ToolError::InvalidHeader {
                        name: name.clone(),
                        value: value.to_json_string(),
                        location: Some(header_location),
                    });
                };
                let (name, value) = header_pair(name, text, Some(&header_location))?;
                headers.append(name, value);
            }
        }
        Some(other) => {
            return Err(ToolError::InvalidHeaders {
                value: other.to_json_string(),
                location: Some(format!("{location}/headers")),
            });
        }
    }

    let body = match form.shift_remove("body") {
        None | Some(ToolValue::Null) => None,
        Some(ToolValue::Payload(payload)) => {
            let payload_location = format!("{location}/body");
            for (name, value) in &payload.headers {
                let (name, value) = header_pair(name, value, Some(&payload_location))?;
                headers.insert(name, value);
            }
            Some(payload.body)
        }
        Some(ToolValue::Bytes(bytes)) => Some(bytes),
        Some(ToolValue::String(text)) => {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain;charset=UTF-8"),
                );
            }
            Some(Bytes::from(text))
        }
        Some(other) => Some(Bytes::from(other.to_json_string())),
    };

    Ok(HttpRequest {
        method,
        url,
        headers,
        body,
    })
}

/// Parses a header name and value, reporting failures as [`ToolError::InvalidHeader`].
pub(crate) fn header_pair(
    name: &str,
    value: &str,
    location: Option<&str>,
) -> Result<(HeaderName, HeaderValue), ToolError> {
    let invalid = || ToolError::InvalidHeader {
        name: name.to_string(),
        value: ToolValue::from(value).to_json_string(),
        location: location.map(str::to_string),
    };
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
    let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
    Ok((header_name, header_value))
}

/// Parses a method token, normalizing the case of the standard methods.
fn parse_method(method: &str) -> Option<Method> {
    const NORMALIZED: [&str; 6] = ["DELETE", "GET", "HEAD", "OPTIONS", "POST", "PUT"];
    let upper = method.to_ascii_uppercase();
    if NORMALIZED.contains(&upper.as_str()) {
        return Method::from_bytes(upper.as_bytes()).ok();
    }
    Method::from_bytes(method.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolhandle_core::Payload;

    fn form(value: serde_json::Value) -> ToolValue {
        ToolValue::from(value)
    }

    #[test]
    fn method_defaults_to_get() {
        let request = request_from_form(form(json!({"url": "https://a.test/x"})), "t").unwrap();
        assert_eq!(request.method, Method::GET);
        assert!(request.body.is_none());
    }

    #[test]
    fn standard_methods_are_case_normalized() {
        assert_eq!(parse_method("post"), Some(Method::POST));
        assert_eq!(parse_method("PATCH"), Some(Method::PATCH));
        assert_eq!(parse_method("patch").map(|m| m.to_string()), Some("patch".to_string()));
        assert_eq!(parse_method("bad method"), None);
    }

    #[test]
    fn non_record_form_is_rejected_with_location() {
        let err = request_from_form(form(json!("nope")), "tool#/request").unwrap_err();
        assert!(matches!(err, ToolError::InvalidRequestTemplate { .. }));
        assert_eq!(err.location(), Some("tool#/request"));
    }

    #[test]
    fn non_string_method_is_rejected() {
        let err = request_from_form(form(json!({"method": 1, "url": "https://a.test"})), "t")
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidMethod { .. }));
    }

    #[test]
    fn missing_or_non_string_url_is_rejected() {
        let err = request_from_form(form(json!({})), "t").unwrap_err();
        assert!(matches!(err, ToolError::InvalidUrl { .. }));
        let err = request_from_form(form(json!({"url": ["x"]})), "t").unwrap_err();
        assert!(matches!(err, ToolError::InvalidUrl { .. }));
    }

    #[test]
    fn header_errors_name_the_header() {
        let err = request_from_form(
            form(json!({"url": "https://a.test", "headers": {"X-Count": 3}})),
            "t",
        )
        .unwrap_err();
        match err {
            ToolError::InvalidHeader { name, value, .. } => {
                assert_eq!(name, "X-Count");
                assert_eq!(value, "3");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = request_from_form(form(json!({"url": "https://a.test", "headers": "x"})), "t")
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidHeaders { .. }));
    }

    #[test]
    fn payload_headers_take_precedence_over_templated_headers() {
        let mut form = form(json!({
            "url": "https://a.test",
            "headers": {"Content-Type": "text/plain", "Accept": "application/json"}
        }));
        if let ToolValue::Object(map) = &mut form {
            let payload = Payload::json(&json!({"a": 1})).unwrap();
            map.insert("body".to_string(), ToolValue::Payload(payload));
        }

        let request = request_from_form(form, "t").unwrap();
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.headers["accept"], "application/json");
        assert_eq!(request.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[test]
    fn raw_string_body_passes_through() {
        let request = request_from_form(
            form(json!({"method": "POST", "url": "https://a.test", "body": "hello"})),
            "t",
        )
        .unwrap();
        assert_eq!(request.body.as_deref(), Some(b"hello".as_slice()));
        assert_eq!(request.headers[CONTENT_TYPE], "text/plain;charset=UTF-8");
    }
}
