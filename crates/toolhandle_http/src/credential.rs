//! Application of `"http"` scheme credentials to requests.

use crate::request::{HttpRequest, header_pair};
use reqwest::header::{COOKIE, HeaderValue};
use toolhandle_core::{HttpCredential, ToolError};

/// Returns a copy of `request` with `credential` applied.
///
/// - headers are set, replacing existing values of the same name
/// - query parameters are appended, never replacing existing ones
/// - cookies are appended to every existing `Cookie` value as
///   `name=value` pairs, and the combined value replaces them
///
/// Cookie values are encoded with [`urlencoding::encode`], which escapes
/// every byte outside `A-Z a-z 0-9 - . _ ~`, including `! * ' ( )`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidCookieName`] if a cookie name is not an
/// RFC 6265 token, or [`ToolError::InvalidHeader`] if a header cannot be
/// encoded.
pub fn apply_http_credentials(
    request: &HttpRequest,
    credential: &HttpCredential,
) -> Result<HttpRequest, ToolError> {
    let mut request = request.clone();

    for (name, value) in &credential.headers {
        let (name, value) = header_pair(name, value, None)?;
        request.headers.insert(name, value);
    }

    if !credential.query.is_empty() {
        let mut pairs = request.url.query_pairs_mut();
        for (name, value) in &credential.query {
            pairs.append_pair(name, value);
        }
    }

    if !credential.cookies.is_empty() {
        let mut header: Vec<u8> = Vec::new();
        for existing in request.headers.get_all(COOKIE) {
            if existing.is_empty() {
                continue;
            }
            if !header.is_empty() {
                header.extend_from_slice(b"; ");
            }
            header.extend_from_slice(existing.as_bytes());
        }
        for (name, value) in &credential.cookies {
            if !is_cookie_name(name) {
                return Err(ToolError::InvalidCookieName { name: name.clone() });
            }
            if !header.is_empty() {
                header.extend_from_slice(b"; ");
            }
            header.extend_from_slice(format!("{name}={}", urlencoding::encode(value)).as_bytes());
        }
        let value = HeaderValue::from_bytes(&header).map_err(|_| ToolError::InvalidHeader {
            name: COOKIE.as_str().to_string(),
            value: String::from_utf8_lossy(&header).into_owned(),
            location: None,
        })?;
        request.headers.insert(COOKIE, value);
    }

    Ok(request)
}

/// Whether `name` matches the RFC 6265 cookie-name token grammar.
pub(crate) fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            matches!(b,
                0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{Method, Url};

    fn get(url: &str) -> HttpRequest {
        HttpRequest::new(Method::GET, Url::parse(url).unwrap())
    }

    #[test]
    fn cookie_name_grammar() {
        assert!(is_cookie_name("session"));
        assert!(is_cookie_name("__Host-id"));
        assert!(!is_cookie_name(""));
        assert!(!is_cookie_name("bad name"));
        assert!(!is_cookie_name("a;b"));
        assert!(!is_cookie_name("a,b"));
        assert!(!is_cookie_name("\"q\""));
        assert!(!is_cookie_name("a\\b"));
        assert!(!is_cookie_name("caf\u{e9}"));
    }

    #[test]
    fn cookie_values_are_percent_encoded() {
        let credential = HttpCredential::new().with_cookie("session", "ab c");
        let request = apply_http_credentials(&get("https://a.test/"), &credential).unwrap();
        assert_eq!(request.headers[COOKIE], "session=ab%20c");
    }

    #[test]
    fn cookies_keep_every_existing_value() {
        let mut original = get("https://a.test/");
        original
            .headers
            .append(COOKIE, HeaderValue::from_bytes(b"pref=caf\xe9").unwrap());
        original.headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        let credential = HttpCredential::new().with_cookie("session", "x");

        let request = apply_http_credentials(&original, &credential).unwrap();
        let values: Vec<_> = request.headers.get_all(COOKIE).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(
            values[0].as_bytes(),
            b"pref=caf\xe9; theme=dark; session=x".as_slice()
        );
    }

    #[test]
    fn cookie_values_escape_reserved_marks() {
        let credential = HttpCredential::new().with_cookie("q", "it's(*)!");
        let request = apply_http_credentials(&get("https://a.test/"), &credential).unwrap();
        assert_eq!(request.headers[COOKIE], "q=it%27s%28%2A%29%21");
    }

    #[test]
    fn headers_replace_existing_values() {
        let mut original = get("https://a.test/");
        original
            .headers
            .insert("authorization", HeaderValue::from_static("old"));
        let credential = HttpCredential::bearer("t0k");

        let request = apply_http_credentials(&original, &credential).unwrap();
        assert_eq!(request.headers["authorization"], "Bearer t0k");
        assert_eq!(request.headers.get_all("authorization").iter().count(), 1);
        assert_eq!(original.headers["authorization"], "old");
    }

    #[test]
    fn empty_credentials_leave_url_untouched() {
        let request = apply_http_credentials(&get("https://a.test/x"), &HttpCredential::new()).unwrap();
        assert_eq!(request.url.as_str(), "https://a.test/x");
        assert!(request.headers.is_empty());
    }
}
