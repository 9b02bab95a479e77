//! Credential objects and credential resolution.
//!
//! Credentials are resolved per invocation by the application's
//! [`CredentialResolver`] and are never stored in a handle or context.
//! [`Credential`] is a closed set of known schemes; credentials for any other
//! scheme are carried as [`Credential::Other`] and are never applied.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::handle::ToolHandle;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Name of the HTTP security scheme.
pub const HTTP_SCHEME: &str = "http";

/// Untyped credential material for a scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialObject {
    /// Name of the scheme the credentials apply to.
    pub scheme: String,
    /// Scheme-specific fields.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Credential material for the `"http"` scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCredential {
    /// Headers to set on the request, replacing existing values.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
    /// Query parameters to append to the request URL.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query: IndexMap<String, String>,
    /// Cookies to add to the request's `Cookie` header.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cookies: IndexMap<String, String>,
}

impl HttpCredential {
    /// Creates empty HTTP credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials sending `Authorization: Bearer <token>`.
    pub fn bearer(token: impl AsRef<str>) -> Self {
        Self::new().with_header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Adds a cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }
}

/// Resolved credential material, by scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    /// Credentials for the `"http"` scheme.
    Http(HttpCredential),
    /// Credentials for a scheme without built-in support.
    Other(CredentialObject),
}

impl Credential {
    /// Returns the scheme name the credentials apply to.
    #[must_use]
    pub fn scheme(&self) -> &str {
        match self {
            Self::Http(_) => HTTP_SCHEME,
            Self::Other(object) => &object.scheme,
        }
    }

    /// Interprets an untyped credential object.
    pub fn from_object(object: CredentialObject) -> Result<Self, serde_json::Error> {
        if object.scheme == HTTP_SCHEME {
            let fields = serde_json::Value::Object(object.fields);
            return serde_json::from_value(fields).map(Self::Http);
        }
        Ok(Self::Other(object))
    }
}

impl From<HttpCredential> for Credential {
    fn from(credential: HttpCredential) -> Self {
        Self::Http(credential)
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = CredentialObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

/// Resolves credentials for a tool handle at invocation time.
#[async_trait]
pub trait CredentialResolver: Send + Sync + 'static {
    /// Returns the credentials to apply to `handle`, if any.
    async fn resolve(
        &self,
        handle: &ToolHandle,
        context: &ToolContext,
    ) -> Result<Option<Credential>, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_scheme_deserializes_to_typed_credentials() {
        let credential: Credential = serde_json::from_value(json!({
            "scheme": "http",
            "headers": {"X-Api-Key": "secret"},
            "cookies": {"session": "ab c"}
        }))
        .unwrap();

        let Credential::Http(http) = credential else {
            panic!("expected http credentials");
        };
        assert_eq!(http.headers["X-Api-Key"], "secret");
        assert_eq!(http.cookies["session"], "ab c");
        assert!(http.query.is_empty());
    }

    #[test]
    fn unknown_scheme_is_kept_untyped() {
        let credential: Credential = serde_json::from_value(json!({
            "scheme": "oauth2",
            "token": "t"
        }))
        .unwrap();

        assert_eq!(credential.scheme(), "oauth2");
        assert!(matches!(credential, Credential::Other(_)));
    }
}
