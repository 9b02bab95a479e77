//! The `"http"` security scheme.
//!
//! A handle secured with this scheme declares the authentication method and
//! where its secret lives:
//!
//! ```json
//! { "scheme": "http", "method": "bearer", "secret": "WEATHER_API_TOKEN" }
//! ```
//!
//! [`EnvCredentialResolver`] reads the secret from the named environment
//! variable at invocation time and formats it as an `Authorization` header.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use toolhandle_core::credential::HTTP_SCHEME;
use toolhandle_core::{
    Credential, CredentialResolver, HttpCredential, SecurityObject, SecurityScheme, ToolContext,
    ToolError, ToolHandle,
};

/// The `"http"` security scheme record.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpSecurityScheme;

impl HttpSecurityScheme {
    /// Returns the scheme as a shared registry entry.
    #[must_use]
    pub fn shared() -> Arc<dyn SecurityScheme> {
        Arc::new(Self)
    }
}

impl SecurityScheme for HttpSecurityScheme {
    fn name(&self) -> &str {
        HTTP_SCHEME
    }
}

/// HTTP authentication methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpAuthMethod {
    /// `Authorization: Bearer <secret>`.
    Bearer,
    /// `Authorization: Basic <base64(secret)>`, with `secret` as `user:password`.
    Basic,
}

impl HttpAuthMethod {
    fn parse(method: &str) -> Option<Self> {
        if method.eq_ignore_ascii_case("bearer") {
            Some(Self::Bearer)
        } else if method.eq_ignore_ascii_case("basic") {
            Some(Self::Basic)
        } else {
            None
        }
    }
}

/// Typed settings of an `"http"` [`SecurityObject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSecurityObject {
    /// Authentication method.
    pub method: HttpAuthMethod,
    /// Name under which the application stores the secret.
    pub secret: String,
}

impl HttpSecurityObject {
    /// Reads the settings of `security`.
    ///
    /// Returns `Ok(None)` for other schemes.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidHandle`] if `method` or `secret` is
    /// missing, or the method is not supported.
    pub fn from_security(security: &SecurityObject) -> Result<Option<Self>, ToolError> {
        if security.scheme != HTTP_SCHEME {
            return Ok(None);
        }
        let method = security.setting("method").unwrap_or("bearer");
        let method = HttpAuthMethod::parse(method).ok_or_else(|| {
            ToolError::invalid_handle(format!("unsupported http auth method: {method:?}"))
        })?;
        let secret = security
            .setting("secret")
            .ok_or_else(|| ToolError::invalid_handle("http security requires a secret name"))?;
        Ok(Some(Self {
            method,
            secret: secret.to_string(),
        }))
    }

    /// Formats `secret_value` as credentials for this method.
    #[must_use]
    pub fn credential(&self, secret_value: &str) -> HttpCredential {
        match self.method {
            HttpAuthMethod::Bearer => HttpCredential::bearer(secret_value),
            HttpAuthMethod::Basic => HttpCredential::new().with_header(
                "Authorization",
                format!("Basic {}", STANDARD.encode(secret_value)),
            ),
        }
    }
}

/// Resolves `"http"` credentials from environment variables.
///
/// The handle's `security.secret` names the variable. Handles without
/// `"http"` security resolve to no credentials.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialResolver {
    prefix: Option<String>,
}

impl EnvCredentialResolver {
    /// Creates a resolver reading variables by their exact name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver reading `<prefix><secret>` variables.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn variable(&self, secret: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{secret}"),
            None => secret.to_string(),
        }
    }
}

#[async_trait]
impl CredentialResolver for EnvCredentialResolver {
    async fn resolve(
        &self,
        handle: &ToolHandle,
        _context: &ToolContext,
    ) -> Result<Option<Credential>, ToolError> {
        let Some(security) = &handle.security else {
            return Ok(None);
        };
        let Some(settings) = HttpSecurityObject::from_security(security)? else {
            return Ok(None);
        };
        let variable = self.variable(&settings.secret);
        let value = std::env::var(&variable).map_err(|err| ToolError::Credential {
            message: format!("failed to read {variable} for {}", handle.name),
            source: Some(Box::new(err)),
        })?;
        Ok(Some(Credential::Http(settings.credential(&value))))
    }
}
