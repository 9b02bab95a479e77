//! Security schemes and per-handle security configuration.

use crate::registry::Registrable;
use serde::{Deserialize, Serialize};

/// Security configuration of a tool handle.
///
/// Names the scheme that applies and carries scheme-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityObject {
    /// Name of the configured security scheme.
    pub scheme: String,
    /// Scheme-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SecurityObject {
    /// Creates a security object for the given scheme.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Returns a scheme-specific string setting.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(serde_json::Value::as_str)
    }
}

/// A named authentication mechanism.
pub trait SecurityScheme: Send + Sync + 'static {
    /// The scheme name, as referenced by [`SecurityObject::scheme`].
    fn name(&self) -> &str;
}

impl Registrable for dyn SecurityScheme {
    fn registry_key(&self) -> &str {
        self.name()
    }
}
