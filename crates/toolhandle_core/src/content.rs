//! Content decoders and media-type based decoder resolution.
//!
//! Decoders are registered under their own content type. Resolving a decoder
//! for an observed media type of the form `type/subtype[+syntax][;params]`
//! checks the following keys in order, returning the first hit:
//!
//! 1. `type/subtype[+syntax]` (the media type without parameters)
//! 2. `type/subtype`
//! 3. `type/syntax`, only when a `+syntax` suffix is present
//! 4. `type/*`
//! 5. `""`, the universal wildcard, then `*/*`
//!
//! When nothing matches, or the media type is absent or unparsable, bodies
//! decode as raw bytes.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::{Registrable, Registry};
use crate::stream::{ByteStream, read_bytes, read_text};
use crate::value::ToolValue;
use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;

/// Registry key of the universal wildcard decoder.
pub const WILDCARD_KEY: &str = "";

/// Content type of the any-bytes decoder.
pub const ANY_CONTENT_TYPE: &str = "*/*";

/// Converts a byte stream of a declared media type into a value.
#[async_trait]
pub trait ContentDecoder: Send + Sync + 'static {
    /// The content type this decoder is registered under.
    fn content_type(&self) -> &str;

    /// Decodes the full contents of `stream`.
    async fn decode_content(
        &self,
        stream: ByteStream,
        context: &ToolContext,
    ) -> Result<ToolValue, ToolError>;
}

impl Registrable for dyn ContentDecoder {
    fn registry_key(&self) -> &str {
        self.content_type()
    }
}

/// Decodes content as raw [`Bytes`](bytes::Bytes).
#[derive(Debug, Clone)]
pub struct BytesDecoder {
    content_type: Cow<'static, str>,
}

impl BytesDecoder {
    /// Creates a bytes decoder registered under `content_type`.
    pub fn new(content_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }

    /// The `*/*` decoder used when no other decoder matches.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            content_type: Cow::Borrowed(ANY_CONTENT_TYPE),
        }
    }
}

#[async_trait]
impl ContentDecoder for BytesDecoder {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    async fn decode_content(
        &self,
        stream: ByteStream,
        _context: &ToolContext,
    ) -> Result<ToolValue, ToolError> {
        Ok(ToolValue::Bytes(read_bytes(stream).await?))
    }
}

/// Decodes content as UTF-8 text.
#[derive(Debug, Clone)]
pub struct TextDecoder {
    content_type: Cow<'static, str>,
}

impl TextDecoder {
    /// Creates a text decoder registered under `content_type`.
    pub fn new(content_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }
}

#[async_trait]
impl ContentDecoder for TextDecoder {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    async fn decode_content(
        &self,
        stream: ByteStream,
        _context: &ToolContext,
    ) -> Result<ToolValue, ToolError> {
        Ok(ToolValue::String(read_text(stream).await?))
    }
}

/// Decodes content as JSON text.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder;

#[async_trait]
impl ContentDecoder for JsonDecoder {
    fn content_type(&self) -> &str {
        "application/json"
    }

    async fn decode_content(
        &self,
        stream: ByteStream,
        _context: &ToolContext,
    ) -> Result<ToolValue, ToolError> {
        let text = read_text(stream).await?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|err| ToolError::decode(self.content_type(), err))?;
        Ok(value.into())
    }
}

/// Returns the decoders registered in every new context.
#[must_use]
pub fn builtin_decoders() -> Registry<dyn ContentDecoder> {
    let decoders: [Arc<dyn ContentDecoder>; 5] = [
        Arc::new(BytesDecoder::any()),
        Arc::new(BytesDecoder::new("application/octet-stream")),
        Arc::new(JsonDecoder),
        Arc::new(TextDecoder::new("text/plain")),
        Arc::new(TextDecoder::new("text/*")),
    ];
    let mut registry = Registry::new();
    for decoder in decoders {
        registry.insert(decoder);
    }
    registry
}

/// A parsed `type/subtype[+syntax]` media type, parameters stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType<'a> {
    /// The media type without parameters.
    pub essence: &'a str,
    /// Top-level type, e.g. `application`.
    pub kind: &'a str,
    /// Subtype without the syntax suffix, e.g. `vnd.api`.
    pub subtype: &'a str,
    /// Structured syntax suffix, e.g. `json`.
    pub syntax: Option<&'a str>,
}

impl<'a> MediaType<'a> {
    /// Parses a media type, returning `None` when it does not have the
    /// `type/subtype[+syntax][;params]` shape.
    #[must_use]
    pub fn parse(content_type: &'a str) -> Option<Self> {
        let essence = content_type
            .split_once(';')
            .map_or(content_type, |(essence, _)| essence);
        let (kind, rest) = essence.split_once('/')?;
        let (subtype, syntax) = match rest.split_once('+') {
            Some((subtype, syntax)) => {
                if syntax.is_empty() {
                    return None;
                }
                (subtype, Some(syntax))
            }
            None => (rest, None),
        };
        if kind.is_empty() || subtype.is_empty() {
            return None;
        }
        Some(Self {
            essence,
            kind,
            subtype,
            syntax,
        })
    }

    /// Registry keys to try for this media type, most specific first.
    #[must_use]
    pub fn lookup_keys(&self) -> Vec<Cow<'a, str>> {
        let mut keys = vec![
            Cow::Borrowed(self.essence),
            Cow::Owned(format!("{}/{}", self.kind, self.subtype)),
        ];
        if let Some(syntax) = self.syntax {
            keys.push(Cow::Owned(format!("{}/{}", self.kind, syntax)));
        }
        keys.push(Cow::Owned(format!("{}/*", self.kind)));
        keys.push(Cow::Borrowed(WILDCARD_KEY));
        keys.push(Cow::Borrowed(ANY_CONTENT_TYPE));
        keys
    }
}

/// Returns the decoder in `context` for the given content type.
///
/// Returns `None` when the content type is absent or unparsable, or when no
/// key of the resolution cascade is registered.
#[must_use]
pub fn content_decoder(
    content_type: Option<&str>,
    context: &ToolContext,
) -> Option<Arc<dyn ContentDecoder>> {
    let media_type = MediaType::parse(content_type?)?;
    let decoders = context.content_decoders();
    media_type.lookup_keys().into_iter().find_map(|key| {
        let decoder = decoders.get(&key)?;
        tracing::trace!(key = %key, "resolved content decoder");
        Some(Arc::clone(decoder))
    })
}

/// Decodes `stream` with the decoder resolved for `content_type`.
///
/// An absent stream yields [`ToolValue::Null`] without invoking any decoder.
pub async fn decode_content(
    stream: Option<ByteStream>,
    content_type: Option<&str>,
    context: &ToolContext,
) -> Result<ToolValue, ToolError> {
    let Some(stream) = stream else {
        return Ok(ToolValue::Null);
    };
    match content_decoder(content_type, context) {
        Some(decoder) => decoder.decode_content(stream, context).await,
        None => BytesDecoder::any().decode_content(stream, context).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_syntax_suffix_and_params() {
        let media = MediaType::parse("application/vnd.api+json;charset=utf-8").unwrap();
        assert_eq!(media.essence, "application/vnd.api+json");
        assert_eq!(media.kind, "application");
        assert_eq!(media.subtype, "vnd.api");
        assert_eq!(media.syntax, Some("json"));
    }

    #[test]
    fn rejects_malformed_media_types() {
        assert_eq!(MediaType::parse("json"), None);
        assert_eq!(MediaType::parse("/json"), None);
        assert_eq!(MediaType::parse("application/"), None);
        assert_eq!(MediaType::parse("application/+json"), None);
        assert_eq!(MediaType::parse("application/json+"), None);
    }

    #[test]
    fn lookup_keys_follow_cascade_order() {
        let media = MediaType::parse("application/vnd.api+json; charset=utf-8").unwrap();
        let keys: Vec<String> = media
            .lookup_keys()
            .into_iter()
            .map(Cow::into_owned)
            .collect();
        assert_eq!(
            keys,
            [
                "application/vnd.api+json",
                "application/vnd.api",
                "application/json",
                "application/*",
                "",
                "*/*",
            ]
        );
    }

    #[test]
    fn lookup_keys_skip_syntax_when_absent() {
        let media = MediaType::parse("text/html").unwrap();
        let keys: Vec<String> = media
            .lookup_keys()
            .into_iter()
            .map(Cow::into_owned)
            .collect();
        assert_eq!(keys, ["text/html", "text/html", "text/*", "", "*/*"]);
    }
}
