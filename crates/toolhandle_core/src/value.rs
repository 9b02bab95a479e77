//! Dynamic values flowing through a tool invocation.
//!
//! [`ToolValue`] is a JSON-like value extended with two variants JSON cannot
//! express: raw [`Bytes`] (produced by byte decoders) and [`Payload`]s
//! (encoded content plus the headers describing it).

use bytes::Bytes;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Keyed record of values, preserving insertion order.
pub type ToolMap = IndexMap<String, ToolValue>;

/// Encoded content together with the headers that describe it.
///
/// Payloads are produced by encoders inside templates. When a payload becomes
/// a request body, its headers are merged into the request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Encoded body.
    pub body: Bytes,
    /// Headers describing the body, e.g. `Content-Type`.
    pub headers: IndexMap<String, String>,
}

impl Payload {
    /// Creates a payload with the given body and content type.
    pub fn new(body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        let mut headers = IndexMap::new();
        headers.insert("Content-Type".to_string(), content_type.into());
        Self {
            body: body.into(),
            headers,
        }
    }

    /// Encodes a JSON value as an `application/json` payload.
    pub fn json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::to_vec(value)?, "application/json"))
    }

    /// Encodes text as a `text/plain` payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text.into(), "text/plain; charset=utf-8")
    }

    /// Adds a header to the payload.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A dynamic value: tool arguments, template outputs, decoded bodies and results.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolValue {
    /// The absent value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A JSON number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// An ordered list.
    Array(Vec<ToolValue>),
    /// A keyed record.
    Object(ToolMap),
    /// Raw bytes.
    Bytes(Bytes),
    /// Encoded content with headers.
    Payload(Payload),
}

impl ToolValue {
    /// Returns `true` for [`ToolValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the record if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&ToolMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the bytes if this is a byte buffer.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the member `key` of an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ToolValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Looks up a dotted path (`a.b.0.c`) through objects and arrays.
    ///
    /// An empty path returns `self`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&ToolValue> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, segment| match current {
            Self::Object(map) => map.get(segment),
            Self::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Converts to a plain JSON value.
    ///
    /// Bytes become an array of byte values; payloads become their body text.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => items.iter().map(Self::to_json).collect(),
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Self::Bytes(bytes) => bytes.iter().map(|b| serde_json::Value::from(*b)).collect(),
            Self::Payload(payload) => {
                serde_json::Value::String(String::from_utf8_lossy(&payload.body).into_owned())
            }
        }
    }

    /// Renders the value as compact JSON text, for diagnostics.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

impl From<serde_json::Value> for ToolValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for ToolValue {
    fn from(value: &serde_json::Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<&str> for ToolValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ToolValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ToolValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u16> for ToolValue {
    fn from(value: u16) -> Self {
        Self::Number(value.into())
    }
}

impl From<Bytes> for ToolValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Payload> for ToolValue {
    fn from(value: Payload) -> Self {
        Self::Payload(value)
    }
}

impl From<ToolMap> for ToolValue {
    fn from(value: ToolMap) -> Self {
        Self::Object(value)
    }
}

impl Serialize for ToolValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Self::Bytes(bytes) => {
                let mut seq = serializer.serialize_seq(Some(bytes.len()))?;
                for byte in bytes {
                    seq.serialize_element(byte)?;
                }
                seq.end()
            }
            Self::Payload(payload) => {
                serializer.serialize_str(&String::from_utf8_lossy(&payload.body))
            }
        }
    }
}

impl<'de> Deserialize<'de> for ToolValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let value = ToolValue::from(json!({"body": {"items": [{"name": "a"}, {"name": "b"}]}}));
        assert_eq!(
            value.lookup("body.items.1.name"),
            Some(&ToolValue::from("b"))
        );
        assert_eq!(value.lookup("body.items.7.name"), None);
        assert_eq!(value.lookup("body.missing"), None);
        assert_eq!(value.lookup(""), Some(&value));
    }

    #[test]
    fn bytes_serialize_as_number_array() {
        let value = ToolValue::Bytes(Bytes::from_static(&[1, 2, 255]));
        assert_eq!(value.to_json(), json!([1, 2, 255]));
        assert_eq!(serde_json::to_value(&value).unwrap(), json!([1, 2, 255]));
    }

    #[test]
    fn object_order_is_preserved() {
        let value = ToolValue::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
