//! Template engine contract and the basic built-in engine.
//!
//! Handlers never interpret templates themselves: they compile a template
//! with the context's [`TemplateEngine`] and feed input through the resulting
//! [`Transformer`]. Applications can plug in a richer engine via
//! [`ToolContextOptions::with_template_engine`](crate::context::ToolContextOptions::with_template_engine).
//!
//! # Basic template language
//!
//! [`BasicTemplateEngine`] understands:
//!
//! - strings with `{path}` placeholders, replaced by the value at `path` in
//!   the input (`{{` and `}}` produce literal braces)
//! - `{"$ref": "path"}`, the value at `path` itself
//! - `{"$json": template}`, the rendered template as a JSON [`Payload`]
//! - `{"$text": template}`, the rendered template as a `text/plain` [`Payload`]
//!
//! Other arrays and objects are rendered member by member; other literals are
//! returned unchanged.
//!
//! ```
//! # futures::executor::block_on(async {
//! use serde_json::json;
//! use toolhandle_core::context::ToolContext;
//! use toolhandle_core::value::ToolValue;
//!
//! let context = ToolContext::new();
//! let template = json!({"url": "https://example.com/items/{id}", "id": {"$ref": "id"}});
//! let transformer = context.template_engine().parse_template(&template, &context).await?;
//! let output = transformer.transform(ToolValue::from(json!({"id": 42}))).await?;
//! assert_eq!(output.to_json(), json!({"url": "https://example.com/items/42", "id": 42}));
//! # Ok::<(), toolhandle_core::ToolError>(())
//! # }).unwrap();
//! ```

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::value::{Payload, ToolMap, ToolValue};
use async_trait::async_trait;

/// Maps an input value to an output value.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Transforms `input`.
    async fn transform(&self, input: ToolValue) -> Result<ToolValue, ToolError>;
}

/// Compiles templates into [`Transformer`]s.
#[async_trait]
pub trait TemplateEngine: Send + Sync + 'static {
    /// Compiles `template` against `context`.
    async fn parse_template(
        &self,
        template: &serde_json::Value,
        context: &ToolContext,
    ) -> Result<Box<dyn Transformer>, ToolError>;
}

/// The built-in template engine. See the [module docs](self).
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTemplateEngine;

#[async_trait]
impl TemplateEngine for BasicTemplateEngine {
    async fn parse_template(
        &self,
        template: &serde_json::Value,
        _context: &ToolContext,
    ) -> Result<Box<dyn Transformer>, ToolError> {
        Ok(Box::new(BasicTransformer {
            root: compile(template)?,
        }))
    }
}

#[derive(Debug)]
struct BasicTransformer {
    root: Node,
}

#[async_trait]
impl Transformer for BasicTransformer {
    async fn transform(&self, input: ToolValue) -> Result<ToolValue, ToolError> {
        self.root.render(&input)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Path(String),
}

#[derive(Debug)]
enum Node {
    Literal(ToolValue),
    Interpolate(Vec<Segment>),
    Ref(String),
    Json(Box<Node>),
    Text(Box<Node>),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

fn compile(template: &serde_json::Value) -> Result<Node, ToolError> {
    match template {
        serde_json::Value::String(text) => {
            let segments = parse_placeholders(text)?;
            if segments.is_empty() {
                return Ok(Node::Literal(ToolValue::String(String::new())));
            }
            if let [Segment::Text(text)] = segments.as_slice() {
                return Ok(Node::Literal(ToolValue::String(text.clone())));
            }
            Ok(Node::Interpolate(segments))
        }
        serde_json::Value::Array(items) => Ok(Node::Array(
            items.iter().map(compile).collect::<Result<_, _>>()?,
        )),
        serde_json::Value::Object(map) => {
            if map.len() == 1
                && let Some((key, inner)) = map.iter().next()
                && key.starts_with('$')
            {
                return compile_directive(key, inner);
            }
            let members: Vec<(String, Node)> = map
                .iter()
                .map(|(key, value)| Ok((key.clone(), compile(value)?)))
                .collect::<Result<_, ToolError>>()?;
            Ok(Node::Object(members))
        }
        other => Ok(Node::Literal(ToolValue::from(other))),
    }
}

fn compile_directive(key: &str, inner: &serde_json::Value) -> Result<Node, ToolError> {
    match key {
        "$ref" => {
            let path = inner.as_str().ok_or_else(|| {
                ToolError::template(format!("$ref expects a path string, got {inner}"))
            })?;
            Ok(Node::Ref(path.to_string()))
        }
        "$json" => Ok(Node::Json(Box::new(compile(inner)?))),
        "$text" => Ok(Node::Text(Box::new(compile(inner)?))),
        other => Err(ToolError::template(format!("Unknown template directive: {other}"))),
    }
}

fn parse_placeholders(text: &str) -> Result<Vec<Segment>, ToolError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut path = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => path.push(c),
                        None => {
                            return Err(ToolError::template(format!(
                                "Unclosed placeholder in template string: {text:?}"
                            )));
                        }
                    }
                }
                if !literal.is_empty() {
                    segments.push(Segment::Text(core::mem::take(&mut literal)));
                }
                segments.push(Segment::Path(path.trim().to_string()));
            }
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }
    Ok(segments)
}

impl Node {
    fn render(&self, input: &ToolValue) -> Result<ToolValue, ToolError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Interpolate(segments) => {
                let mut out = String::new();
                for segment in segments {
                    match segment {
                        Segment::Text(text) => out.push_str(text),
                        Segment::Path(path) => {
                            if let Some(value) = input.lookup(path) {
                                out.push_str(&display(value));
                            }
                        }
                    }
                }
                Ok(ToolValue::String(out))
            }
            Self::Ref(path) => Ok(input.lookup(path).cloned().unwrap_or_default()),
            Self::Json(inner) => {
                let value = inner.render(input)?;
                Ok(ToolValue::Payload(Payload::json(&value.to_json())?))
            }
            Self::Text(inner) => Ok(ToolValue::Payload(Payload::text(display(
                &inner.render(input)?,
            )))),
            Self::Array(items) => Ok(ToolValue::Array(
                items
                    .iter()
                    .map(|item| item.render(input))
                    .collect::<Result<_, _>>()?,
            )),
            Self::Object(members) => {
                let mut map = ToolMap::with_capacity(members.len());
                for (key, node) in members {
                    map.insert(key.clone(), node.render(input)?);
                }
                Ok(ToolValue::Object(map))
            }
        }
    }
}

/// Text form of a value inside an interpolated string.
fn display(value: &ToolValue) -> String {
    match value {
        ToolValue::Null => String::new(),
        ToolValue::String(s) => s.clone(),
        ToolValue::Bool(b) => b.to_string(),
        ToolValue::Number(n) => n.to_string(),
        ToolValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ToolValue::Payload(payload) => String::from_utf8_lossy(&payload.body).into_owned(),
        ToolValue::Array(_) | ToolValue::Object(_) => value.to_json_string(),
    }
}
