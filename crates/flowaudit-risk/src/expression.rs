//! Expression detection for node parameter values.
//!
//! A parameter value is a dynamic expression when it is a string starting
//! with `=` whose remainder holds at least one balanced `{{ ... }}` span.
//! Everything else is opaque to the audit: numbers, booleans, and objects
//! are never scanned for references.

use serde_json::{Map, Value};

/// Leading marker of an expression string.
pub const EXPRESSION_MARKER: char = '=';

/// Shape of a parameter value, as seen by every reporter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue<'a> {
    /// String, number, boolean, or null with no expression form.
    Literal(&'a Value),
    /// Expression string, marker included.
    Expression(&'a str),
    /// Object or array. Not scanned further.
    Structured(&'a Value),
}

impl<'a> ParamValue<'a> {
    /// Whether this value is evaluated at execution time.
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }

    /// The literal string, if this is a non-expression string.
    pub fn as_literal_str(&self) -> Option<&'a str> {
        match self {
            Self::Literal(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Template span contents of an expression; empty for anything else.
    pub fn references(&self) -> Vec<&'a str> {
        match self {
            Self::Expression(expr) => extract_references(expr),
            _ => Vec::new(),
        }
    }
}

/// Classify a parameter value.
pub fn classify(value: &Value) -> ParamValue<'_> {
    match value {
        Value::String(s) if is_expression_str(s) => ParamValue::Expression(s),
        Value::Object(_) | Value::Array(_) => ParamValue::Structured(value),
        _ => ParamValue::Literal(value),
    }
}

/// Whether a JSON value is an expression string.
pub fn is_expression(value: &Value) -> bool {
    value.as_str().is_some_and(is_expression_str)
}

/// Whether a string is an expression.
pub fn is_expression_str(s: &str) -> bool {
    s.strip_prefix(EXPRESSION_MARKER)
        .is_some_and(|body| !template_spans(body).is_empty())
}

/// Raw contents of every top-level `{{ ... }}` span, left to right.
///
/// Only meaningful for expressions; the leading marker is skipped if
/// present. Contents are not trimmed or parsed.
pub fn extract_references(expr: &str) -> Vec<&str> {
    template_spans(expr.strip_prefix(EXPRESSION_MARKER).unwrap_or(expr))
}

/// Walk a parameter path through nested objects.
///
/// Returns `None` when any step is missing or not an object.
pub fn lookup<'a>(params: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = params.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

fn template_spans(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;

    // Delimiters are ASCII, so every slice boundary is a char boundary.
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'{', b'{') => {
                if depth == 0 {
                    start = i + 2;
                }
                depth += 1;
                i += 2;
            }
            (b'}', b'}') if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&body[start..i]);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    spans
}
