use serde_json::{Map, Value};

/// Raw instance metadata document, as returned by the provider.
///
/// Only interpreted by [`crate::metadata::extract`]; everything outside the
/// `compute` section is carried but ignored.
#[derive(Debug, Clone)]
pub struct RawMetadata(Value);

impl RawMetadata {
    pub fn new(doc: Value) -> Self {
        Self(doc)
    }

    /// Parse from a response body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body).map(Self)
    }

    /// Named sub-section, if present and an object.
    pub fn section(&self, name: &str) -> Option<Section<'_>> {
        self.0.get(name).and_then(Value::as_object).map(Section)
    }
}

/// Borrowed view over one object-valued section of the document.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a>(&'a Map<String, Value>);

impl<'a> Section<'a> {
    /// String field accessor: `Some` only for a present, string-typed value.
    /// `null`, numbers, and nested values all read as absent.
    pub fn str_field(&self, name: &str) -> Option<&'a str> {
        match self.0.get(name) {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::debug!(field = name, kind = kind_of(other), "ignoring non-string metadata field");
                None
            }
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
