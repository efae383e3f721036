//! Field values carried by result records

use indexmap::IndexMap;
use serde_json::Value;

/// A retrieved index entry: field name to value, in insertion order
pub type DocumentRecord = IndexMap<String, FieldValue>;

/// Closed value shape for result payloads
///
/// Everything a record carries is one of these three cases, so both encoders
/// can flatten it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    Sequence(Vec<FieldValue>),
    Mapping(IndexMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The scalar itself, or the first scalar of a sequence
    ///
    /// Stored index fields are frequently single-element lists.
    pub fn first_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::Sequence(items) => items.iter().find_map(FieldValue::first_scalar),
            FieldValue::Mapping(_) => None,
        }
    }

    /// Every scalar in the value, depth first
    pub fn scalars(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_scalars(&mut out);
        out
    }

    fn collect_scalars<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FieldValue::Scalar(s) => out.push(s),
            FieldValue::Sequence(items) => items.iter().for_each(|v| v.collect_scalars(out)),
            FieldValue::Mapping(map) => map.values().for_each(|v| v.collect_scalars(out)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Scalar(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Sequence(items.into_iter().map(FieldValue::Scalar).collect())
    }
}

impl From<DocumentRecord> for FieldValue {
    fn from(map: DocumentRecord) -> Self {
        FieldValue::Mapping(map)
    }
}

impl From<Vec<DocumentRecord>> for FieldValue {
    fn from(docs: Vec<DocumentRecord>) -> Self {
        FieldValue::Sequence(docs.into_iter().map(FieldValue::Mapping).collect())
    }
}

/// Shapes outside the closed set are stringified, never rejected.
/// `null` becomes an empty scalar.
impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Scalar(s),
            Value::Array(items) => {
                FieldValue::Sequence(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => FieldValue::Mapping(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
            Value::Null => FieldValue::Scalar(String::new()),
            other => FieldValue::Scalar(other.to_string()),
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Scalar(s) => Value::String(s.clone()),
            FieldValue::Sequence(items) => Value::Array(items.iter().map(Value::from).collect()),
            FieldValue::Mapping(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            ),
        }
    }
}

/// Convert a JSON object into a document, stringifying leaf values
pub fn document_from_json(value: Value) -> Option<DocumentRecord> {
    match FieldValue::from(value) {
        FieldValue::Mapping(map) => Some(map),
        _ => None,
    }
}
