//! JSON encoding

use serde_json::{json, Map, Value};

use super::{Body, ResultRecord, API_VERSION};

/// `{"header": {...}, "<variant>": {...}}`
pub fn to_json(record: &ResultRecord) -> Result<Vec<u8>, serde_json::Error> {
    let kind = record.kind();

    let content = match record.body() {
        Body::Error(message) => json!({ "ERROR": message }),
        Body::Payload(fields) => Value::Object(
            fields
                .iter()
                .map(|field| (field.name.to_string(), Value::from(&field.value)))
                .collect::<Map<_, _>>(),
        ),
    };

    let mut root = Map::new();
    root.insert(
        "header".to_string(),
        json!({ "type": kind.header_type(), "version": API_VERSION }),
    );
    root.insert(kind.json_key(), content);

    serde_json::to_vec(&Value::Object(root))
}
