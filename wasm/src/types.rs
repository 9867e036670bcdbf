//! Plain-data side of the JavaScript option object.
//!
//! The data-only options are gathered into a JSON document and handed to
//! `AjaxOptions`' own `Deserialize` impl, so the browser and Rust entry points
//! accept the same shapes. Functions cannot travel that way; `api` attaches
//! them afterwards.

use noquery::{AjaxOptions, ReadyState};
use serde_json::{Map, Value};

/// Option names read as plain data.
pub const DATA_KEYS: [&str; 7] = [
    "url",
    "method",
    "data",
    "dataType",
    "headers",
    "withCredentials",
    "async",
];

/// Turn a payload value into the mapping the serializer walks.
///
/// Arrays become index-keyed mappings; any other non-object value is an empty
/// payload.
pub fn payload_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => Map::new(),
    }
}

/// Build `AjaxOptions` from the data-only part of an options object.
pub fn options_from_document(
    mut document: Map<String, Value>,
) -> Result<AjaxOptions, serde_json::Error> {
    if let Some(data) = document.remove("data") {
        let data = match data {
            Value::Null => Value::Null,
            other => Value::Object(payload_map(other)),
        };
        document.insert("data".to_string(), data);
    }
    serde_json::from_value(Value::Object(document))
}

/// Parse a `statusCode` key. JavaScript object keys are always strings.
pub fn status_code_key(key: &str) -> Option<u16> {
    key.parse().ok()
}

/// Whether a throwing `send()` was a network failure rather than a fault.
///
/// A synchronous `XMLHttpRequest` that fails at the network level throws
/// `NetworkError` after moving to `DONE` with status 0, and fires no
/// `readystatechange`. Asynchronous requests never throw for that.
pub fn is_sync_network_failure(asynchronous: bool, ready_state: ReadyState, status: u16) -> bool {
    !asynchronous && ready_state == ReadyState::Done && status == 0
}
