//! Query-string serialization for request payloads.
//!
//! # Design
//! Nested mappings flatten with bracket notation: `{a: {b: 1}}` becomes
//! `a[b]=1` before encoding, so the wire form is `a%5Bb%5D=1`. Arrays use
//! their index as the child key. Keys and values are escaped with the same
//! rules as `encodeURIComponent`, which is stricter than form encoding (a
//! space becomes `%20`, never `+`).
//!
//! Iteration follows insertion order (`serde_json` is built with
//! `preserve_order`), so the same mapping always yields the same string.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Number, Value};

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `input` as a URI component.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Flatten `data` into a query-encoded string.
///
/// Null leaves are dropped and empty nested containers contribute nothing.
/// An empty mapping yields `""`.
pub fn serialize(data: &Map<String, Value>) -> String {
    let mut fragments = Vec::new();
    for (key, value) in data {
        flatten(&mut fragments, key.clone(), value);
    }
    fragments.join("&")
}

fn flatten(fragments: &mut Vec<String>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (child, nested) in map {
                flatten(fragments, format!("{key}[{child}]"), nested);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten(fragments, format!("{key}[{index}]"), nested);
            }
        }
        Value::String(text) => fragments.push(pair(&key, text)),
        Value::Bool(flag) => fragments.push(pair(&key, &flag.to_string())),
        Value::Number(number) => fragments.push(pair(&key, &number_text(number))),
    }
}

/// Render a number the way JavaScript prints it: a float with no fractional
/// part drops the `.0` below `1e21`, where JS switches to exponent form.
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
            if float == 0.0 {
                "0".to_string()
            } else {
                format!("{float:.0}")
            }
        }
        _ => number.to_string(),
    }
}

fn pair(key: &str, value: &str) -> String {
    format!("{}={}", encode_uri_component(key), encode_uri_component(value))
}
