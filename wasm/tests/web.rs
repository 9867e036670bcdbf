//! Browser-side checks of the exported functions. Run with `wasm-pack test`.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use noquery_wasm::api::{ajax, merge_object, serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::XmlHttpRequest;

wasm_bindgen_test_configure!(run_in_browser);

fn object(pairs: &[(&str, JsValue)]) -> Object {
    let object = Object::new();
    for (key, value) in pairs {
        Reflect::set(&object, &JsValue::from_str(key), value).unwrap();
    }
    object
}

#[wasm_bindgen_test]
fn serialize_nested_object() {
    let inner = object(&[("b", JsValue::from(1))]);
    let outer = object(&[("a", inner.into()), ("c", JsValue::from_str("x y"))]);
    assert_eq!(serialize(outer.into()).unwrap(), "a%5Bb%5D=1&c=x%20y");
}

#[wasm_bindgen_test]
fn serialize_undefined_is_empty() {
    assert_eq!(serialize(JsValue::UNDEFINED).unwrap(), "");
}

#[wasm_bindgen_test]
fn merge_keeps_defined_target_keys() {
    let target = object(&[("method", JsValue::from_str("POST")), ("data", JsValue::NULL)]);
    let defaults = object(&[
        ("method", JsValue::from_str("GET")),
        ("data", JsValue::from_str("ignored")),
        ("async", JsValue::TRUE),
    ]);

    let merged = merge_object(&target, &defaults).unwrap();

    assert_eq!(Reflect::get(&merged, &"method".into()).unwrap(), "POST");
    assert!(Reflect::get(&merged, &"data".into()).unwrap().is_null());
    assert_eq!(Reflect::get(&merged, &"async".into()).unwrap(), JsValue::TRUE);
}

// --- ajax ---

const JSON_URL: &str = "data:application/json,%7B%22a%22%3A1%7D";

type Calls = Rc<RefCell<Vec<String>>>;

fn describe(value: &JsValue) -> String {
    if let Some(xhr) = value.dyn_ref::<XmlHttpRequest>() {
        return format!("xhr {}", xhr.status().unwrap_or(0));
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    if value.is_undefined() {
        return "undefined".to_string();
    }
    js_sys::JSON::stringify(value).map(String::from).unwrap()
}

/// A JS function that records its three arguments under `tag`.
fn recorder(calls: &Calls, tag: &'static str) -> JsValue {
    let calls = Rc::clone(calls);
    Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(
        move |first: JsValue, second: JsValue, third: JsValue| {
            calls.borrow_mut().push(format!(
                "{tag}|{}|{}|{}",
                describe(&first),
                describe(&second),
                describe(&third)
            ));
        },
    )
    .into_js_value()
}

#[wasm_bindgen_test]
fn sync_success_gets_parsed_body_in_list_order() {
    let calls = Calls::default();
    let codes = object(&[
        ("200", recorder(&calls, "200")),
        ("not-a-code", recorder(&calls, "ignored")),
    ]);
    let config = object(&[
        ("url", JsValue::from_str(JSON_URL)),
        ("async", JsValue::FALSE),
        ("success", Array::of2(&recorder(&calls, "first"), &recorder(&calls, "second")).into()),
        ("error", recorder(&calls, "error")),
        ("statusCode", codes.into()),
    ]);

    ajax(&config.into()).unwrap();

    assert_eq!(
        *calls.borrow(),
        [
            r#"first|{"a":1}|OK|xhr 200"#,
            r#"second|{"a":1}|OK|xhr 200"#,
            r#"200|{"a":1}|OK|xhr 200"#,
        ]
    );
}

#[wasm_bindgen_test]
fn text_data_type_delivers_raw_body() {
    let calls = Calls::default();
    let config = object(&[
        ("url", JsValue::from_str(JSON_URL)),
        ("async", JsValue::FALSE),
        ("dataType", JsValue::from_str("text")),
        ("success", recorder(&calls, "ok")),
    ]);

    ajax(&config.into()).unwrap();

    assert_eq!(*calls.borrow(), [r#"ok|{"a":1}|OK|xhr 200"#]);
}

#[wasm_bindgen_test]
fn missing_url_calls_nothing() {
    let calls = Calls::default();
    let config = object(&[
        ("success", recorder(&calls, "ok")),
        ("error", recorder(&calls, "error")),
    ]);

    ajax(&config.into()).unwrap();

    assert!(calls.borrow().is_empty());
}

#[wasm_bindgen_test]
fn sync_network_failure_runs_error_callbacks() {
    let calls = Calls::default();
    let codes = object(&[("0", recorder(&calls, "0"))]);
    let config = object(&[
        ("url", JsValue::from_str("http://127.0.0.1:9/")),
        ("async", JsValue::FALSE),
        ("success", recorder(&calls, "ok")),
        ("error", recorder(&calls, "error")),
        ("statusCode", codes.into()),
    ]);

    ajax(&config.into()).unwrap();

    assert_eq!(*calls.borrow(), ["error|xhr 0||undefined", "0|xhr 0||xhr 0"]);
}
