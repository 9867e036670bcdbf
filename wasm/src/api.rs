//! Functions exported to JavaScript.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use noquery::{Ajax, AjaxOptions, ResponseBody, StatusArg, Transport, TransportError};
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::XmlHttpRequest;

use crate::types::{options_from_document, payload_map, status_code_key, DATA_KEYS};
use crate::xhr::{ConsoleSink, XhrTransport};

/// The request object of the current dispatch, filled once the factory runs.
type XhrSlot = Rc<RefCell<Option<XmlHttpRequest>>>;

/// Perform a request described by a `$.ajax`-style options object.
#[wasm_bindgen]
pub fn ajax(config: &JsValue) -> Result<(), JsValue> {
    let slot = XhrSlot::default();
    let options = options_from_js(config, &slot)?;

    let factory = {
        let slot = Rc::clone(&slot);
        move || -> Result<Box<dyn Transport>, TransportError> {
            let transport = XhrTransport::new()?;
            *slot.borrow_mut() = Some(transport.xhr().clone());
            Ok(Box::new(transport))
        }
    };
    // Failures are already on the console.
    let _ = Ajax::new(factory).with_sink(ConsoleSink).ajax(options);
    Ok(())
}

/// Encode an object as a query string.
#[wasm_bindgen]
pub fn serialize(obj: JsValue) -> Result<String, JsValue> {
    if obj.is_undefined() || obj.is_null() {
        return Ok(String::new());
    }
    let value: Value = serde_wasm_bindgen::from_value(obj)?;
    Ok(noquery::serialize(&payload_map(value)))
}

/// Copy every key of `src` that `target` leaves undefined. Returns `target`.
#[wasm_bindgen(js_name = "mergeObject")]
pub fn merge_object(target: &Object, src: &Object) -> Result<Object, JsValue> {
    for key in Object::keys(src).iter() {
        if Reflect::get(target, &key)?.is_undefined() {
            Reflect::set(target, &key, &Reflect::get(src, &key)?)?;
        }
    }
    Ok(target.clone())
}

fn options_from_js(config: &JsValue, slot: &XhrSlot) -> Result<AjaxOptions, JsValue> {
    let mut document = Map::new();
    for key in DATA_KEYS {
        let value = Reflect::get(config, &JsValue::from_str(key))?;
        if !value.is_undefined() {
            document.insert(key.to_string(), serde_wasm_bindgen::from_value(value)?);
        }
    }
    let mut options =
        options_from_document(document).map_err(|e| JsError::new(&e.to_string()))?;

    for function in functions(&Reflect::get(config, &"success".into())?) {
        let slot = Rc::clone(slot);
        options = options.success(move |body, text, _| {
            let xhr = current(&slot);
            rethrow(function.call3(&JsValue::NULL, &body_to_js(body), &text.into(), &xhr));
        });
    }

    for function in functions(&Reflect::get(config, &"error".into())?) {
        let slot = Rc::clone(slot);
        options = options.error(move |_, text| {
            let xhr = current(&slot);
            rethrow(function.call2(&JsValue::NULL, &xhr, &text.into()));
        });
    }

    let codes = Reflect::get(config, &"statusCode".into())?;
    if codes.is_object() {
        for key in Object::keys(codes.unchecked_ref()).iter() {
            let Some(status) = key.as_string().as_deref().and_then(status_code_key) else {
                continue;
            };
            let Ok(function) = Reflect::get(&codes, &key)?.dyn_into::<Function>() else {
                continue;
            };
            let slot = Rc::clone(slot);
            options = options.status_code(status, move |arg, text, _| {
                let xhr = current(&slot);
                let first = match arg {
                    StatusArg::Response(body) => body_to_js(body),
                    StatusArg::Handle(_) => xhr.clone(),
                };
                rethrow(function.call3(&JsValue::NULL, &first, &text.into(), &xhr));
            });
        }
    }

    Ok(options)
}

/// A callback option is one function or an array of them.
fn functions(value: &JsValue) -> Vec<Function> {
    if let Some(function) = value.dyn_ref::<Function>() {
        return vec![function.clone()];
    }
    if Array::is_array(value) {
        return Array::from(value)
            .iter()
            .filter_map(|item| item.dyn_into::<Function>().ok())
            .collect();
    }
    Vec::new()
}

fn current(slot: &XhrSlot) -> JsValue {
    slot.borrow()
        .as_ref()
        .map(|xhr| JsValue::from(xhr.clone()))
        .unwrap_or(JsValue::UNDEFINED)
}

fn body_to_js(body: &ResponseBody) -> JsValue {
    match body {
        ResponseBody::Json(value) => value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or_else(|_| JsValue::from_str(&value.to_string())),
        ResponseBody::Text(text) => JsValue::from_str(text),
    }
}

/// Let a callback's exception abort the rest of the dispatch.
fn rethrow(result: Result<JsValue, JsValue>) {
    if let Err(exception) = result {
        wasm_bindgen::throw_val(exception);
    }
}
