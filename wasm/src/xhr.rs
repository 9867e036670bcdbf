//! `XMLHttpRequest` transport and console diagnostics.

use std::cell::RefCell;
use std::rc::Rc;

use noquery::{
    Diagnostic, DiagnosticSink, ReadyState, ReadyStateObserver, Transport, TransportError,
    TransportHandle,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::XmlHttpRequest;

use crate::types::is_sync_network_failure;

/// Best-effort text of a thrown JavaScript value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Read-only view of an `XMLHttpRequest`.
///
/// A failed getter reads as its empty value: status 0, empty text.
struct XhrHandle<'a>(&'a XmlHttpRequest);

impl TransportHandle for XhrHandle<'_> {
    fn ready_state(&self) -> ReadyState {
        ReadyState::from_code(self.0.ready_state())
    }

    fn status(&self) -> u16 {
        self.0.status().unwrap_or(0)
    }

    fn status_text(&self) -> String {
        self.0.status_text().unwrap_or_default()
    }

    fn response_text(&self) -> String {
        self.0.response_text().ok().flatten().unwrap_or_default()
    }
}

type ObserverSlot = Rc<RefCell<Option<ReadyStateObserver>>>;

/// Run the observer against `xhr` without holding the slot borrowed, so a
/// callback may start another request.
fn notify(xhr: &XmlHttpRequest, slot: &ObserverSlot) {
    let taken = slot.borrow_mut().take();
    if let Some(mut observer) = taken {
        observer(&XhrHandle(xhr));
        let mut current = slot.borrow_mut();
        if current.is_none() {
            *current = Some(observer);
        }
    }
}

pub struct XhrTransport {
    xhr: XmlHttpRequest,
    observer: ObserverSlot,
    asynchronous: bool,
}

impl XhrTransport {
    pub fn new() -> Result<Self, TransportError> {
        let xhr = XmlHttpRequest::new().map_err(|e| TransportError::Unavailable(js_message(&e)))?;
        Ok(Self {
            xhr,
            observer: ObserverSlot::default(),
            asynchronous: true,
        })
    }

    /// The underlying request object, as handed to JavaScript callbacks.
    pub fn xhr(&self) -> &XmlHttpRequest {
        &self.xhr
    }
}

impl TransportHandle for XhrTransport {
    fn ready_state(&self) -> ReadyState {
        XhrHandle(&self.xhr).ready_state()
    }

    fn status(&self) -> u16 {
        XhrHandle(&self.xhr).status()
    }

    fn status_text(&self) -> String {
        XhrHandle(&self.xhr).status_text()
    }

    fn response_text(&self) -> String {
        XhrHandle(&self.xhr).response_text()
    }
}

impl Transport for XhrTransport {
    fn set_observer(&mut self, observer: ReadyStateObserver) {
        *self.observer.borrow_mut() = Some(observer);
        let xhr = self.xhr.clone();
        let slot = Rc::clone(&self.observer);
        // The transport is dropped right after `send`; the handler has to
        // outlive it, so ownership passes to the JS garbage collector.
        let handler = Closure::<dyn FnMut()>::new(move || notify(&xhr, &slot)).into_js_value();
        self.xhr.set_onreadystatechange(Some(handler.unchecked_ref()));
    }

    fn open(&mut self, method: &str, url: &str, asynchronous: bool) -> Result<(), TransportError> {
        self.asynchronous = asynchronous;
        self.xhr
            .open_with_async(method, url, asynchronous)
            .map_err(|e| TransportError::Open {
                method: method.to_string(),
                url: url.to_string(),
                message: js_message(&e),
            })
    }

    fn set_request_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        self.xhr
            .set_request_header(name, value)
            .map_err(|e| TransportError::Header {
                name: name.to_string(),
                message: js_message(&e),
            })
    }

    fn set_with_credentials(&mut self, with_credentials: bool) -> Result<(), TransportError> {
        self.xhr
            .set_with_credentials(with_credentials)
            .map_err(|e| TransportError::Credentials(js_message(&e)))
    }

    fn send(&mut self, body: Option<&str>) -> Result<(), TransportError> {
        let sent = match body {
            Some(body) => self.xhr.send_with_opt_str(Some(body)),
            None => self.xhr.send(),
        };
        let Err(e) = sent else {
            return Ok(());
        };
        if is_sync_network_failure(self.asynchronous, self.ready_state(), self.status()) {
            notify(&self.xhr, &self.observer);
            return Ok(());
        }
        Err(TransportError::Send(js_message(&e)))
    }
}

/// Writes diagnostics to the browser console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&self, diagnostic: &Diagnostic) {
        let message = JsValue::from_str(&diagnostic.to_string());
        if diagnostic.is_fatal() {
            web_sys::console::error_1(&message);
        } else {
            web_sys::console::warn_1(&message);
        }
    }
}
