//! The request dispatcher.
//!
//! # Design
//! `Ajax` holds only its collaborators: a `TransportFactory` and a
//! `DiagnosticSink`. It keeps no per-request state; each call to `ajax`
//! merges defaults into the caller's options, builds an `HttpRequest`, takes
//! a fresh transport and wires one observer that owns the callbacks. The
//! observer acts on the first `Done` transition only, so callbacks fire at
//! most once per request no matter how often the transport reports `Done`.
//!
//! Callback panics are not caught. A panicking callback stops the rest of its
//! list, the same as an exception would in the browser.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::callbacks::{ErrorCallback, StatusArg, StatusCallback, SuccessCallback};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{AjaxError, TransportError};
use crate::http::{HttpRequest, ResponseBody, StatusClass};
use crate::merge::MergeObject;
use crate::options::{AjaxOptions, DataType};
use crate::transport::{
    ReadyState, ReadyStateObserver, Transport, TransportFactory, TransportHandle,
};

/// Dispatches requests through transports produced by `F`.
pub struct Ajax<F> {
    factory: F,
    sink: Rc<dyn DiagnosticSink>,
}

impl<F: TransportFactory> Ajax<F> {
    /// A dispatcher reporting diagnostics through `tracing`.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            sink: Rc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Rc::new(sink);
        self
    }

    /// Send the request described by `options`.
    ///
    /// Outcomes arrive through the callbacks in `options`. An `Err` means no
    /// request went out and no callback will run; the error has already
    /// been reported to the diagnostic sink.
    pub fn ajax(&self, mut options: AjaxOptions) -> Result<(), AjaxError> {
        options.merge_object(&AjaxOptions::defaults());

        let request = HttpRequest::from_options(&options).map_err(|err| self.report(err))?;
        let mut transport = self
            .factory
            .create()
            .map_err(|err| self.report(err.into()))?;

        transport.set_observer(Completion::new(options, Rc::clone(&self.sink)).into_observer());
        send(transport.as_mut(), &request).map_err(|err| self.report(err.into()))
    }

    fn report(&self, err: AjaxError) -> AjaxError {
        self.sink.report(&Diagnostic::from(&err));
        err
    }
}

/// Send one request through a fresh `Ajax` with the default sink.
pub fn ajax<F: TransportFactory>(factory: F, options: AjaxOptions) -> Result<(), AjaxError> {
    Ajax::new(factory).ajax(options)
}

fn send(transport: &mut dyn Transport, request: &HttpRequest) -> Result<(), TransportError> {
    debug!(
        method = %request.method,
        url = %request.url,
        asynchronous = request.asynchronous,
        "opening request"
    );
    transport.open(request.method.as_str(), &request.url, request.asynchronous)?;
    for (name, value) in &request.headers {
        transport.set_request_header(name, value)?;
    }
    if let Some(with_credentials) = request.with_credentials {
        transport.set_with_credentials(with_credentials)?;
    }
    transport.send(request.body.as_deref())
}

/// Everything the observer needs once the request is done.
struct Completion {
    data_type: DataType,
    success: Vec<SuccessCallback>,
    error: Vec<ErrorCallback>,
    status_code: BTreeMap<u16, StatusCallback>,
    sink: Rc<dyn DiagnosticSink>,
}

impl Completion {
    fn new(options: AjaxOptions, sink: Rc<dyn DiagnosticSink>) -> Self {
        Self {
            data_type: options.data_type.unwrap_or_default(),
            success: options.success.map(|c| c.into_vec()).unwrap_or_default(),
            error: options.error.map(|c| c.into_vec()).unwrap_or_default(),
            status_code: options.status_code.unwrap_or_default(),
            sink,
        }
    }

    fn into_observer(self) -> ReadyStateObserver {
        let mut finished = false;
        Box::new(move |handle: &dyn TransportHandle| {
            if finished || handle.ready_state() != ReadyState::Done {
                return;
            }
            finished = true;
            self.finish(handle);
        })
    }

    fn finish(&self, handle: &dyn TransportHandle) {
        let status = handle.status();
        let status_text = handle.status_text();
        let exact = self.status_code.get(&status);
        debug!(status, status_text = %status_text, "request complete");

        match StatusClass::of(status) {
            StatusClass::Success => {
                let body = self.decode(status, handle.response_text());
                for callback in &self.success {
                    callback(&body, &status_text, handle);
                }
                if let Some(callback) = exact {
                    callback(StatusArg::Response(&body), &status_text, handle);
                }
            }
            StatusClass::Error => {
                for callback in &self.error {
                    callback(handle, &status_text);
                }
                if let Some(callback) = exact {
                    callback(StatusArg::Handle(handle), &status_text, handle);
                }
            }
            StatusClass::Other => {
                if let Some(callback) = exact {
                    callback(StatusArg::Handle(handle), &status_text, handle);
                }
            }
        }
    }

    fn decode(&self, status: u16, text: String) -> ResponseBody {
        ResponseBody::decode(text, &self.data_type).unwrap_or_else(|err| {
            self.sink.report(&Diagnostic::InvalidJson {
                status,
                detail: err.detail(),
            });
            ResponseBody::Text(err.into_raw())
        })
    }
}
