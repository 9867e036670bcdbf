//! The seam between the dispatcher and whatever actually moves bytes.
//!
//! # Design
//! The traits follow the shape of `XMLHttpRequest`: a request is opened,
//! headers are set, a single observer is registered, then `send` either
//! blocks until completion (synchronous) or returns and lets the observer
//! fire later from the host's event loop (asynchronous). The browser binding
//! implements them over `web_sys::XmlHttpRequest`; tests implement them over
//! an in-memory queue or a blocking HTTP agent.
//!
//! Every transport is single-use. `TransportFactory::create` is called once
//! per dispatch and the result is owned by that dispatch alone. The dispatcher
//! drops its box once `send` returns, so an asynchronous transport must keep
//! whatever the host needs to finish the request (and the observer) alive on
//! its own.

use crate::error::TransportError;

/// Lifecycle of a transport, numbered like `XMLHttpRequest.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

impl ReadyState {
    /// Map a numeric ready state; unknown values read as `Unsent`.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => ReadyState::Opened,
            2 => ReadyState::HeadersReceived,
            3 => ReadyState::Loading,
            4 => ReadyState::Done,
            _ => ReadyState::Unsent,
        }
    }
}

/// Read-only view of a transport, handed to callbacks.
///
/// Before `Done` the status is `0` and the texts are empty.
pub trait TransportHandle {
    fn ready_state(&self) -> ReadyState;

    /// Numeric HTTP status, `0` for network-level failures.
    fn status(&self) -> u16;

    /// Reason phrase such as `"OK"` or `"Not Found"`.
    fn status_text(&self) -> String;

    /// The undecoded response body.
    fn response_text(&self) -> String;
}

/// Observer invoked on every ready-state transition.
pub type ReadyStateObserver = Box<dyn FnMut(&dyn TransportHandle)>;

/// A single-use request transport.
pub trait Transport: TransportHandle {
    /// Register the ready-state observer. Replaces any previous one.
    fn set_observer(&mut self, observer: ReadyStateObserver);

    fn open(&mut self, method: &str, url: &str, asynchronous: bool) -> Result<(), TransportError>;

    fn set_request_header(&mut self, name: &str, value: &str) -> Result<(), TransportError>;

    fn set_with_credentials(&mut self, with_credentials: bool) -> Result<(), TransportError>;

    /// Send the request. In synchronous mode the observer has seen `Done`
    /// by the time this returns.
    ///
    /// A network-level failure is a completed request with status `0`, not an
    /// `Err`: the observer still sees `Done`. `Err` is for faults that leave
    /// no response at all.
    fn send(&mut self, body: Option<&str>) -> Result<(), TransportError>;
}

/// Produces one fresh transport per dispatch.
pub trait TransportFactory {
    fn create(&self) -> Result<Box<dyn Transport>, TransportError>;
}

impl<F> TransportFactory for F
where
    F: Fn() -> Result<Box<dyn Transport>, TransportError>,
{
    fn create(&self) -> Result<Box<dyn Transport>, TransportError> {
        self()
    }
}
