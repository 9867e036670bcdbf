//! In-memory transport for dispatcher tests.
//!
//! `FakeNetwork` hands out `FakeTransport`s, records every request they send,
//! and answers with queued canned responses. Synchronous requests complete
//! inside `send`; asynchronous ones wait in a queue until `run_until_idle`,
//! which stands in for the browser's event loop.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use noquery::{ReadyState, ReadyStateObserver, Transport, TransportError, TransportHandle};

/// A request as the transport saw it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sent {
    pub method: String,
    pub url: String,
    pub asynchronous: bool,
    pub headers: Vec<(String, String)>,
    pub with_credentials: Option<bool>,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    status_text: String,
    body: String,
}

#[derive(Default)]
struct NetworkState {
    responses: VecDeque<Canned>,
    sent: Vec<Sent>,
    pending: VecDeque<(Rc<RefCell<XhrState>>, Canned)>,
    created: usize,
    reject_open: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeNetwork {
    state: Rc<RefCell<NetworkState>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next request sent.
    pub fn respond(&self, status: u16, status_text: &str, body: &str) -> &Self {
        self.state.borrow_mut().responses.push_back(Canned {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        });
        self
    }

    /// Make every `open` fail with `message`.
    pub fn reject_open(&self, message: &str) {
        self.state.borrow_mut().reject_open = Some(message.to_string());
    }

    pub fn factory(&self) -> impl Fn() -> Result<Box<dyn Transport>, TransportError> {
        let network = self.clone();
        move || {
            network.state.borrow_mut().created += 1;
            Ok(Box::new(FakeTransport {
                network: network.clone(),
                xhr: Rc::new(RefCell::new(XhrState::default())),
            }) as Box<dyn Transport>)
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.borrow().sent.clone()
    }

    pub fn created(&self) -> usize {
        self.state.borrow().created
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Complete every queued asynchronous request, oldest first.
    pub fn run_until_idle(&self) {
        loop {
            let next = self.state.borrow_mut().pending.pop_front();
            match next {
                Some((xhr, canned)) => complete(&xhr, canned),
                None => break,
            }
        }
    }
}

#[derive(Default)]
struct XhrState {
    ready_state: Option<ReadyState>,
    status: u16,
    status_text: String,
    body: String,
    request: Sent,
    observer: Option<ReadyStateObserver>,
}

impl XhrState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            ready_state: self.ready_state.unwrap_or(ReadyState::Unsent),
            status: self.status,
            status_text: self.status_text.clone(),
            body: self.body.clone(),
        }
    }
}

/// What an observer or callback sees of the transport at one instant.
struct Snapshot {
    ready_state: ReadyState,
    status: u16,
    status_text: String,
    body: String,
}

impl TransportHandle for Snapshot {
    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }
    fn status(&self) -> u16 {
        self.status
    }
    fn status_text(&self) -> String {
        self.status_text.clone()
    }
    fn response_text(&self) -> String {
        self.body.clone()
    }
}

/// Move `xhr` to `state` and notify its observer without holding a borrow.
fn transition(xhr: &Rc<RefCell<XhrState>>, state: ReadyState) {
    let (mut observer, snapshot) = {
        let mut inner = xhr.borrow_mut();
        inner.ready_state = Some(state);
        (inner.observer.take(), inner.snapshot())
    };
    if let Some(observer) = observer.as_mut() {
        observer(&snapshot);
    }
    xhr.borrow_mut().observer = observer;
}

fn complete(xhr: &Rc<RefCell<XhrState>>, canned: Canned) {
    {
        let mut inner = xhr.borrow_mut();
        inner.status = canned.status;
        inner.status_text = canned.status_text;
        inner.body = canned.body;
    }
    transition(xhr, ReadyState::HeadersReceived);
    transition(xhr, ReadyState::Loading);
    transition(xhr, ReadyState::Done);
}

pub struct FakeTransport {
    network: FakeNetwork,
    xhr: Rc<RefCell<XhrState>>,
}

impl TransportHandle for FakeTransport {
    fn ready_state(&self) -> ReadyState {
        self.xhr.borrow().snapshot().ready_state
    }
    fn status(&self) -> u16 {
        self.xhr.borrow().status
    }
    fn status_text(&self) -> String {
        self.xhr.borrow().status_text.clone()
    }
    fn response_text(&self) -> String {
        self.xhr.borrow().body.clone()
    }
}

impl Transport for FakeTransport {
    fn set_observer(&mut self, observer: ReadyStateObserver) {
        self.xhr.borrow_mut().observer = Some(observer);
    }

    fn open(&mut self, method: &str, url: &str, asynchronous: bool) -> Result<(), TransportError> {
        if let Some(message) = self.network.state.borrow().reject_open.clone() {
            return Err(TransportError::Open {
                method: method.to_string(),
                url: url.to_string(),
                message,
            });
        }
        {
            let mut inner = self.xhr.borrow_mut();
            inner.request.method = method.to_string();
            inner.request.url = url.to_string();
            inner.request.asynchronous = asynchronous;
        }
        transition(&self.xhr, ReadyState::Opened);
        Ok(())
    }

    fn set_request_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        self.xhr
            .borrow_mut()
            .request
            .headers
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_with_credentials(&mut self, with_credentials: bool) -> Result<(), TransportError> {
        self.xhr.borrow_mut().request.with_credentials = Some(with_credentials);
        Ok(())
    }

    fn send(&mut self, body: Option<&str>) -> Result<(), TransportError> {
        let request = {
            let mut inner = self.xhr.borrow_mut();
            inner.request.body = body.map(str::to_string);
            inner.request.clone()
        };
        let canned = {
            let mut network = self.network.state.borrow_mut();
            network.sent.push(request.clone());
            network.responses.pop_front().ok_or_else(|| {
                TransportError::Send(format!("no canned response for {}", request.url))
            })?
        };
        if request.asynchronous {
            self.network
                .state
                .borrow_mut()
                .pending
                .push_back((Rc::clone(&self.xhr), canned));
        } else {
            complete(&self.xhr, canned);
        }
        Ok(())
    }
}

/// Shared, ordered record of callback invocations.
#[derive(Clone, Default)]
pub struct Calls(Rc<RefCell<Vec<String>>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn list(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}
