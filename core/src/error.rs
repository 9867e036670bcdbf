//! Error types for request dispatch.
//!
//! # Design
//! `AjaxError` is what `Ajax::ajax` hands back when a request never reaches
//! the network. Failures that happen *after* the request is sent (HTTP 4xx/5xx,
//! status 0) are not errors at this level: they are outcomes, delivered through
//! the error callbacks.

use thiserror::Error;

/// Errors returned by `Ajax::ajax` before any response is observed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AjaxError {
    /// The options carried no `url`.
    #[error("No url provided")]
    MissingUrl,

    /// The transport refused one of the setup steps.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Faults raised by a `Transport` implementation while setting up a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No transport could be constructed.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// `open` rejected the method or url.
    #[error("failed to open {method} {url}: {message}")]
    Open {
        method: String,
        url: String,
        message: String,
    },

    /// A request header was rejected.
    #[error("failed to set header {name}: {message}")]
    Header { name: String, message: String },

    /// The credentials flag could not be applied.
    #[error("failed to set withCredentials: {0}")]
    Credentials(String),

    /// `send` failed synchronously.
    #[error("failed to send request: {0}")]
    Send(String),
}

/// A response body that failed to parse as JSON.
///
/// Carries the raw text so the caller can fall back to it.
#[derive(Debug, Error)]
#[error("Server response is not valid json, although dataType was specified as json")]
pub struct DecodeError {
    raw: String,
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub(crate) fn new(raw: String, source: serde_json::Error) -> Self {
        Self { raw, source }
    }

    /// The parser's own message, e.g. `expected value at line 1 column 1`.
    pub fn detail(&self) -> String {
        self.source.to_string()
    }

    /// Give back the undecoded body.
    pub fn into_raw(self) -> String {
        self.raw
    }
}
