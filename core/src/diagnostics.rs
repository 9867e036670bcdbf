//! Non-fatal diagnostics and where they go.
//!
//! # Design
//! The dispatcher never prints. Anything worth telling the caller that is not
//! an outcome (a missing url, a body that is not JSON, a transport that
//! refused to open) becomes a `Diagnostic` handed to the injected
//! `DiagnosticSink`. `TracingSink` is the default; `MemorySink` captures
//! diagnostics for assertions and `NullSink` drops them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{AjaxError, TransportError};

/// Something the caller should know about that did not go through a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The options carried no `url`; nothing was sent.
    MissingUrl,

    /// A `2xx` body failed to parse as JSON; callbacks got the raw text.
    InvalidJson { status: u16, detail: String },

    /// The transport rejected the request before it was sent.
    Transport(TransportError),
}

impl Diagnostic {
    /// Whether the request was abandoned because of this diagnostic.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Diagnostic::InvalidJson { .. })
    }
}

impl From<&AjaxError> for Diagnostic {
    fn from(err: &AjaxError) -> Self {
        match err {
            AjaxError::MissingUrl => Diagnostic::MissingUrl,
            AjaxError::Transport(inner) => Diagnostic::Transport(inner.clone()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingUrl => write!(f, "No url provided"),
            Diagnostic::InvalidJson { status, detail } => write!(
                f,
                "Server response is not valid json, although dataType was specified as json (status {status}: {detail})"
            ),
            Diagnostic::Transport(err) => write!(f, "{err}"),
        }
    }
}

/// Receives diagnostics from the dispatcher.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Emits diagnostics as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::MissingUrl => tracing::error!("{diagnostic}"),
            Diagnostic::InvalidJson { status, detail } => {
                tracing::warn!(
                    status,
                    detail = %detail,
                    "response is not valid json, using raw text"
                )
            }
            Diagnostic::Transport(err) => {
                tracing::error!(error = %err, "transport rejected request")
            }
        }
    }
}

/// Keeps every diagnostic in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Rc<RefCell<Vec<Diagnostic>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.entries.borrow_mut().push(diagnostic.clone());
    }
}

/// Drops every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}
