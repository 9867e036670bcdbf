//! Callback types for request outcomes.
//!
//! Callbacks are `Rc`-shared so an `AjaxOptions` stays `Clone` (defaults are
//! merged by cloning). They are not `Send`: completion is delivered on the
//! host's single-threaded event loop.

use std::fmt;
use std::rc::Rc;

use crate::http::ResponseBody;
use crate::transport::TransportHandle;

/// Called for a `2xx` status with (response, status text, handle).
pub type SuccessCallback = Rc<dyn Fn(&ResponseBody, &str, &dyn TransportHandle)>;

/// Called for a `4xx`/`5xx` status or a network failure with (handle, status text).
pub type ErrorCallback = Rc<dyn Fn(&dyn TransportHandle, &str)>;

/// Called when the status matches a `status_code` entry exactly.
pub type StatusCallback = Rc<dyn Fn(StatusArg<'_>, &str, &dyn TransportHandle)>;

/// First argument of a `StatusCallback`.
///
/// On a `2xx` status this is the decoded response, the same value the success
/// callbacks saw; for every other status it is the transport handle.
#[derive(Clone, Copy)]
pub enum StatusArg<'a> {
    Response(&'a ResponseBody),
    Handle(&'a dyn TransportHandle),
}

impl StatusArg<'_> {
    pub fn response(&self) -> Option<&ResponseBody> {
        match self {
            StatusArg::Response(body) => Some(body),
            StatusArg::Handle(_) => None,
        }
    }
}

impl fmt::Debug for StatusArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusArg::Response(body) => f.debug_tuple("Response").field(body).finish(),
            StatusArg::Handle(handle) => f
                .debug_struct("Handle")
                .field("status", &handle.status())
                .finish(),
        }
    }
}

/// One callback or an ordered list of them.
#[derive(Clone)]
pub enum Callbacks<F> {
    Single(F),
    List(Vec<F>),
}

impl<F> Callbacks<F> {
    /// The callbacks in invocation order.
    pub fn as_slice(&self) -> &[F] {
        match self {
            Callbacks::Single(callback) => std::slice::from_ref(callback),
            Callbacks::List(callbacks) => callbacks,
        }
    }

    pub fn into_vec(self) -> Vec<F> {
        match self {
            Callbacks::Single(callback) => vec![callback],
            Callbacks::List(callbacks) => callbacks,
        }
    }

    /// Append `callback`, promoting a single callback to a list.
    pub fn push(self, callback: F) -> Self {
        let mut callbacks = self.into_vec();
        callbacks.push(callback);
        Callbacks::List(callbacks)
    }
}

impl<F> From<Vec<F>> for Callbacks<F> {
    fn from(callbacks: Vec<F>) -> Self {
        Callbacks::List(callbacks)
    }
}

impl<F> fmt::Debug for Callbacks<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callbacks::Single(_) => f.write_str("Single(..)"),
            Callbacks::List(callbacks) => write!(f, "List(len={})", callbacks.len()),
        }
    }
}
