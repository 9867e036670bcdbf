//! A small `$.ajax`-style request helper.
//!
//! # Overview
//! Describe a request with `AjaxOptions`, hand it to `Ajax::ajax`, and get the
//! outcome through callbacks: success for `2xx`, error for `4xx`/`5xx` and
//! network failures, plus optional per-status callbacks. The payload is
//! flattened into a query string (`serialize`) and defaults are filled in
//! with a shallow merge (`merge_object`).
//!
//! # Design
//! - The dispatcher never does I/O itself. It drives a `Transport` obtained
//!   from an injected `TransportFactory`; the browser binding supplies one
//!   over `XMLHttpRequest`, tests supply in-memory ones.
//! - Request building is a pure step (`HttpRequest::from_options`).
//! - Diagnostics go to an injected `DiagnosticSink`, `tracing` by default.
//! - Callbacks are `Rc`-based and run on the caller's thread.
//!
//! ```
//! use noquery::{serialize, AjaxOptions, HttpRequest};
//! use serde_json::json;
//!
//! let options = AjaxOptions::new("/search").data(json!({"q": "rust", "page": {"n": 2}}));
//! let request = HttpRequest::from_options(&options).unwrap();
//! assert_eq!(request.url, "/search?q=rust&page%5Bn%5D=2");
//! assert_eq!(serialize(json!({}).as_object().unwrap()), "");
//! ```

pub mod callbacks;
pub mod client;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod merge;
pub mod options;
pub mod serialize;
pub mod transport;

pub use callbacks::{Callbacks, ErrorCallback, StatusArg, StatusCallback, SuccessCallback};
pub use client::{ajax, Ajax};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, NullSink, TracingSink};
pub use error::{AjaxError, DecodeError, TransportError};
pub use http::{HttpMethod, HttpRequest, ResponseBody, StatusClass, FORM_CONTENT_TYPE};
pub use merge::{merge_object, MergeObject};
pub use options::{AjaxOptions, DataType};
pub use serialize::{encode_uri_component, serialize};
pub use transport::{ReadyState, ReadyStateObserver, Transport, TransportFactory, TransportHandle};
