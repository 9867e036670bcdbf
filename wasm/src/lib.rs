//! Browser bindings for `noquery`.
//!
//! # Overview
//! Exposes `ajax`, `serialize` and `mergeObject` to JavaScript with the
//! familiar option names (`url`, `method`, `data`, `dataType`, `headers`,
//! `withCredentials`, `async`, `statusCode`, `success`, `error`). Requests go
//! through `XMLHttpRequest`; diagnostics go to the browser console.
//!
//! # Design
//! - `types` holds the conversions that do not need a browser, so they are
//!   unit tested natively.
//! - Everything touching `web-sys` lives in `api` and `xhr` and compiles only
//!   for `wasm32`.
//! - Dispatch failures are reported to the console and never thrown, so
//!   `ajax` behaves like a fire-and-forget call. Only a malformed options
//!   object raises.

pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod api;
#[cfg(target_arch = "wasm32")]
pub mod xhr;
