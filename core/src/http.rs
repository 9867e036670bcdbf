//! HTTP request and response types as plain data.
//!
//! # Design
//! `HttpRequest::from_options` turns merged `AjaxOptions` into exactly what
//! the transport will be told to do: method, full target, headers in the order
//! they are applied, and the body. It never touches a transport, so request
//! building is tested without one. The response side is just as small:
//! `StatusClass` buckets a status code and `ResponseBody` holds the decoded
//! (or raw) body.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AjaxError, DecodeError};
use crate::options::{AjaxOptions, DataType};
use crate::serialize::serialize;

/// Content type for POST bodies built by `serialize`.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
///
/// Standard verbs parse case-insensitively; anything else is kept verbatim
/// and left to the transport to accept or reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Other(token) => token,
        }
    }
}

impl From<&str> for HttpMethod {
    fn from(token: &str) -> Self {
        match token.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            _ => HttpMethod::Other(token.to_string()),
        }
    }
}

impl From<String> for HttpMethod {
    fn from(token: String) -> Self {
        HttpMethod::from(token.as_str())
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl FromStr for HttpMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HttpMethod::from(s))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request described as plain data, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Full target. For non-POST requests this includes the query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub asynchronous: bool,
    pub with_credentials: Option<bool>,
}

impl HttpRequest {
    /// Build the request described by `options`.
    ///
    /// POST sends the serialized `data` as a form body on the bare url; every
    /// other method appends it as `?query` when it is non-empty. Fields left
    /// unset fall back to the values of `AjaxOptions::defaults`.
    pub fn from_options(options: &AjaxOptions) -> Result<Self, AjaxError> {
        let url = options.url.as_deref().ok_or(AjaxError::MissingUrl)?;
        let method = options.method.clone().unwrap_or_default();
        let encoded = options.data.as_ref().map(serialize).unwrap_or_default();
        let caller_headers = options.headers.iter().flatten().cloned();

        let (url, headers, body) = if method == HttpMethod::Post {
            let content_type = ("Content-type".to_string(), FORM_CONTENT_TYPE.to_string());
            let headers = std::iter::once(content_type).chain(caller_headers).collect();
            (url.to_string(), headers, Some(encoded))
        } else {
            let url = if encoded.is_empty() {
                url.to_string()
            } else {
                format!("{url}?{encoded}")
            };
            (url, caller_headers.collect(), None)
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            asynchronous: options.asynchronous.unwrap_or(true),
            with_credentials: options.with_credentials,
        })
    }
}

/// Which callback family a status code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// `200..300`
    Success,
    /// `400..600`, or `0` for a network-level failure.
    Error,
    /// Anything else, e.g. `1xx` or `3xx`.
    Other,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            0 | 400..=599 => StatusClass::Error,
            _ => StatusClass::Other,
        }
    }
}

/// A response body after applying the requested `DataType`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Decode `text` according to `data_type`.
    ///
    /// Only `DataType::Json` parses; on failure the error carries the raw text
    /// back so the caller can still deliver it.
    pub fn decode(text: String, data_type: &DataType) -> Result<Self, DecodeError> {
        match data_type {
            DataType::Json => match serde_json::from_str(&text) {
                Ok(value) => Ok(ResponseBody::Json(value)),
                Err(source) => Err(DecodeError::new(text, source)),
            },
            DataType::Text => Ok(ResponseBody::Text(text)),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }
}
