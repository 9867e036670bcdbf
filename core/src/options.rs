//! Request configuration.
//!
//! # Design
//! Every field of `AjaxOptions` is optional; an unset field means "use the
//! default". Defaults are a fresh value from `AjaxOptions::defaults` merged in
//! per dispatch, never a shared global. The data-only fields deserialize from
//! the familiar camelCase option names (`dataType`, `withCredentials`,
//! `async`), so a JSON document can seed a request and callbacks are attached
//! afterwards with the builder methods.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::callbacks::{Callbacks, ErrorCallback, StatusArg, StatusCallback, SuccessCallback};
use crate::http::{HttpMethod, ResponseBody};
use crate::merge::MergeObject;
use crate::transport::TransportHandle;

/// How a successful response body is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Parse the body as JSON; fall back to raw text if it does not parse.
    #[default]
    Json,
    /// Leave the body as raw text. Every data type other than `json` lands here.
    #[serde(other)]
    Text,
}

impl From<&str> for DataType {
    fn from(name: &str) -> Self {
        if name == "json" {
            DataType::Json
        } else {
            DataType::Text
        }
    }
}

/// Options for a single request.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AjaxOptions {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub data: Option<Map<String, Value>>,
    pub data_type: Option<DataType>,
    /// Request headers in the order they are applied.
    #[serde(deserialize_with = "headers_from_map")]
    pub headers: Option<Vec<(String, String)>>,
    pub with_credentials: Option<bool>,
    #[serde(rename = "async")]
    pub asynchronous: Option<bool>,
    #[serde(skip)]
    pub status_code: Option<BTreeMap<u16, StatusCallback>>,
    #[serde(skip)]
    pub success: Option<Callbacks<SuccessCallback>>,
    #[serde(skip)]
    pub error: Option<Callbacks<ErrorCallback>>,
}

impl AjaxOptions {
    /// Options targeting `url`, every other field unset.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// The values filled in for unset fields: `GET`, asynchronous, JSON
    /// decoding and an empty status-code map.
    pub fn defaults() -> Self {
        Self {
            method: Some(HttpMethod::Get),
            asynchronous: Some(true),
            data_type: Some(DataType::Json),
            status_code: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn method(mut self, method: impl Into<HttpMethod>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the payload. Only JSON objects are payloads; `null` clears it and
    /// any other value is ignored.
    pub fn data(mut self, data: Value) -> Self {
        match data {
            Value::Object(map) => self.data = Some(map),
            Value::Null => self.data = None,
            _ => {}
        }
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = Some(with_credentials);
        self
    }

    /// `false` makes `send` block until the request completes.
    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = Some(asynchronous);
        self
    }

    /// Register a callback for exactly `status`, replacing any earlier one.
    pub fn status_code<F>(mut self, status: u16, callback: F) -> Self
    where
        F: Fn(StatusArg<'_>, &str, &dyn TransportHandle) + 'static,
    {
        self.status_code
            .get_or_insert_with(BTreeMap::new)
            .insert(status, Rc::new(callback));
        self
    }

    /// Add a success callback after any already registered.
    pub fn success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ResponseBody, &str, &dyn TransportHandle) + 'static,
    {
        let callback: SuccessCallback = Rc::new(callback);
        self.success = Some(match self.success.take() {
            Some(existing) => existing.push(callback),
            None => Callbacks::Single(callback),
        });
        self
    }

    /// Add an error callback after any already registered.
    pub fn error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn TransportHandle, &str) + 'static,
    {
        let callback: ErrorCallback = Rc::new(callback);
        self.error = Some(match self.error.take() {
            Some(existing) => existing.push(callback),
            None => Callbacks::Single(callback),
        });
        self
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, source: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(source);
    }
}

impl MergeObject for AjaxOptions {
    fn merge_object(&mut self, source: &Self) -> &mut Self {
        fill(&mut self.url, &source.url);
        fill(&mut self.method, &source.method);
        fill(&mut self.data, &source.data);
        fill(&mut self.data_type, &source.data_type);
        fill(&mut self.headers, &source.headers);
        fill(&mut self.with_credentials, &source.with_credentials);
        fill(&mut self.asynchronous, &source.asynchronous);
        fill(&mut self.status_code, &source.status_code);
        fill(&mut self.success, &source.success);
        fill(&mut self.error, &source.error);
        self
    }
}

impl fmt::Debug for AjaxOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AjaxOptions")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("data", &self.data)
            .field("data_type", &self.data_type)
            .field("headers", &self.headers)
            .field("with_credentials", &self.with_credentials)
            .field("asynchronous", &self.asynchronous)
            .field(
                "status_code",
                &self.status_code.as_ref().map(|codes| codes.keys().collect::<Vec<_>>()),
            )
            .field("success", &self.success)
            .field("error", &self.error)
            .finish()
    }
}

/// Accept headers as a JSON object; non-string values are rendered as JSON text.
fn headers_from_map<'de, D>(deserializer: D) -> Result<Option<Vec<(String, String)>>, D::Error>
where
    D: Deserializer<'de>,
{
    let headers: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(headers.map(|map| {
        map.into_iter()
            .map(|(name, value)| match value {
                Value::String(text) => (name, text),
                other => (name, other.to_string()),
            })
            .collect()
    }))
}
