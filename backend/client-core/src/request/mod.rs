//! Per-call request description.
//!
//! A [`RequestDescriptor`] is a plain value. Interceptors take one by value
//! and hand back a new one; nothing mutates a descriptor that is in flight.

pub mod query;
pub mod upload;

pub use upload::{FILE_FIELD_NAME, MultipartPayload, UploadFile};

use common::RedactedToken;

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Body is an envelope.
    #[default]
    Json,
    /// Body is raw bytes, envelope parsing is skipped.
    Blob,
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    authorization: Option<RedactedToken>,
    body: RequestBody,
    response_type: ResponseType,
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            authorization: None,
            body: RequestBody::Empty,
            response_type: ResponseType::Json,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set `key` to a single value, dropping any earlier pairs with that key.
    pub fn replace_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.query.retain(|(existing, _)| *existing != key);
        self.query.push((key, value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_authorization(mut self, token: RedactedToken) -> Self {
        self.authorization = Some(token);
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn authorization(&self) -> Option<&RedactedToken> {
        self.authorization.as_ref()
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
