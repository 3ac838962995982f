//! Request interceptors.
//!
//! Each interceptor receives the descriptor produced by the previous one.
//! The standard chain is auth header, cache-busting, then diagnostic logging.

use crate::credential::Credentials;
use crate::request::{RequestBody, RequestDescriptor};
use crate::transport::ExchangeFailure;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use reqwest::Method;
use serde_json::Value;

/// Query parameter appended to every GET.
pub const CACHE_BUST_PARAM: &str = "_t";

const REDACTED_FIELD_MARKERS: [&str; 3] = ["password", "token", "secret"];

/// One stage of the outgoing pipeline.
///
/// Returning an error aborts the call before anything is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, descriptor: RequestDescriptor) -> Result<RequestDescriptor, ExchangeFailure>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(RequestDescriptor) -> Result<RequestDescriptor, ExchangeFailure> + Send + Sync,
{
    fn intercept(&self, descriptor: RequestDescriptor) -> Result<RequestDescriptor, ExchangeFailure> {
        self(descriptor)
    }
}

/// Attaches `Authorization: Bearer <token>` when a credential is stored.
pub struct AuthHeaderInterceptor {
    credentials: Credentials,
}

impl AuthHeaderInterceptor {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl RequestInterceptor for AuthHeaderInterceptor {
    fn intercept(&self, descriptor: RequestDescriptor) -> Result<RequestDescriptor, ExchangeFailure> {
        Ok(match self.credentials.token() {
            Some(token) => descriptor.with_authorization(token),
            None => descriptor,
        })
    }
}

/// Appends `_t=<epoch millis>` to GET requests.
///
/// Stamps are strictly increasing for the lifetime of the interceptor, even
/// when two requests are issued within the same millisecond or the wall clock
/// steps backwards.
#[derive(Debug, Default)]
pub struct CacheBustInterceptor {
    last_stamp: AtomicU64,
}

impl CacheBustInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut last = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self.last_stamp.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

impl RequestInterceptor for CacheBustInterceptor {
    fn intercept(&self, descriptor: RequestDescriptor) -> Result<RequestDescriptor, ExchangeFailure> {
        if *descriptor.method() != Method::GET {
            return Ok(descriptor);
        }
        let stamp = self.next_stamp();
        Ok(descriptor.replace_query_param(CACHE_BUST_PARAM, stamp.to_string()))
    }
}

/// Logs method, url, params and body at debug level when enabled.
///
/// Disabled by default in release builds; see `ClientConfig::debug_requests`.
#[derive(Debug, Clone, Copy)]
pub struct RequestLogInterceptor {
    enabled: bool,
}

impl RequestLogInterceptor {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl RequestInterceptor for RequestLogInterceptor {
    fn intercept(&self, descriptor: RequestDescriptor) -> Result<RequestDescriptor, ExchangeFailure> {
        if self.enabled {
            debug!(
                "Request: {} {} params={:?} body={}",
                descriptor.method(),
                descriptor.url(),
                descriptor.query(),
                describe_body(descriptor.body())
            );
        }
        Ok(descriptor)
    }
}

fn describe_body(body: &RequestBody) -> String {
    match body {
        RequestBody::Empty => "-".to_string(),
        RequestBody::Json(value) => redact(value.clone()).to_string(),
        RequestBody::Multipart(payload) => format!(
            "multipart(file={}, {} bytes, fields={:?})",
            payload.file.file_name,
            payload.file.content.len(),
            payload.fields
        ),
    }
}

/// Replace values of secret-looking keys before they reach a log line.
pub(crate) fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let lowered = key.to_ascii_lowercase();
                    if REDACTED_FIELD_MARKERS.iter().any(|m| lowered.contains(m)) {
                        (key, Value::String("[REDACTED]".to_string()))
                    } else {
                        (key, redact(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}
