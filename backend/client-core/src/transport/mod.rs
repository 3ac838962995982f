//! reqwest-backed transport.
//!
//! Turns a [`RequestDescriptor`] into one HTTP exchange and reports what
//! happened as either a [`RawResponse`] (2xx) or an [`ExchangeFailure`] that
//! records how far the exchange got. Classification happens elsewhere.

use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::request::{FILE_FIELD_NAME, MultipartPayload, RequestBody, RequestDescriptor};

use common::{ErrorLocation, HttpStatusCode};

use std::str::FromStr;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Request};
use url::Url;

/// A 2xx response with its body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: HttpStatusCode,
    pub url: String,
    pub body: Vec<u8>,
}

/// How far a failed exchange got.
#[derive(Debug, Clone)]
pub enum ExchangeFailure {
    /// The server answered with a non-2xx status.
    Response {
        status: HttpStatusCode,
        body: Vec<u8>,
    },
    /// The request was sent but no response arrived.
    NoResponse { timed_out: bool, detail: String },
    /// The request could not be built; nothing was sent.
    NotSent { detail: String },
}

impl ExchangeFailure {
    pub fn not_sent(detail: impl Into<String>) -> Self {
        ExchangeFailure::NotSent {
            detail: detail.into(),
        }
    }

    fn from_send_error(error: &reqwest::Error) -> Self {
        if error.is_builder() {
            return ExchangeFailure::not_sent(error.to_string());
        }
        ExchangeFailure::NoResponse {
            timed_out: error.is_timeout(),
            detail: error.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Transport {
    base_url: Url,
    client: Client,
}

impl Transport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ConfigError::validation(format!("Invalid base_url '{}': {}", base_url, e))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::ClientBuild {
                location: ErrorLocation::caller(),
                reason: e.to_string(),
            })?;

        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a descriptor url against the base url.
    ///
    /// Absolute urls pass through. Relative urls are appended to the base
    /// path, so `/users` under `http://host/api/` becomes `http://host/api/users`.
    pub fn resolve_url(&self, url: &str) -> Result<Url, ExchangeFailure> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Url::parse(url)
                .map_err(|e| ExchangeFailure::not_sent(format!("invalid url '{url}': {e}")));
        }

        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            url.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| ExchangeFailure::not_sent(format!("invalid url '{joined}': {e}")))
    }

    /// Build the reqwest request. Any failure here means nothing was sent.
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<Request, ExchangeFailure> {
        let mut url = self.resolve_url(descriptor.url())?;
        if !descriptor.query().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in descriptor.query() {
                pairs.append_pair(key, value);
            }
        }

        let mut builder = self.client.request(descriptor.method().clone(), url);

        for (name, value) in descriptor.headers() {
            let name = HeaderName::from_str(name).map_err(|e| {
                ExchangeFailure::not_sent(format!("invalid header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ExchangeFailure::not_sent(format!("invalid header value for '{name}': {e}"))
            })?;
            builder = builder.header(name, value);
        }

        if let Some(token) = descriptor.authorization() {
            let mut value = HeaderValue::from_str(&token.bearer_header()).map_err(|_| {
                ExchangeFailure::not_sent("credential contains characters not allowed in a header")
            })?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        builder = match descriptor.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(payload) => builder.multipart(multipart_form(payload)?),
        };

        if let Some(timeout) = descriptor.timeout() {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| ExchangeFailure::not_sent(e.to_string()))
    }

    /// Perform one exchange.
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<RawResponse, ExchangeFailure> {
        let request = self.build_request(descriptor)?;
        let url = request.url().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ExchangeFailure::from_send_error(&e))?;

        let status = HttpStatusCode(response.status().as_u16());
        debug!("{} {} -> {}", descriptor.method(), url, status);

        if !status.is_success() {
            // The status alone classifies the failure; a truncated error body only loses its message.
            let body = match response.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    warn!("Failed to read {} error body from {}: {}", status, url, e);
                    Vec::new()
                }
            };
            return Err(ExchangeFailure::Response { status, body });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ExchangeFailure::from_send_error(&e))?
            .to_vec();

        Ok(RawResponse { status, url, body })
    }
}

fn multipart_form(payload: &MultipartPayload) -> Result<Form, ExchangeFailure> {
    let mut part =
        Part::bytes(payload.file.content.clone()).file_name(payload.file.file_name.clone());
    if let Some(mime) = &payload.file.mime_type {
        part = part
            .mime_str(mime)
            .map_err(|e| ExchangeFailure::not_sent(format!("invalid mime type '{mime}': {e}")))?;
    }

    let mut form = Form::new().part(FILE_FIELD_NAME, part);
    for (key, value) in &payload.fields {
        form = form.text(key.clone(), value.clone());
    }
    Ok(form)
}
