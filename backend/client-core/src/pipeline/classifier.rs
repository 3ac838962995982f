//! Response classification.
//!
//! Every exchange ends here. The classifier decides between a resolved
//! envelope and a classified [`ApiError`], fires exactly one user notice for
//! every failure, and runs the session-expiry side effect on 401.

use crate::collaborator::{NoticeKind, Navigator, Notifier};
use crate::credential::Credentials;
use crate::error::{ApiError, NetworkErrorKind};
use crate::pipeline::request::redact;
use crate::pipeline::status_table::{SideEffect, StatusTable};
use crate::transport::{ExchangeFailure, RawResponse};

use common::HttpStatusCode;

use std::sync::Arc;

use log::{debug, error, warn};
use models::Envelope;
use models::envelope::{BusinessStatus, DATA_FIELD, MESSAGE_FIELD, business_status};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const BUSINESS_FALLBACK_MESSAGE: &str = "Request failed";
pub const TIMEOUT_MESSAGE: &str = "Request timed out, please check your network connection";
pub const UNREACHABLE_MESSAGE: &str = "Network unreachable, please check your network";
pub const MISCONFIGURED_MESSAGE: &str = "Request misconfigured";
pub const DECODE_MESSAGE: &str = "Response could not be parsed";

pub struct ResponseClassifier {
    credentials: Credentials,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    status_table: StatusTable,
    login_path: String,
    log_responses: bool,
}

impl ResponseClassifier {
    pub fn new(
        credentials: Credentials,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            notifier,
            navigator,
            status_table: StatusTable::standard(),
            login_path: login_path.into(),
            log_responses: false,
        }
    }

    pub fn with_status_table(mut self, status_table: StatusTable) -> Self {
        self.status_table = status_table;
        self
    }

    pub fn with_response_logging(mut self, enabled: bool) -> Self {
        self.log_responses = enabled;
        self
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Classify a JSON exchange.
    pub fn classify<T>(
        &self,
        outcome: Result<RawResponse, ExchangeFailure>,
    ) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        match outcome {
            Ok(response) => self.resolve_envelope(response),
            Err(failure) => Err(self.reject(failure)),
        }
    }

    /// Classify a blob exchange. Success bodies are returned untouched.
    pub fn classify_blob(
        &self,
        outcome: Result<RawResponse, ExchangeFailure>,
    ) -> Result<Vec<u8>, ApiError> {
        match outcome {
            Ok(response) => {
                if self.log_responses {
                    debug!("Response: {} ({} bytes)", response.url, response.body.len());
                }
                Ok(response.body)
            }
            Err(failure) => Err(self.reject(failure)),
        }
    }

    /// Success path: check the envelope code, then decode into `Envelope<T>`.
    fn resolve_envelope<T>(&self, response: RawResponse) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let mut body: Value = match serde_json::from_slice(&response.body) {
            Ok(body) => body,
            Err(e) => return Err(self.fail_decode(&response.url, e.to_string())),
        };

        if self.log_responses {
            debug!("Response: {} {}", response.url, redact(body.clone()));
        }

        if let BusinessStatus::Failure { code, message } = business_status(&body) {
            let message = message.unwrap_or_else(|| BUSINESS_FALLBACK_MESSAGE.to_string());
            warn!("Business error from {}: code {:?}: {}", response.url, code, message);
            self.notifier.notify(NoticeKind::Error, &message);
            return Err(ApiError::business(code, message));
        }

        // Envelopes without `data` decode as `data: null`.
        if let Value::Object(map) = &mut body {
            map.entry(DATA_FIELD).or_insert(Value::Null);
        }

        serde_json::from_value(body).map_err(|e| self.fail_decode(&response.url, e.to_string()))
    }

    fn fail_decode(&self, url: &str, detail: String) -> ApiError {
        error!("Undecodable response from {}: {}", url, detail);
        self.notifier.notify(NoticeKind::Error, DECODE_MESSAGE);
        ApiError::decode(DECODE_MESSAGE, detail)
    }

    /// Failure path. Notifies once, runs side effects, returns the classified error.
    pub fn reject(&self, failure: ExchangeFailure) -> ApiError {
        match failure {
            ExchangeFailure::Response { status, body } => self.reject_status(status, &body),
            ExchangeFailure::NoResponse { timed_out, detail } => {
                let (kind, message) = if timed_out {
                    (NetworkErrorKind::Timeout, TIMEOUT_MESSAGE)
                } else {
                    (NetworkErrorKind::Unreachable, UNREACHABLE_MESSAGE)
                };
                warn!("Network error ({}): {}", kind, detail);
                self.notifier.notify(NoticeKind::Error, message);
                ApiError::network(kind, message, detail)
            }
            ExchangeFailure::NotSent { detail } => {
                error!("Request not sent: {}", detail);
                self.notifier.notify(NoticeKind::Error, MISCONFIGURED_MESSAGE);
                ApiError::config(MISCONFIGURED_MESSAGE, detail)
            }
        }
    }

    fn reject_status(&self, status: HttpStatusCode, body: &[u8]) -> ApiError {
        let body_message = body_message(body);
        let resolution = self.status_table.resolve(status, body_message.as_deref());

        warn!("HTTP error {}: {}", status, resolution.message);
        self.notifier.notify(NoticeKind::Error, &resolution.message);

        if resolution.side_effect == SideEffect::ExpireSession {
            self.credentials.clear_session();
            self.navigator.redirect_to(&self.login_path);
        }

        ApiError::http(status, resolution.message)
    }
}

/// The `message` of an error body, when the body is an envelope-like object.
fn body_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get(MESSAGE_FIELD)
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
