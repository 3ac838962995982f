//! Classified request errors.
//!
//! Key design decisions:
//! - One variant per outcome class, decided by which part of the exchange exists
//! - `message` is the exact text shown to the user, `detail` is for logs
//! - HTTP status codes stored directly (not parsed from strings)
//! - All errors include ErrorLocation for debugging

use common::{ErrorLocation, HttpStatusCode};

use std::fmt;

use thiserror::Error as ThisError;

/// Why no response came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Unreachable,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Discriminant of [`ApiError`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Business,
    Http,
    Network(NetworkErrorKind),
    Config,
    Decode,
}

/// Errors returned by every verb of the API facade.
///
/// By the time a caller sees one of these, the user has already been notified.
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Transport succeeded, envelope `code` says the operation failed.
    #[error("Business Error: {message} (code {code:?}) {location}")]
    Business {
        code: Option<i64>,
        message: String,
        location: ErrorLocation,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP Error: {status} - {message} {location}")]
    Http {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    /// The request left the client but nothing came back.
    #[error("Network Error ({kind}): {message} - {detail} {location}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
        detail: String,
        location: ErrorLocation,
    },

    /// The request never left the client.
    #[error("Config Error: {message} - {detail} {location}")]
    Config {
        message: String,
        detail: String,
        location: ErrorLocation,
    },

    /// A 2xx body did not match the expected envelope shape.
    #[error("Decode Error: {message} - {detail} {location}")]
    Decode {
        message: String,
        detail: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn business(code: Option<i64>, message: impl Into<String>) -> Self {
        ApiError::Business {
            code,
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn http(status: HttpStatusCode, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn network(
        kind: NetworkErrorKind,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        ApiError::Network {
            kind,
            message: message.into(),
            detail: detail.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn config(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Config {
            message: message.into(),
            detail: detail.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Decode {
            message: message.into(),
            detail: detail.into(),
            location: ErrorLocation::caller(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Business { .. } => ErrorKind::Business,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Network { kind, .. } => ErrorKind::Network(*kind),
            ApiError::Config { .. } => ErrorKind::Config,
            ApiError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// The text the user was notified with.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Business { message, .. }
            | ApiError::Http { message, .. }
            | ApiError::Network { message, .. }
            | ApiError::Config { message, .. }
            | ApiError::Decode { message, .. } => message,
        }
    }

    /// Get HTTP status code if applicable.
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Business code if applicable.
    pub fn business_code(&self) -> Option<i64> {
        match self {
            ApiError::Business { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code().is_some_and(|s| s.is_unauthorized())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ApiError::Network {
                kind: NetworkErrorKind::Timeout,
                ..
            }
        )
    }

    /// Get error category for logs.
    pub fn error_category(&self) -> &'static str {
        match self {
            ApiError::Business { .. } => "business",
            ApiError::Http { status, .. } if status.is_unauthorized() => "unauthorized",
            ApiError::Http { status, .. } if status.is_client_error() => "client_error",
            ApiError::Http { status, .. } if status.is_server_error() => "server_error",
            ApiError::Http { .. } => "http",
            ApiError::Network {
                kind: NetworkErrorKind::Timeout,
                ..
            } => "timeout",
            ApiError::Network { .. } => "unreachable",
            ApiError::Config { .. } => "config",
            ApiError::Decode { .. } => "decode",
        }
    }
}
