use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors that end a console invocation.
///
/// API failures have already been shown to the user by the notifier, so
/// [`ConsoleError::Request`] only carries enough to set the exit code and log.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ConsoleError {
    /// Error from this app (filesystem, logger, arguments)
    #[error("Console Error: {message} {location}")]
    Console {
        message: String,
        location: ErrorLocation,
    },

    /// Config could not be loaded or the client could not be built
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// A request failed; the user was already notified
    #[error("Request Error: {message} {location}")]
    Request {
        message: String,
        location: ErrorLocation,
    },

    /// The command needs a stored credential
    #[error("Not Logged In Error: {message} {location}")]
    NotLoggedIn {
        message: String,
        location: ErrorLocation,
    },
}

impl ConsoleError {
    #[track_caller]
    pub fn console(message: impl Into<String>) -> Self {
        ConsoleError::Console {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn config(err: impl std::fmt::Display) -> Self {
        ConsoleError::Config {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn request(err: impl std::fmt::Display) -> Self {
        ConsoleError::Request {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_logged_in() -> Self {
        ConsoleError::NotLoggedIn {
            message: "Run `console login` first".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConsoleError::Console { .. } => 1,
            ConsoleError::Config { .. } => 78,
            ConsoleError::Request { .. } => 2,
            ConsoleError::NotLoggedIn { .. } => 3,
        }
    }
}
