pub mod api;
pub mod collaborator;
pub mod config;
pub mod credential;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod services;
pub mod transport;

#[cfg(test)]
mod tests;

pub use api::ApiClient;
pub use error::{ApiError, DownloadError, ErrorKind, NetworkErrorKind};

pub const API_SERVER_HOSTNAME: &str = "127.0.0.1";
pub const API_SERVER_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = const_format::concatcp!(
    "http://",
    API_SERVER_HOSTNAME,
    ":",
    API_SERVER_PORT,
    "/api/"
);
pub const LOGIN_PATH: &str = "/login";
