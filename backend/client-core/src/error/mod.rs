pub mod api;
pub mod config;
pub mod download;

pub use api::{ApiError, ErrorKind, NetworkErrorKind};
pub use config::ConfigError;
pub use download::DownloadError;
