use crate::error::api::ApiError;

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DownloadError {
    /// The request itself failed and was already classified.
    #[error(transparent)]
    Request(#[from] ApiError),

    /// The payload arrived but could not be materialized or saved.
    #[error("Download Save Error: {filename}: {source} {location}")]
    Save {
        filename: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl DownloadError {
    #[track_caller]
    pub fn save(filename: impl Into<String>, source: std::io::Error) -> Self {
        DownloadError::Save {
            filename: filename.into(),
            source,
            location: ErrorLocation::caller(),
        }
    }
}
