use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RedactError {
    /// A redacted secret was handed to a serializer.
    #[error("Redacted Value Serialization Error: {type_name} must be read explicitly {location}")]
    Serialization {
        type_name: &'static str,
        location: ErrorLocation,
    },
}
