//! Shared primitives for the admin console workspace.
//!
//! Everything here is dependency-light and used by every other crate:
//!
//! - **ErrorLocation**: file/line/column captured with `#[track_caller]`
//! - **HttpStatusCode**: status categorisation without string parsing
//! - **RedactedToken**: bearer credential that never leaks through logs
//!
//! ## Architecture
//!
//! - **common** (this crate): primitives
//! - **models**: wire data structures
//! - **client-core**: HTTP access layer operating on models
//! - **console**: CLI wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_token;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;
