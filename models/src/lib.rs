//! Wire models for the admin console API.
//!
//! Pure data structures mirroring the JSON exchanged with the backend.
//! Field names are camelCase on the wire and snake_case in Rust.
//!
//! ## Architecture
//!
//! - **models** (this crate): Pure data structures
//! - **client-core**: HTTP access layer and services operating on models
//! - **console**: CLI wiring everything together

pub mod envelope;
pub mod error;
pub mod pagination;
pub mod resource;
pub mod upload;
pub mod user;

#[cfg(test)]
mod tests;

pub use envelope::Envelope;
pub use error::model_error::ModelError;
pub use pagination::{ListParams, PaginationParams, PaginationResponse, SortOrder};
pub use resource::{
    AttachVolumeParams, ComputeInstance, ComputeInstanceDraft, InstanceStatus, StorageVolume,
    StorageVolumeDraft, VolumeStatus, VolumeType,
};
pub use upload::{AvatarUploadResponse, UploadResponse};
pub use user::{
    ChangePasswordParams, LoginParams, LoginResponse, RefreshTokenParams, RefreshTokenResponse,
    UserInfo,
};
