//! Feature services built on the API facade.
//!
//! Thin, typed wrappers: one method per endpoint. None of them notify the
//! user on failure; the pipeline already did.

pub mod compute;
pub mod storage;
pub mod user;

pub use compute::ComputeService;
pub use storage::StorageService;
pub use user::UserService;
