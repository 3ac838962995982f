//! Credential persistence behind a small key-value seam.
//!
//! The access layer never touches a storage medium directly. It reads and
//! clears two entries through [`CredentialStore`]:
//! - [`keys::TOKEN`]: the bearer token
//! - [`keys::USER_INFO`]: the cached user profile (JSON)
//!
//! # Stores
//! - [`MemoryCredentialStore`]: process lifetime only, used by tests
//! - [`FileCredentialStore`]: JSON file, survives restarts

pub mod file;
pub mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use common::RedactedToken;

use std::sync::Arc;

use log::{info, warn};
use models::UserInfo;

pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER_INFO: &str = "userInfo";
}

/// Synchronous key-value store for credentials.
///
/// Implementations swallow their own I/O failures (logging them) and report
/// a missing value instead; a broken store must never fail a request.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    /// Remove every entry this store owns.
    fn clear(&self);

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Typed view over a [`CredentialStore`].
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn CredentialStore>,
}

impl Credentials {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Stored token, if any. Empty strings count as absent.
    pub fn token(&self) -> Option<RedactedToken> {
        self.store
            .get(keys::TOKEN)
            .filter(|token| !token.is_empty())
            .map(RedactedToken::new)
    }

    pub fn set_token(&self, token: &RedactedToken) {
        self.store.set(keys::TOKEN, token.as_str());
        info!("Credential stored ({} chars)", token.len());
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        let raw = self.store.get(keys::USER_INFO)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Cached user profile is unreadable, ignoring: {}", e);
                None
            }
        }
    }

    pub fn set_user_info(&self, user: &UserInfo) {
        match serde_json::to_string(user) {
            Ok(raw) => self.store.set(keys::USER_INFO, &raw),
            Err(e) => warn!("Failed to cache user profile: {}", e),
        }
    }

    /// Drop the token and the cached profile.
    pub fn clear_session(&self) {
        self.store.remove(keys::TOKEN);
        self.store.remove(keys::USER_INFO);
        info!("Credential and cached profile cleared");
    }
}
