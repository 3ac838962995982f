// Unit tests for credential stores
// Tests persistence across reopen, prefix isolation and corrupt-file recovery

use crate::credential::{
    CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore, keys,
};

use common::RedactedToken;

use std::sync::Arc;

use models::UserInfo;
use tempfile::TempDir;

fn user() -> UserInfo {
    UserInfo {
        id: "1".to_string(),
        username: "admin".to_string(),
        nickname: None,
        email: Some("admin@example.com".to_string()),
        phone: None,
        avatar: None,
        role: "admin".to_string(),
        status: 1,
        last_login_time: None,
    }
}

/// **VALUE**: The file store survives a reopen, like a browser store survives a reload.
///
/// **WHY THIS MATTERS**: Users expect to stay logged in between CLI invocations.
#[test]
fn given_file_store_when_reopened_then_token_persists() {
    let dir = TempDir::new().unwrap();

    let store = FileCredentialStore::open(dir.path(), "app_");
    store.set(keys::TOKEN, "abc");
    drop(store);

    let reopened = FileCredentialStore::open(dir.path(), "app_");
    assert_eq!(reopened.get(keys::TOKEN), Some("abc".to_string()));
    assert!(reopened.has(keys::TOKEN));
}

/// **VALUE**: Prefixes isolate stores sharing a file, and `clear` only removes its own keys.
#[test]
fn given_two_prefixes_when_one_cleared_then_other_survives() {
    let dir = TempDir::new().unwrap();
    let app = FileCredentialStore::open(dir.path(), "app_");
    app.set(keys::TOKEN, "abc");

    let user_store = FileCredentialStore::open(dir.path(), "user_");
    user_store.set(keys::TOKEN, "other");
    app.clear();

    let reopened_user = FileCredentialStore::open(dir.path(), "user_");
    assert_eq!(reopened_user.get(keys::TOKEN), Some("other".to_string()));
    assert_eq!(app.get(keys::TOKEN), None);
}

/// **VALUE**: A corrupt credential file starts an empty store instead of failing.
///
/// **BUG THIS CATCHES**: Would catch a panic or error bubbling out of `open`, which would
/// make the whole client unusable until the user deletes the file by hand.
#[test]
fn given_corrupt_file_when_opened_then_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::open(dir.path(), "app_");
    std::fs::write(store.path(), "{not json").unwrap();

    let reopened = FileCredentialStore::open(dir.path(), "app_");

    assert_eq!(reopened.get(keys::TOKEN), None);
}

/// **VALUE**: Typed helpers round the profile through JSON and clear both entries together.
#[test]
fn given_session_when_cleared_then_token_and_profile_absent() {
    let store = Arc::new(MemoryCredentialStore::new());
    let credentials = Credentials::new(store.clone());

    credentials.set_token(&RedactedToken::new("abc"));
    credentials.set_user_info(&user());
    assert_eq!(credentials.user_info(), Some(user()));
    assert_eq!(credentials.token().map(|t| t.as_str().to_string()), Some("abc".to_string()));

    credentials.clear_session();

    assert!(credentials.token().is_none());
    assert!(credentials.user_info().is_none());
    assert!(store.is_empty());
}

/// **VALUE**: An unreadable cached profile reads as absent.
#[test]
fn given_garbage_profile_when_read_then_none() {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(keys::USER_INFO, "garbage");

    assert!(Credentials::new(store).user_info().is_none());
}

/// **VALUE**: The persisted credential file is readable by its owner only.
///
/// **BUG THIS CATCHES**: Would catch the token file being written with the default
/// umask (usually 0644), exposing the bearer token to every local user.
#[cfg(unix)]
#[test]
fn given_saved_token_when_file_inspected_then_owner_only_permissions() {
    use crate::credential::file::CREDENTIALS_FILE_MODE;
    use std::os::unix::fs::PermissionsExt;

    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::open(dir.path(), "app_");

    // WHEN
    store.set(keys::TOKEN, "abc");

    // THEN
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, CREDENTIALS_FILE_MODE, "got {mode:o}");

    // AND: a rewrite keeps the restriction
    store.set(keys::USER_INFO, "{}");
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, CREDENTIALS_FILE_MODE);
}
