//! Test helpers for facade integration tests.
//!
//! This module wires an [`ApiClient`] to a wiremock server with recording
//! collaborators so tests can assert on:
//! - Notifications shown to the user
//! - Redirects issued on session expiry
//! - Credentials left in the store
//! - Objects created, saved and released by downloads

use client_core::ApiClient;
use client_core::api::{DownloadTarget, ObjectUrl};
use client_core::collaborator::{RecordingNavigator, RecordingNotifier};
use client_core::credential::{Credentials, MemoryCredentialStore};
use client_core::pipeline::Pipeline;
use client_core::transport::Transport;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_LOGIN_PATH: &str = "/login";
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A client plus every collaborator it talks to.
pub struct Harness {
    pub server: MockServer,
    pub client: ApiClient,
    pub store: Arc<MemoryCredentialStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub target: Arc<RecordingDownloadTarget>,
}

pub async fn harness() -> Harness {
    harness_with(MemoryCredentialStore::new(), DEFAULT_TEST_TIMEOUT).await
}

/// Harness whose store already holds `token`.
pub async fn logged_in_harness(token: &str) -> Harness {
    harness_with(MemoryCredentialStore::with_token(token), DEFAULT_TEST_TIMEOUT).await
}

pub async fn harness_with(store: MemoryCredentialStore, timeout: Duration) -> Harness {
    let server = MockServer::start().await;
    let base_url = format!("{}/api/", server.uri());
    build_harness(server, &base_url, store, timeout)
}

/// Harness pointing at `base_url` instead of the mock server.
pub async fn harness_for_base_url(base_url: &str) -> Harness {
    let server = MockServer::start().await;
    build_harness(
        server,
        base_url,
        MemoryCredentialStore::new(),
        DEFAULT_TEST_TIMEOUT,
    )
}

fn build_harness(
    server: MockServer,
    base_url: &str,
    store: MemoryCredentialStore,
    timeout: Duration,
) -> Harness {
    let store = Arc::new(store);
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let target = Arc::new(RecordingDownloadTarget::default());

    let transport = Transport::new(base_url, timeout).expect("Failed to build transport");
    let credentials = Credentials::new(store.clone());
    let pipeline = Pipeline::standard(
        credentials.clone(),
        notifier.clone(),
        navigator.clone(),
        TEST_LOGIN_PATH,
        false,
    );
    let client = ApiClient::new(transport, pipeline, credentials, target.clone());

    Harness {
        server,
        client,
        store,
        notifier,
        navigator,
        target,
    }
}

/// `{code: 200, message: "ok", data}`
pub fn ok_envelope(data: Value) -> Value {
    json!({ "code": 200, "message": "ok", "data": data, "success": true })
}

/// Download target that keeps everything in memory.
#[derive(Debug, Default)]
pub struct RecordingDownloadTarget {
    objects: Mutex<HashMap<ObjectUrl, Vec<u8>>>,
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    created: Mutex<usize>,
    released: Mutex<usize>,
    fail_save: Mutex<bool>,
}

impl RecordingDownloadTarget {
    pub fn fail_saves(&self) {
        *self.fail_save.lock().unwrap() = true;
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }

    pub fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }

    pub fn released(&self) -> usize {
        *self.released.lock().unwrap()
    }

    pub fn live_objects(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

impl DownloadTarget for RecordingDownloadTarget {
    fn create_object(&self, bytes: &[u8]) -> std::io::Result<ObjectUrl> {
        let object = ObjectUrl::generate();
        self.objects
            .lock()
            .unwrap()
            .insert(object.clone(), bytes.to_vec());
        *self.created.lock().unwrap() += 1;
        Ok(object)
    }

    fn trigger_save(&self, object: &ObjectUrl, filename: &str) -> std::io::Result<PathBuf> {
        if *self.fail_save.lock().unwrap() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "save dialog refused",
            ));
        }

        let bytes = self
            .objects
            .lock()
            .unwrap()
            .get(object)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))?;
        self.saved.lock().unwrap().push((filename.to_string(), bytes));
        Ok(PathBuf::from(filename))
    }

    fn release(&self, object: &ObjectUrl) {
        self.objects.lock().unwrap().remove(object);
        *self.released.lock().unwrap() += 1;
    }
}
