// Verb facade against a live mock server: envelopes, query strings, headers, uploads.

use crate::helpers::{harness, harness_for_base_url, harness_with, logged_in_harness, ok_envelope};

use client_core::credential::MemoryCredentialStore;
use client_core::pipeline::classifier::{TIMEOUT_MESSAGE, UNREACHABLE_MESSAGE};
use client_core::pipeline::request::CACHE_BUST_PARAM;
use client_core::request::UploadFile;
use client_core::{ErrorKind, NetworkErrorKind};

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

/// **VALUE**: A successful envelope comes back whole, message included.
#[tokio::test]
async fn given_success_envelope_when_get_then_full_envelope_returned() {
    // GIVEN
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/compute/instances/i-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"id": "i-1"}))),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    // WHEN
    let envelope = h
        .client
        .get::<Value>("/compute/instances/i-1")
        .await
        .unwrap();

    // THEN
    assert_eq!(envelope.code, Some(200));
    assert_eq!(envelope.message, "ok");
    assert_eq!(envelope.data["id"], "i-1");
    assert!(h.notifier.notices().is_empty(), "success must not notify");
}

/// **VALUE**: Envelope code 500 with HTTP 200 is a business error carrying the server message.
///
/// **BUG THIS CATCHES**: Would catch the classifier trusting the HTTP status alone,
/// which hands failed operations to callers as success.
#[tokio::test]
async fn given_business_failure_when_get_then_business_error_and_one_notice() {
    // GIVEN
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/compute/instances"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 500, "message": "fail", "data": null})),
        )
        .mount(&h.server)
        .await;

    // WHEN
    let err = h.client.get::<Value>("/compute/instances").await.unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::Business);
    assert_eq!(err.business_code(), Some(500));
    assert_eq!(err.message(), "fail");
    assert_eq!(h.notifier.errors(), vec!["fail".to_string()]);
    assert!(h.navigator.redirects().is_empty());
}

/// **VALUE**: Code 0 counts as success, like 200.
#[tokio::test]
async fn given_code_zero_when_get_then_success() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": 1})))
        .mount(&h.server)
        .await;

    let envelope = h.client.get::<u32>("/ping").await.unwrap();

    assert_eq!(envelope.data, 1);
}

/// **VALUE**: Canned status messages reach the user; 422 prefers the server's text.
#[tokio::test]
async fn given_http_errors_when_requested_then_status_messages_shown() {
    // GIVEN
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "nope"})))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/compute/instances"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "name is required"})),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teapot"))
        .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
        .mount(&h.server)
        .await;

    // WHEN
    let not_found = h.client.get::<Value>("/missing").await.unwrap_err();
    let invalid = h
        .client
        .post::<Value, _>("/compute/instances", &json!({}))
        .await
        .unwrap_err();
    let teapot = h.client.get::<Value>("/teapot").await.unwrap_err();

    // THEN
    assert_eq!(not_found.status_code().map(|s| s.as_u16()), Some(404));
    assert_eq!(not_found.message(), "The requested resource does not exist");
    assert_eq!(invalid.message(), "name is required");
    assert_eq!(teapot.message(), "Request failed (418)");
    assert_eq!(h.notifier.errors().len(), 3, "exactly one notice per failure");
    assert!(h.navigator.redirects().is_empty(), "only 401 navigates");
}

/// **VALUE**: A slow server produces a timeout error and no navigation.
#[tokio::test]
async fn given_slow_server_when_get_then_timeout() {
    // GIVEN
    let h = harness_with(MemoryCredentialStore::with_token("abc"), Duration::from_millis(200)).await;
    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!(null)))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&h.server)
        .await;

    // WHEN
    let err = h.client.get::<Value>("/slow").await.unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::Network(NetworkErrorKind::Timeout));
    assert_eq!(h.notifier.errors(), vec![TIMEOUT_MESSAGE.to_string()]);
    assert!(h.navigator.redirects().is_empty());
    assert_eq!(h.store.len(), 1, "timeouts must not touch credentials");
}

/// **VALUE**: A refused connection is reported as unreachable.
#[tokio::test]
async fn given_closed_port_when_get_then_unreachable() {
    // GIVEN
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let h = harness_for_base_url(&format!("http://127.0.0.1:{port}/api/")).await;

    // WHEN
    let err = h.client.get::<Value>("/ping").await.unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::Network(NetworkErrorKind::Unreachable));
    assert_eq!(h.notifier.errors(), vec![UNREACHABLE_MESSAGE.to_string()]);
}

/// **VALUE**: Every GET carries a fresh `_t`; non-GET requests carry none.
///
/// **BUG THIS CATCHES**: Would catch two requests in the same millisecond sharing a
/// stamp and one of them being served from an intermediary cache.
#[tokio::test]
async fn given_two_gets_when_sent_then_cache_bust_values_differ() {
    // GIVEN
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .expect(2)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .expect(1)
        .mount(&h.server)
        .await;

    // WHEN
    h.client.get::<Value>("/ping").await.unwrap();
    h.client.get::<Value>("/ping").await.unwrap();
    h.client.delete::<Value>("/ping").await.unwrap();

    // THEN
    let requests = h.server.received_requests().await.unwrap();
    let stamps: Vec<Option<String>> = requests
        .iter()
        .map(|request| {
            request
                .url
                .query_pairs()
                .find(|(key, _)| key == CACHE_BUST_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .collect();
    assert_eq!(stamps.len(), 3);
    assert!(stamps[0].is_some() && stamps[1].is_some());
    assert_ne!(stamps[0], stamps[1]);
    assert_eq!(stamps[2], None);
}

/// **VALUE**: Query params serialize with repeated keys for arrays and no nulls.
#[tokio::test]
async fn given_params_when_get_with_then_query_string_sent() {
    // GIVEN
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/compute/instances"))
        .and(query_param("current", "2"))
        .and(query_param("status", "running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&h.server)
        .await;

    // WHEN
    let params = json!({"current": 2, "status": "running", "region": null, "ids": ["a", "b"]});
    h.client
        .get_with::<Value, _>("/compute/instances", &params)
        .await
        .unwrap();

    // THEN
    let requests = h.server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("ids=a&ids=b"), "query was {query}");
    assert!(!query.contains("region"), "null params must be dropped: {query}");
}

/// **VALUE**: A stored token is sent as a bearer header and JSON bodies arrive intact.
#[tokio::test]
async fn given_token_when_put_then_bearer_header_and_json_body_sent() {
    // GIVEN
    let h = logged_in_harness("abc").await;
    Mock::given(method("PUT"))
        .and(path("/api/user/info"))
        .and(header("Authorization", "Bearer abc"))
        .and(body_partial_json(json!({"nickname": "Ops"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(true))))
        .expect(1)
        .mount(&h.server)
        .await;

    // WHEN
    let result = h
        .client
        .put::<bool, _>("/user/info", &json!({"nickname": "Ops"}))
        .await;

    // THEN
    assert!(result.unwrap().data);
}

/// **VALUE**: Without a token no Authorization header is sent at all.
#[tokio::test]
async fn given_no_token_when_get_then_no_authorization_header() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .mount(&h.server)
        .await;

    h.client.get::<Value>("/ping").await.unwrap();

    let requests = h.server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

/// **VALUE**: Upload sends multipart with the file under `file` plus extra fields.
#[tokio::test]
async fn given_file_when_uploaded_then_multipart_form_sent() {
    // GIVEN
    let h = logged_in_harness("abc").await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!({"url": "/files/a.txt", "filename": "a.txt"}))),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    // WHEN
    let file = UploadFile::new("a.txt", b"hello".to_vec()).with_mime_type("text/plain");
    let envelope = h
        .client
        .upload::<Value, _, _>("/upload", file, [("category", "docs")])
        .await
        .unwrap();

    // THEN
    assert_eq!(envelope.data["filename"], "a.txt");
    let requests = h.server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\"; filename=\"a.txt\""));
    assert!(body.contains("hello"));
    assert!(body.contains("name=\"category\""));
    assert!(body.contains("docs"));
}

/// **VALUE**: A 2xx body that is not an envelope is a decode error, not a panic.
#[tokio::test]
async fn given_html_body_when_get_then_decode_error() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&h.server)
        .await;

    let err = h.client.get::<Value>("/ping").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(h.notifier.errors().len(), 1);
}
