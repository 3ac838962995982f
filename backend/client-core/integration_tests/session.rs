// Login, bearer propagation and the 401 credential wipe.

use crate::helpers::{
    TEST_LOGIN_PATH, harness, harness_for_base_url, logged_in_harness, ok_envelope,
};

use client_core::credential::{CredentialStore, keys};
use client_core::pipeline::status_table::SESSION_EXPIRED_MESSAGE;
use client_core::services::UserService;

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use models::LoginParams;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

/// **VALUE**: The token from login is stored and sent on the next request.
///
/// **WHY THIS MATTERS**: This is the whole authentication loop of the console.
#[tokio::test]
async fn given_login_when_fetching_profile_then_bearer_token_sent() {
    // GIVEN
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({"username": "admin", "password": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"token": "abc"}))))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "id": "1",
            "username": "admin",
            "role": "admin",
            "status": 1
        }))))
        .expect(1)
        .mount(&h.server)
        .await;
    let users = UserService::new(h.client.clone());

    // WHEN
    users
        .login(&LoginParams::new("admin", "admin"))
        .await
        .unwrap();
    let profile = users.get_user_info().await.unwrap();

    // THEN
    assert_eq!(h.store.get(keys::TOKEN), Some("abc".to_string()));
    assert!(users.is_logged_in());
    assert_eq!(profile.data.username, "admin");
    assert_eq!(users.cached_user_info().map(|u| u.id), Some("1".to_string()));
}

/// **VALUE**: A 401 wipes the token and profile and redirects exactly once.
///
/// **BUG THIS CATCHES**: Would catch a stale token surviving the 401, which makes
/// every later request fail the same way and loops the user back to login.
#[tokio::test]
async fn given_expired_token_when_unauthorized_then_session_cleared_and_redirected_once() {
    // GIVEN
    let h = logged_in_harness("stale").await;
    h.store.set(keys::USER_INFO, r#"{"id":"1","username":"admin","role":"admin","status":1}"#);
    Mock::given(method("GET"))
        .and(path("/api/compute/instances"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&h.server)
        .await;

    // WHEN
    let err = h.client.get::<Value>("/compute/instances").await.unwrap_err();

    // THEN
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), SESSION_EXPIRED_MESSAGE);
    assert!(!h.store.has(keys::TOKEN));
    assert!(!h.store.has(keys::USER_INFO));
    assert_eq!(h.navigator.redirects(), vec![TEST_LOGIN_PATH.to_string()]);
    assert_eq!(h.notifier.errors(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

/// **VALUE**: A 401 whose body is cut off mid-stream still wipes the session.
///
/// **BUG THIS CATCHES**: Would catch a failed body read being reported as a network error,
/// which skips the credential wipe and the redirect even though the server answered 401.
#[tokio::test]
async fn given_truncated_unauthorized_body_when_requested_then_session_still_cleared() {
    // GIVEN: a server that promises 100 body bytes, sends 6 and hangs up
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = stream.read(&mut buf).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
        }
        stream
            .write_all(
                b"HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"mes",
            )
            .unwrap();
        stream.flush().unwrap();
    });
    let h = harness_for_base_url(&format!("http://127.0.0.1:{port}/api/")).await;
    h.store.set(keys::TOKEN, "abc");

    // WHEN
    let err = h.client.get::<Value>("/compute/instances").await.unwrap_err();
    server.join().unwrap();

    // THEN
    assert!(err.is_unauthorized(), "expected HTTP 401, got {err:?}");
    assert!(!h.store.has(keys::TOKEN));
    assert_eq!(h.navigator.redirects(), vec![TEST_LOGIN_PATH.to_string()]);
    assert_eq!(h.notifier.errors(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

/// **VALUE**: After the wipe, the next request goes out without a bearer header.
#[tokio::test]
async fn given_wiped_session_when_next_request_then_no_authorization_header() {
    // GIVEN
    let h = logged_in_harness("stale").await;
    Mock::given(method("GET"))
        .and(path("/api/first"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .mount(&h.server)
        .await;

    // WHEN
    let _ = h.client.get::<Value>("/first").await;
    h.client.get::<Value>("/second").await.unwrap();

    // THEN
    let requests = h.server.received_requests().await.unwrap();
    assert!(requests[0].headers.contains_key("authorization"));
    assert!(!requests[1].headers.contains_key("authorization"));
}

/// **VALUE**: A failed login stores nothing.
#[tokio::test]
async fn given_rejected_login_when_login_then_no_token_stored() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 1001, "message": "Wrong password"})),
        )
        .mount(&h.server)
        .await;
    let users = UserService::new(h.client.clone());

    let err = users.login(&LoginParams::new("admin", "bad")).await.unwrap_err();

    assert_eq!(err.message(), "Wrong password");
    assert!(h.store.is_empty());
    assert!(!users.is_logged_in());
}

/// **VALUE**: Logout clears local credentials even when the server call fails.
#[tokio::test]
async fn given_server_error_when_logout_then_session_still_cleared() {
    let h = logged_in_harness("abc").await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;
    let users = UserService::new(h.client.clone());

    let result = users.logout().await;

    assert!(result.is_err());
    assert!(h.store.is_empty());
    assert!(h.navigator.redirects().is_empty());
}
