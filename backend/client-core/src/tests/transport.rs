// Unit tests for descriptor -> reqwest request conversion (no network)

use crate::request::{RequestBody, RequestDescriptor, ResponseType};
use crate::transport::{ExchangeFailure, Transport};

use common::RedactedToken;

use std::time::Duration;

use reqwest::Method;
use serde_json::json;

fn transport() -> Transport {
    Transport::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap()
}

/// **VALUE**: Relative urls are appended to the base path, not resolved against the host.
///
/// **BUG THIS CATCHES**: `Url::join("/users")` would drop the `/api` prefix.
#[test]
fn given_relative_urls_when_resolved_then_base_path_kept() {
    let transport = transport();

    assert_eq!(
        transport.resolve_url("/compute/instances").unwrap().as_str(),
        "http://localhost:8080/api/compute/instances"
    );
    assert_eq!(
        transport.resolve_url("user/info").unwrap().as_str(),
        "http://localhost:8080/api/user/info"
    );
    assert_eq!(
        transport.resolve_url("https://cdn.example.com/a.png").unwrap().as_str(),
        "https://cdn.example.com/a.png"
    );
}

/// **VALUE**: Query, bearer header and JSON body all land on the built request.
#[test]
fn given_full_descriptor_when_built_then_request_carries_everything() {
    let descriptor = RequestDescriptor::new(Method::POST, "/auth/login")
        .with_query_param("lang", "en")
        .with_authorization(RedactedToken::new("abc"))
        .with_body(RequestBody::Json(json!({"username": "admin"})))
        .with_response_type(ResponseType::Json);

    let request = transport().build_request(&descriptor).unwrap();

    assert_eq!(request.method(), Method::POST);
    assert_eq!(request.url().query(), Some("lang=en"));
    assert_eq!(request.headers()["authorization"], "Bearer abc");
    assert!(request.headers()["authorization"].is_sensitive());
    assert_eq!(request.headers()["content-type"], "application/json");
}

/// **VALUE**: Malformed headers and urls fail before anything is sent.
#[test]
fn given_malformed_descriptor_when_built_then_not_sent() {
    let bad_header = RequestDescriptor::get("/ping").with_header("x-note", "line\nbreak");
    let bad_url = RequestDescriptor::get("http://exa mple.com/");

    assert!(matches!(
        transport().build_request(&bad_header),
        Err(ExchangeFailure::NotSent { .. })
    ));
    assert!(matches!(
        transport().build_request(&bad_url),
        Err(ExchangeFailure::NotSent { .. })
    ));
}
