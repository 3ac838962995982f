use crate::{LoginParams, LoginResponse};

use serde_json::json;

/// **VALUE**: Login params never print the password.
///
/// **WHY THIS MATTERS**: The request log interceptor prints request bodies in debug builds.
#[test]
fn given_login_params_when_debug_formatted_then_password_redacted() {
    let params = LoginParams::new("admin", "hunter2");

    let debug = format!("{:?}", params);

    assert!(debug.contains("admin"));
    assert!(!debug.contains("hunter2"));
}

/// **VALUE**: A login response with only a token decodes.
///
/// **BUG THIS CATCHES**: Would catch `userInfo` becoming required, which breaks backends
/// that return the profile from a separate call.
#[test]
fn given_token_only_login_response_when_decoded_then_succeeds() {
    let response: LoginResponse = serde_json::from_value(json!({"token": "abc"})).unwrap();

    assert_eq!(response.token().as_str(), "abc");
    assert!(response.user_info.is_none());
    assert!(response.refresh_token().is_none());
    assert!(!format!("{:?}", response).contains("abc"));
}
