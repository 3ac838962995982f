use crate::RedactedToken;

/// **VALUE**: Debug and Display never print the token.
///
/// **WHY THIS MATTERS**: The request log interceptor prints descriptors; a token leaking
/// into log files would be a credential disclosure.
#[test]
fn given_token_when_formatted_then_value_is_redacted() {
    let token = RedactedToken::new("super-secret-token");

    let debug = format!("{:?}", token);
    let display = format!("{}", token);

    assert!(!debug.contains("super-secret-token"));
    assert!(!display.contains("super-secret-token"));
    assert_eq!(token.len(), 18);
}

/// **VALUE**: Bearer header uses the standard scheme.
#[test]
fn given_token_when_bearer_header_built_then_uses_bearer_scheme() {
    let token = RedactedToken::new("abc");

    assert_eq!(token.bearer_header(), "Bearer abc");
}

/// **VALUE**: Serialization is refused.
///
/// **BUG THIS CATCHES**: Would catch a derive(Serialize) slipping in and writing the
/// token into a JSON payload or config file by accident.
#[test]
fn given_token_when_serialized_then_fails() {
    let token = RedactedToken::new("abc");

    let result = serde_json::to_string(&token);

    assert!(result.is_err(), "RedactedToken must not serialize");
    assert!(result.unwrap_err().to_string().contains("RedactedToken"));
}
