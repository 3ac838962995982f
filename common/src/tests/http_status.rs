use crate::HttpStatusCode;

/// **VALUE**: Status ranges are categorised from the numeric code alone.
///
/// **BUG THIS CATCHES**: Off-by-one range bounds (e.g. 500 treated as client error).
#[test]
fn given_status_codes_when_categorised_then_ranges_are_exclusive() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(300).is_success());

    assert!(HttpStatusCode(400).is_client_error());
    assert!(HttpStatusCode(499).is_client_error());
    assert!(!HttpStatusCode(500).is_client_error());

    assert!(HttpStatusCode(500).is_server_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(600).is_server_error());
}

/// **VALUE**: Only 401 counts as unauthorized.
///
/// **WHY THIS MATTERS**: Unauthorized is the one status that wipes credentials and forces
/// navigation; 403 must not trigger it.
#[test]
fn given_forbidden_when_checked_then_not_unauthorized() {
    assert!(HttpStatusCode::from(401).is_unauthorized());
    assert!(!HttpStatusCode::from(403).is_unauthorized());
    assert_eq!(HttpStatusCode(404).to_string(), "404");
}
