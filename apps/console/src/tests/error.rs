// Unit tests for error module

use crate::error::ConsoleError;

/// **VALUE**: Errors serialize with a variant tag, for machine-readable output.
///
/// **BUG THIS CATCHES**: Would catch a non-serializable field being added to a variant.
#[test]
fn given_console_error_when_serialized_then_tagged_json() {
    // GIVEN
    let err = ConsoleError::not_logged_in();

    // WHEN
    let json = serde_json::to_string(&err).unwrap();

    // THEN
    assert!(json.contains("NotLoggedIn"), "JSON should contain variant name");
    assert!(json.contains("console login"), "JSON should contain message");
}

/// **VALUE**: Each failure class gets a distinct exit code for scripts.
#[test]
fn given_error_classes_when_exit_code_then_distinct() {
    let codes = [
        ConsoleError::console("x").exit_code(),
        ConsoleError::config("x").exit_code(),
        ConsoleError::request("x").exit_code(),
        ConsoleError::not_logged_in().exit_code(),
    ];

    for (i, a) in codes.iter().enumerate() {
        assert_ne!(*a, 0);
        for b in &codes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

/// **VALUE**: Display carries the source location of construction.
#[test]
fn given_error_when_displayed_then_location_points_here() {
    let err = ConsoleError::console("boom");

    let formatted = err.to_string();

    assert!(formatted.starts_with("Console Error: boom"));
    assert!(formatted.contains("error.rs"), "location missing: {formatted}");
}
