use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::caller()` captures this file and a real position.
///
/// **WHY THIS MATTERS**: Every classified request error carries an ErrorLocation. If capture
/// breaks, error messages lose the only pointer back to the failing call site.
///
/// **BUG THIS CATCHES**: Would catch if `#[track_caller]` is dropped from `caller()`, which
/// would make every location point into error_location.rs itself.
#[test]
fn given_caller_when_error_location_captured_then_points_at_call_site() {
    // GIVEN/WHEN: Capturing at this call site
    let location = ErrorLocation::caller();

    // THEN: The test file is recorded, not the constructor's file
    assert!(
        location.file.contains("tests"),
        "Should capture the test file, got {}",
        location.file
    );
    assert!(location.line > 0, "Should capture a line number");
    assert!(location.column > 0, "Should capture a column number");
}

/// **VALUE**: Verifies the "[file:line:column]" Display format.
///
/// **WHY THIS MATTERS**: Every error Display ends with the location; log scraping and
/// humans both rely on this exact bracketed shape.
///
/// **BUG THIS CATCHES**: Would catch a changed separator or missing brackets.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: A location built from the panic location
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting
    let formatted = location.to_string();

    // THEN: "[file:line:column]"
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert!(formatted.contains(&location.line.to_string()));
    assert_eq!(formatted.matches(':').count(), 2, "Should have exactly 2 colons");
}

/// **VALUE**: Different call sites yield different line numbers.
///
/// **WHY THIS MATTERS**: Error constructors marked `#[track_caller]` must report where
/// they were invoked from, otherwise two different failures look identical.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::caller()
    }

    let first = capture_location();
    let second = capture_location();

    assert_eq!(first.file, second.file);
    assert_eq!(first.line + 1, second.line, "Lines should be sequential");
}
