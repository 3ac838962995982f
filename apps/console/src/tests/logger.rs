// Unit tests for logger module initialization logic

use crate::logger::{LOG_FILE_NAME, initialize};

use tempfile::TempDir;

/// **VALUE**: Calling initialize() twice is harmless and the log file is created once.
///
/// **BUG THIS CATCHES**: Would catch the Once/AtomicBool guards being removed, which
/// makes fern fail when a second global logger is installed.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");

    // WHEN
    let first = initialize(&log_dir, false);
    let second = initialize(&log_dir, true);

    // THEN
    assert!(first.is_ok(), "First initialization should succeed");
    assert!(second.is_ok(), "Second initialization should be a no-op");
    assert!(log_dir.join(LOG_FILE_NAME).exists());
}
