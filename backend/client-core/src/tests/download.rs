use crate::api::download::{DownloadTarget, FileDownloadTarget, ObjectGuard, safe_file_name};

use tempfile::TempDir;

/// **VALUE**: Create, save, release leaves only the saved file behind.
#[test]
fn given_file_target_when_saved_and_released_then_only_destination_remains() {
    let dir = TempDir::new().unwrap();
    let target = FileDownloadTarget::new(dir.path());

    let object = target.create_object(b"report").unwrap();
    let saved = {
        let guard = ObjectGuard::new(&target, object);
        target.trigger_save(guard.object(), "report.csv").unwrap()
    };

    assert_eq!(std::fs::read(&saved).unwrap(), b"report");
    assert_eq!(target.staged_count(), 0, "guard must release the staged object");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

/// **VALUE**: A released object can no longer be saved.
#[test]
fn given_released_object_when_saved_then_not_found() {
    let dir = TempDir::new().unwrap();
    let target = FileDownloadTarget::new(dir.path());
    let object = target.create_object(b"x").unwrap();

    target.release(&object);
    let result = target.trigger_save(&object, "x.bin");

    assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
}

/// **VALUE**: Server-supplied names cannot escape the download directory.
///
/// **BUG THIS CATCHES**: Would catch `../../.bashrc` being written outside the target dir.
#[test]
fn given_traversal_name_when_sanitized_then_last_component_only() {
    assert_eq!(safe_file_name("../../.bashrc"), ".bashrc");
    assert_eq!(safe_file_name("reports/q1.csv"), "q1.csv");
    assert_eq!(safe_file_name(".."), "download");
    assert_eq!(safe_file_name(""), "download");
}

/// **VALUE**: Saving under a taken name picks `name (n).ext` and leaves the old file alone.
///
/// **BUG THIS CATCHES**: Would catch a second export of `report.csv` silently replacing
/// the first one in the user's download folder.
#[test]
fn given_existing_file_when_saved_then_numbered_copy_and_original_untouched() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("report.csv"), b"old").unwrap();
    let target = FileDownloadTarget::new(dir.path());

    // WHEN
    let first = {
        let guard = ObjectGuard::new(&target, target.create_object(b"new").unwrap());
        target.trigger_save(guard.object(), "report.csv").unwrap()
    };
    let second = {
        let guard = ObjectGuard::new(&target, target.create_object(b"newer").unwrap());
        target.trigger_save(guard.object(), "report.csv").unwrap()
    };

    // THEN
    assert_eq!(std::fs::read(dir.path().join("report.csv")).unwrap(), b"old");
    assert_eq!(first, dir.path().join("report (1).csv"));
    assert_eq!(std::fs::read(&first).unwrap(), b"new");
    assert_eq!(second, dir.path().join("report (2).csv"));
    assert_eq!(std::fs::read(&second).unwrap(), b"newer");
}

/// **VALUE**: Names without an extension are numbered too.
#[test]
fn given_taken_name_without_extension_when_saved_then_numbered() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("download"), b"old").unwrap();
    let target = FileDownloadTarget::new(dir.path());

    let guard = ObjectGuard::new(&target, target.create_object(b"x").unwrap());
    let saved = target.trigger_save(guard.object(), "download").unwrap();

    assert_eq!(saved, dir.path().join("download (1)"));
}
