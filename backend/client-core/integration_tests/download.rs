// Blob downloads: bytes untouched, object released exactly once on every path.

use crate::helpers::{harness, logged_in_harness};

use client_core::DownloadError;
use client_core::api::SAVE_FAILED_MESSAGE;
use client_core::api::download::DEFAULT_DOWNLOAD_NAME;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

/// **VALUE**: The body is saved verbatim under the requested name and the object released.
///
/// **BUG THIS CATCHES**: Would catch blob responses being pushed through the envelope
/// decoder, which corrupts or rejects binary files.
#[tokio::test]
async fn given_file_when_downloaded_then_saved_verbatim_and_released() {
    // GIVEN
    let h = logged_in_harness("abc").await;
    let bytes = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
    Mock::given(method("GET"))
        .and(path("/api/files/report"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.clone()))
        .expect(1)
        .mount(&h.server)
        .await;

    // WHEN
    let saved = h
        .client
        .download("/files/report", Some("report.png"))
        .await
        .unwrap();

    // THEN
    assert_eq!(saved.to_string_lossy(), "report.png");
    assert_eq!(h.target.saved(), vec![("report.png".to_string(), bytes)]);
    assert_eq!(h.target.created(), 1);
    assert_eq!(h.target.released(), 1);
    assert_eq!(h.target.live_objects(), 0);
}

/// **VALUE**: Without a filename the file is saved as `download`.
#[tokio::test]
async fn given_no_filename_when_downloaded_then_default_name_used() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/export"))
        .and(query_param("format", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n"))
        .mount(&h.server)
        .await;

    h.client
        .download_with("/export", None, &json!({"format": "csv"}))
        .await
        .unwrap();

    assert_eq!(h.target.saved()[0].0, DEFAULT_DOWNLOAD_NAME);
}

/// **VALUE**: A failed save still releases the object once and notifies once.
#[tokio::test]
async fn given_failing_save_when_downloaded_then_released_once_and_save_error() {
    // GIVEN
    let h = harness().await;
    h.target.fail_saves();
    Mock::given(method("GET"))
        .and(path("/api/files/report"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .mount(&h.server)
        .await;

    // WHEN
    let err = h
        .client
        .download("/files/report", Some("report.bin"))
        .await
        .unwrap_err();

    // THEN
    assert!(matches!(err, DownloadError::Save { ref filename, .. } if filename == "report.bin"));
    assert_eq!(h.target.created(), 1);
    assert_eq!(h.target.released(), 1);
    assert_eq!(h.notifier.errors(), vec![SAVE_FAILED_MESSAGE.to_string()]);
}

/// **VALUE**: Non-2xx downloads are classified like any request and nothing is created.
#[tokio::test]
async fn given_missing_file_when_downloaded_then_http_error_and_no_object() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/files/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;

    let err = h.client.download("/files/gone", None).await.unwrap_err();

    match err {
        DownloadError::Request(api) => {
            assert_eq!(api.status_code().map(|s| s.as_u16()), Some(404))
        }
        other => panic!("expected request error, got {other:?}"),
    }
    assert_eq!(h.target.created(), 0);
    assert_eq!(h.notifier.errors().len(), 1);
}
