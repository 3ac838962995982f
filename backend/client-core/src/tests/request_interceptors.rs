// Unit tests for request interceptors and pipeline ordering

use crate::collaborator::{RecordingNavigator, RecordingNotifier};
use crate::credential::{Credentials, MemoryCredentialStore};
use crate::error::ErrorKind;
use crate::pipeline::request::redact;
use crate::pipeline::{
    AuthHeaderInterceptor, CACHE_BUST_PARAM, CacheBustInterceptor, Pipeline, RequestInterceptor,
    ResponseClassifier,
};
use crate::request::RequestDescriptor;
use crate::transport::ExchangeFailure;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::Method;
use serde_json::json;

fn credentials(token: Option<&str>) -> Credentials {
    let store = match token {
        Some(token) => MemoryCredentialStore::with_token(token),
        None => MemoryCredentialStore::new(),
    };
    Credentials::new(Arc::new(store))
}

/// **VALUE**: Authorization is attached if and only if a credential is stored.
///
/// **BUG THIS CATCHES**: Would catch an interceptor sending `Bearer ` with an empty token
/// to anonymous endpoints such as login.
#[test]
fn given_credential_presence_when_intercepted_then_authorization_matches() {
    let with_token = AuthHeaderInterceptor::new(credentials(Some("abc")));
    let without_token = AuthHeaderInterceptor::new(credentials(None));
    let empty_token = AuthHeaderInterceptor::new(credentials(Some("")));

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let descriptor = RequestDescriptor::new(method.clone(), "/user/info");

        let authorized = with_token.intercept(descriptor.clone()).unwrap();
        assert_eq!(
            authorized.authorization().map(|t| t.bearer_header()),
            Some("Bearer abc".to_string()),
            "{method} should carry the token"
        );

        let anonymous = without_token.intercept(descriptor.clone()).unwrap();
        assert!(anonymous.authorization().is_none(), "{method} without token");

        let blank = empty_token.intercept(descriptor).unwrap();
        assert!(blank.authorization().is_none(), "{method} with blank token");
    }
}

/// **VALUE**: Only GET requests get a cache-busting parameter.
#[test]
fn given_methods_when_cache_bust_applied_then_only_get_is_stamped() {
    let interceptor = CacheBustInterceptor::new();

    let get = interceptor
        .intercept(RequestDescriptor::get("/compute/instances"))
        .unwrap();
    let post = interceptor
        .intercept(RequestDescriptor::new(Method::POST, "/compute/instances"))
        .unwrap();

    assert!(get.query_value(CACHE_BUST_PARAM).is_some());
    assert!(post.query_value(CACHE_BUST_PARAM).is_none());
}

/// **VALUE**: A caller-supplied `_t` is replaced, never duplicated.
///
/// **BUG THIS CATCHES**: Would catch `?_t=a&_t=b`, where servers disagree on which value wins.
#[test]
fn given_existing_cache_bust_param_when_stamped_then_single_fresh_value() {
    let interceptor = CacheBustInterceptor::new();
    let descriptor = RequestDescriptor::get("/ping")
        .with_query_param(CACHE_BUST_PARAM, "stale")
        .with_query_param("page", "2");

    let stamped = interceptor.intercept(descriptor).unwrap();

    let stamps: Vec<&str> = stamped
        .query()
        .iter()
        .filter(|(key, _)| key == CACHE_BUST_PARAM)
        .map(|(_, value)| value.as_str())
        .collect();
    assert_eq!(stamps.len(), 1);
    assert_ne!(stamps[0], "stale");
    assert_eq!(stamped.query_value("page"), Some("2"));
}

/// **VALUE**: Back-to-back stamps are strictly increasing.
///
/// **WHY THIS MATTERS**: Two GETs within the same millisecond must still produce different
/// URLs, otherwise an intermediate cache may serve the first answer to the second call.
#[test]
fn given_rapid_requests_when_stamped_then_values_strictly_increase() {
    let interceptor = CacheBustInterceptor::new();

    let stamps: Vec<u64> = (0..1000).map(|_| interceptor.next_stamp()).collect();

    assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
}

/// **VALUE**: Interceptors run in registration order, each seeing the previous output.
#[test]
fn given_custom_interceptors_when_prepared_then_run_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let first_calls = calls.clone();
    let second_calls = calls.clone();

    let pipeline = Pipeline::new(classifier(Arc::new(RecordingNotifier::new())))
        .with_interceptor(move |d: RequestDescriptor| -> Result<RequestDescriptor, ExchangeFailure> {
            assert_eq!(first_calls.fetch_add(1, Ordering::SeqCst), 0);
            Ok(d.with_header("x-step", "one"))
        })
        .with_interceptor(move |d: RequestDescriptor| -> Result<RequestDescriptor, ExchangeFailure> {
            assert_eq!(second_calls.fetch_add(1, Ordering::SeqCst), 1);
            assert_eq!(d.headers().len(), 1, "second stage sees first stage output");
            Ok(d.with_header("x-step", "two"))
        });

    let prepared = pipeline.prepare(RequestDescriptor::get("/ping")).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(prepared.headers().len(), 2);
}

/// **VALUE**: A failing interceptor becomes a notified configuration error.
///
/// **BUG THIS CATCHES**: Would catch interceptor failures escaping classification and
/// reaching the caller without a user notice.
#[test]
fn given_failing_interceptor_when_prepared_then_config_error_and_later_stages_skipped() {
    let notifier = Arc::new(RecordingNotifier::new());
    let later = Arc::new(AtomicUsize::new(0));
    let later_calls = later.clone();

    let pipeline = Pipeline::new(classifier(notifier.clone()))
        .with_interceptor(|_: RequestDescriptor| -> Result<RequestDescriptor, ExchangeFailure> {
            Err(ExchangeFailure::not_sent("descriptor could not be built"))
        })
        .with_interceptor(move |d: RequestDescriptor| -> Result<RequestDescriptor, ExchangeFailure> {
            later_calls.fetch_add(1, Ordering::SeqCst);
            Ok(d)
        });

    let err = pipeline.prepare(RequestDescriptor::get("/ping")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(later.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.notices().len(), 1);
}

/// **VALUE**: Secret-looking fields never reach request log lines.
#[test]
fn given_login_body_when_redacted_then_password_hidden() {
    let redacted = redact(json!({
        "username": "admin",
        "password": "admin",
        "nested": {"refreshToken": "r1"}
    }));

    assert_eq!(redacted["username"], "admin");
    assert_eq!(redacted["password"], "[REDACTED]");
    assert_eq!(redacted["nested"]["refreshToken"], "[REDACTED]");
}

fn classifier(notifier: Arc<RecordingNotifier>) -> ResponseClassifier {
    ResponseClassifier::new(
        credentials(None),
        notifier,
        Arc::new(RecordingNavigator::new()),
        "/login",
    )
}
