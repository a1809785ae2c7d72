//! Authentication metrics, captured with a thread-local debugging recorder
//! while requests go through the full router.
//!
//! Run with: `cargo test --test metrics_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::future::Future;

use apikey_gate::metrics::names;
use apikey_gate::{AppState, Config, build_router};
use axum::Router;
use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use metrics::{SharedString, Unit};
use metrics_util::CompositeKey;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use tower::ServiceExt;

type Entries = Vec<(CompositeKey, Option<Unit>, Option<SharedString>, DebugValue)>;

/// Run `scenario` with a fresh local recorder and return what it recorded.
///
/// The runtime is current-thread so every request is polled on the thread
/// that owns the local recorder.
fn record<F, Fut>(scenario: F) -> Entries
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime")
            .block_on(scenario());
    });

    snapshotter.snapshot().into_vec()
}

/// Sum of a counter, optionally restricted to one `outcome` label.
fn counter(entries: &Entries, name: &str, outcome: Option<&str>) -> u64 {
    entries
        .iter()
        .filter_map(|(key, _, _, value)| {
            let key = key.key();
            if key.name() != name {
                return None;
            }
            if let Some(outcome) = outcome
                && !key
                    .labels()
                    .any(|l| l.key() == "outcome" && l.value() == outcome)
            {
                return None;
            }
            match value {
                DebugValue::Counter(v) => Some(*v),
                _ => None,
            }
        })
        .sum()
}

fn router(auth_required: bool) -> Router {
    build_router(AppState::new(Config {
        auth_required,
        metrics_port: 0,
        ..Config::default()
    }))
}

async fn send(router: &Router, path: &str, authorization: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }

    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[test]
fn test_layer_counts_each_outcome() {
    let entries = record(|| async {
        let app = router(true);
        assert_eq!(send(&app, "/whoami", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            send(&app, "/whoami", Some("Bearer sometoken")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(&app, "/whoami", Some("ApiKey abc123 extra")).await,
            StatusCode::UNAUTHORIZED
        );
    });

    assert_eq!(
        counter(&entries, names::EXTRACTIONS_TOTAL, Some("no_auth_header")),
        1
    );
    assert_eq!(
        counter(&entries, names::EXTRACTIONS_TOTAL, Some("malformed_header")),
        2
    );
    assert_eq!(counter(&entries, names::EXTRACTIONS_TOTAL, Some("ok")), 0);
}

#[test]
fn test_accepted_request_is_counted_once() {
    let entries = record(|| async {
        let app = router(true);
        assert_eq!(
            send(&app, "/whoami", Some("ApiKey abc123")).await,
            StatusCode::OK
        );
    });

    // The extractor reuses the layer's result instead of extracting again
    assert_eq!(counter(&entries, names::EXTRACTIONS_TOTAL, Some("ok")), 1);
    assert_eq!(counter(&entries, names::EXTRACTIONS_TOTAL, None), 1);
}

#[test]
fn test_bypass_is_counted_without_extraction() {
    let entries = record(|| async {
        let app = router(true);
        assert_eq!(send(&app, "/health", None).await, StatusCode::OK);
        assert_eq!(send(&app, "/ready", None).await, StatusCode::OK);
    });

    assert_eq!(counter(&entries, names::BYPASSED_REQUESTS_TOTAL, None), 2);
    assert_eq!(counter(&entries, names::EXTRACTIONS_TOTAL, None), 0);
}

#[test]
fn test_extractor_counts_without_layer() {
    let entries = record(|| async {
        let app = router(false);
        assert_eq!(
            send(&app, "/whoami", Some("ApiKey")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(&app, "/whoami", Some("ApiKey abc123")).await,
            StatusCode::OK
        );
        assert_eq!(send(&app, "/health", None).await, StatusCode::OK);
    });

    assert_eq!(
        counter(&entries, names::EXTRACTIONS_TOTAL, Some("malformed_header")),
        1
    );
    assert_eq!(counter(&entries, names::EXTRACTIONS_TOTAL, Some("ok")), 1);
    assert_eq!(counter(&entries, names::BYPASSED_REQUESTS_TOTAL, None), 0);
}
