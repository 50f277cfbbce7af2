//! Async facade driving generation on the worker thread

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tabloid::error::classify_failure;
use tabloid::{AppState, ContentService, Error, GeneratedDocument, Result, Studio};

/// Fails every other call, starting with the first.
struct Flaky {
    calls: Arc<AtomicUsize>,
}

impl ContentService for Flaky {
    fn generate(&self) -> Result<GeneratedDocument> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 {
            return Err(classify_failure("HTTP 503 Service Unavailable"));
        }
        Ok(GeneratedDocument::from_json(include_str!("fixtures/document.json")).unwrap())
    }
}

#[tokio::test]
async fn studio_serves_requests_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let studio = Studio::new(Flaky { calls: calls.clone() });

    let first = studio.generate().await;
    assert!(matches!(first, Err(Error::GenerationFailed { .. })));
    let second = studio.generate().await.unwrap();
    assert_eq!(second.main_title, "强国有我");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    studio.close().await.unwrap();
}

#[tokio::test]
async fn state_machine_with_async_outcomes() {
    let studio = Studio::new(Flaky { calls: Arc::new(AtomicUsize::new(1)) });
    let mut state = AppState::new();

    let id = state.trigger().unwrap();
    assert!(state.trigger().is_none(), "generate is disabled while loading");
    let outcome = studio.generate().await;
    assert!(state.resolve(id, outcome));
    assert_eq!(state.view().name(), "result");

    studio.close().await.unwrap();
}

#[tokio::test]
async fn closed_studio_reports_error() {
    let studio = Studio::new(Flaky { calls: Arc::new(AtomicUsize::new(0)) });
    let other = studio.clone();
    studio.close().await.unwrap();

    let err = other.generate().await.unwrap_err();
    assert!(matches!(err, Error::Other(_)));
}
