//! View state machine for the generate flow.
//!
//! Exactly one of four views is visible at any time, so the state is a
//! single enum rather than loose flags. Every trigger issues a new
//! [`RequestId`]; outcomes carrying any other id are dropped, so a slow
//! response can never overwrite a newer one.

use crate::error::user_message;
use crate::view::ResultView;
use crate::{GeneratedDocument, Result};
use log::{debug, warn};

/// Identifier of one generation request, increasing per trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// No request issued yet
    #[default]
    Idle,
    Loading,
    Success(ResultView),
    /// User-facing failure message
    Error(String),
}

impl ViewState {
    /// Short name of the visible view, matching the page's `data-view` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "empty",
            ViewState::Loading => "loading",
            ViewState::Success(_) => "result",
            ViewState::Error(_) => "error",
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    view: ViewState,
    last_issued: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading)
    }

    pub fn document(&self) -> Option<&GeneratedDocument> {
        match &self.view {
            ViewState::Success(result) => Some(result.document()),
            _ => None,
        }
    }

    /// Start a request. Clears any previous result or error.
    ///
    /// Returns `None` while a request is already loading: the generate
    /// control is disabled in that state.
    pub fn trigger(&mut self) -> Option<RequestId> {
        if self.is_loading() {
            debug!("generate ignored: request {} still loading", RequestId(self.last_issued));
            return None;
        }
        self.last_issued += 1;
        self.view = ViewState::Loading;
        let id = RequestId(self.last_issued);
        debug!("request {} started", id);
        Some(id)
    }

    /// Apply the outcome of request `id`.
    ///
    /// Returns `false` (and leaves the state alone) when `id` is not the
    /// latest request or nothing is loading.
    pub fn resolve(&mut self, id: RequestId, outcome: Result<GeneratedDocument>) -> bool {
        if id.0 != self.last_issued || !self.is_loading() {
            warn!(
                "discarding stale outcome of request {} (latest {}, view {})",
                id,
                RequestId(self.last_issued),
                self.view.name()
            );
            return false;
        }
        self.view = match outcome {
            Ok(doc) => {
                debug!("request {} succeeded", id);
                ViewState::Success(ResultView::new(doc))
            }
            Err(err) => {
                debug!("request {} failed: {}", id, err);
                ViewState::Error(user_message(&err))
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{classify_failure, GENERATION_FAILED_MESSAGE, QUOTA_EXCEEDED_MESSAGE};
    use crate::document::{IllustrationIdeas, Poem, Slogans, TextSection};

    fn doc(title: &str) -> GeneratedDocument {
        let section = || TextSection { title: "t".into(), content: "c".into() };
        GeneratedDocument {
            main_title: title.into(),
            subtitle: "s".into(),
            introduction: section(),
            main_article: section(),
            poem: Poem { title: "p".into(), author: "a".into(), content: vec![] },
            slogans: Slogans { title: "s".into(), items: vec![] },
            knowledge_corner: section(),
            illustration_ideas: IllustrationIdeas { title: "i".into(), items: vec![] },
        }
    }

    #[test]
    fn starts_idle() {
        let state = AppState::new();
        assert!(matches!(state.view(), ViewState::Idle));
        assert_eq!(state.view().name(), "empty");
    }

    #[test]
    fn trigger_while_loading_is_ignored() {
        let mut state = AppState::new();
        let first = state.trigger().expect("first trigger");
        assert!(state.trigger().is_none());
        assert!(state.resolve(first, Ok(doc("强国有我"))));
        assert_eq!(state.document().unwrap().main_title, "强国有我");
    }

    #[test]
    fn trigger_clears_previous_result() {
        let mut state = AppState::new();
        let id = state.trigger().unwrap();
        state.resolve(id, Err(classify_failure("network error")));
        assert!(matches!(state.view(), ViewState::Error(m) if m == GENERATION_FAILED_MESSAGE));

        state.trigger().unwrap();
        assert!(state.is_loading());
        assert!(state.document().is_none());
    }

    #[test]
    fn quota_failure_shows_quota_message() {
        let mut state = AppState::new();
        let id = state.trigger().unwrap();
        state.resolve(id, Err(classify_failure("429 rate limit")));
        assert!(matches!(state.view(), ViewState::Error(m) if m == QUOTA_EXCEEDED_MESSAGE));
    }

    #[test]
    fn stale_outcome_is_discarded() {
        let mut state = AppState::new();
        let old = state.trigger().unwrap();
        state.resolve(old, Ok(doc("old")));
        let new = state.trigger().unwrap();
        assert!(new > old);

        assert!(!state.resolve(old, Ok(doc("stale"))));
        assert!(state.is_loading());

        assert!(state.resolve(new, Ok(doc("new"))));
        assert!(!state.resolve(new, Ok(doc("again"))));
        assert_eq!(state.document().unwrap().main_title, "new");
    }
}
