//! Application controller tying the state machine, views and export together.

use crate::export::Exporter;
use crate::state::{AppState, RequestId, ViewState};
use crate::view::render_page;
use crate::{ContentService, GeneratedDocument, Result};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Debug)]
pub struct App {
    state: AppState,
    exporter: Exporter,
}

impl App {
    pub fn new(exporter: Exporter) -> Self {
        App { state: AppState::new(), exporter }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &ViewState {
        self.state.view()
    }

    /// See [`AppState::trigger`].
    pub fn trigger(&mut self) -> Option<RequestId> {
        self.state.trigger()
    }

    /// See [`AppState::resolve`].
    pub fn resolve(&mut self, id: RequestId, outcome: Result<GeneratedDocument>) -> bool {
        self.state.resolve(id, outcome)
    }

    /// Run one generation synchronously: trigger, call the service, resolve.
    pub fn generate_with(&mut self, service: &dyn ContentService) -> &ViewState {
        if let Some(id) = self.trigger() {
            info!("generating tabloid (request {})", id);
            let outcome = service.generate();
            self.resolve(id, outcome);
        }
        self.state.view()
    }

    /// Export the current result.
    ///
    /// `Ok(None)` when there is no result to export or an export is already
    /// running.
    pub fn download(&mut self) -> Result<Option<PathBuf>> {
        match self.state.view_mut() {
            ViewState::Success(result) => {
                let base = result.document().main_title.clone();
                self.exporter.export(result, &base)
            }
            other => {
                debug!("download ignored in {} view", other.name());
                Ok(None)
            }
        }
    }

    pub fn render_page(&self) -> String {
        render_page(self.state.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{classify_failure, QUOTA_EXCEEDED_MESSAGE};
    use crate::export::Capture;
    use crate::platform::{MemoryDownloads, RecordingNotifier};
    use crate::rendering::Screenshot;
    use crate::view::ResultView;
    use crate::Error;

    struct Fixed(fn() -> Result<GeneratedDocument>);

    impl ContentService for Fixed {
        fn generate(&self) -> Result<GeneratedDocument> {
            (self.0)()
        }
    }

    struct TinyCapture;

    impl Capture for TinyCapture {
        fn capture(&self, _view: &ResultView) -> Result<Screenshot> {
            Ok(Screenshot { width: 1, height: 1, png_data: vec![7] })
        }
    }

    fn sample() -> Result<GeneratedDocument> {
        let json = include_str!("../tests/fixtures/document.json");
        Ok(GeneratedDocument::from_json(json).unwrap())
    }

    fn app(downloads: &MemoryDownloads) -> App {
        App::new(Exporter::new(TinyCapture, downloads.clone(), RecordingNotifier::new()))
    }

    #[test]
    fn generate_then_download() {
        let downloads = MemoryDownloads::new();
        let mut app = app(&downloads);
        assert_eq!(app.generate_with(&Fixed(sample)).name(), "result");

        let path = app.download().unwrap().unwrap();
        assert_eq!(path, PathBuf::from("强国有我-手抄报.png"));
        assert_eq!(downloads.saved()[0].data_url, "data:image/png;base64,Bw==");
    }

    #[test]
    fn failure_shows_message() {
        let downloads = MemoryDownloads::new();
        let mut app = app(&downloads);
        app.generate_with(&Fixed(|| Err(classify_failure("HTTP 429 Too Many Requests"))));
        match app.view() {
            ViewState::Error(msg) => assert_eq!(msg, QUOTA_EXCEEDED_MESSAGE),
            other => panic!("unexpected view {}", other.name()),
        }
        assert!(app.render_page().contains(QUOTA_EXCEEDED_MESSAGE));
    }

    #[test]
    fn download_without_result_is_a_noop() {
        let downloads = MemoryDownloads::new();
        let mut app = app(&downloads);
        assert!(app.download().unwrap().is_none());
        app.generate_with(&Fixed(|| Err(Error::Other(String::new()))));
        assert!(app.download().unwrap().is_none());
        assert!(downloads.saved().is_empty());
    }
}
