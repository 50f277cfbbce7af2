//! Image export of a result view.
//!
//! An export hides and disables the download control, captures the view,
//! and hands the PNG to a [`DownloadSink`] as a data URL. Failures are
//! logged and surfaced through the [`Notifier`]; the view is left as it was.

use crate::error::EXPORT_FAILED_MESSAGE;
use crate::platform::{DownloadSink, FsDownloads, LogNotifier, Notifier};
use crate::rendering::{render_png, Screenshot};
use crate::view::ResultView;
use crate::{Error, ExportConfig, Result};
use log::{debug, error, info};
use std::ops::Deref;
use std::path::PathBuf;

/// Suffix appended to the document title to form the download name
pub const FILE_NAME_SUFFIX: &str = "-手抄报.png";

/// Produces an image of a result view.
pub trait Capture: Send + Sync {
    fn capture(&self, view: &ResultView) -> Result<Screenshot>;
}

/// Default capture: layout, paint and raster in-process.
#[derive(Debug, Clone, Default)]
pub struct RasterCapture {
    config: ExportConfig,
}

impl RasterCapture {
    pub fn new(config: ExportConfig) -> Self {
        RasterCapture { config }
    }
}

impl Capture for RasterCapture {
    fn capture(&self, view: &ResultView) -> Result<Screenshot> {
        render_png(view, &self.config)
    }
}

/// Download name for a document titled `base`.
///
/// Path separators, characters reserved on common filesystems and control
/// characters are replaced by `_`.
pub fn file_name(base: &str) -> String {
    let clean: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}{}", clean, FILE_NAME_SUFFIX)
}

/// Marks the download control busy for as long as it lives.
struct Busy<'a> {
    view: &'a mut ResultView,
}

impl<'a> Busy<'a> {
    fn enter(view: &'a mut ResultView) -> Self {
        view.download.hidden = true;
        view.download.disabled = true;
        Busy { view }
    }
}

impl Deref for Busy<'_> {
    type Target = ResultView;

    fn deref(&self) -> &ResultView {
        &*self.view
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.view.download.hidden = false;
        self.view.download.disabled = false;
    }
}

pub struct Exporter {
    capture: Box<dyn Capture>,
    sink: Box<dyn DownloadSink>,
    notifier: Box<dyn Notifier>,
}

impl Exporter {
    pub fn new(
        capture: impl Capture + 'static,
        sink: impl DownloadSink + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Exporter {
            capture: Box::new(capture),
            sink: Box::new(sink),
            notifier: Box::new(notifier),
        }
    }

    /// Raster capture saved into `dir`, alerts logged.
    pub fn to_directory(config: ExportConfig, dir: impl Into<PathBuf>) -> Self {
        Self::new(RasterCapture::new(config), FsDownloads::new(dir), LogNotifier)
    }

    pub fn with_capture(mut self, capture: impl Capture + 'static) -> Self {
        self.capture = Box::new(capture);
        self
    }

    pub fn with_sink(mut self, sink: impl DownloadSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Export `view` as `{base}-手抄报.png`.
    ///
    /// Returns `Ok(None)` without doing anything when the control is
    /// already disabled. The control is hidden during capture and restored
    /// afterwards whatever the outcome.
    pub fn export(&self, view: &mut ResultView, base: &str) -> Result<Option<PathBuf>> {
        if view.download.disabled {
            debug!("export ignored: another export is running");
            return Ok(None);
        }
        let name = file_name(base);
        let busy = Busy::enter(view);
        let outcome = self.capture.capture(&busy).and_then(|shot| {
            info!(
                "captured {}x{} image for {} (sha256 {})",
                shot.width,
                shot.height,
                name,
                shot.digest()
            );
            self.sink.save(&shot.to_data_url(), &name)
        });
        drop(busy);

        match outcome {
            Ok(path) => Ok(Some(path)),
            Err(err) => {
                error!("export of {} failed: {}", name, err);
                self.notifier.alert(EXPORT_FAILED_MESSAGE);
                Err(match err {
                    Error::ExportError(_) => err,
                    other => Error::ExportError(other.to_string()),
                })
            }
        }
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_keeps_title_and_replaces_separators() {
        assert_eq!(file_name("强国有我"), "强国有我-手抄报.png");
        assert_eq!(file_name("a/b\\c:d?"), "a_b_c_d_-手抄报.png");
        assert_eq!(file_name("line\nbreak"), "line_break-手抄报.png");
        assert_eq!(file_name(""), "-手抄报.png");
    }
}
