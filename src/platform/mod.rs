//! Host surfaces the exporter talks to: file downloads and user alerts
//!
//! Both are traits so the exporter can run against the filesystem and a
//! terminal in the binary, and against in-memory recorders in tests.

pub mod alert;
pub mod download;

pub use alert::{LogNotifier, Notifier, RecordingNotifier};
pub use download::{DownloadSink, FsDownloads, MemoryDownloads, SavedDownload};
