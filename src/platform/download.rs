//! Download sinks: where an exported data URL ends up

use crate::rendering::decode_data_url;
use crate::{Error, Result};
use log::info;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub trait DownloadSink: Send + Sync {
    /// Store the payload of `data_url` under `file_name`, returning where it went.
    fn save(&self, data_url: &str, file_name: &str) -> Result<PathBuf>;
}

/// Writes downloads into a directory, creating it on first use
#[derive(Debug, Clone)]
pub struct FsDownloads {
    dir: PathBuf,
}

impl FsDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsDownloads { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl DownloadSink for FsDownloads {
    fn save(&self, data_url: &str, file_name: &str) -> Result<PathBuf> {
        let bytes = decode_data_url(data_url)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::ExportError(format!("cannot create {}: {}", self.dir.display(), e)))?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, &bytes)
            .map_err(|e| Error::ExportError(format!("cannot write {}: {}", path.display(), e)))?;
        info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// A download captured by [`MemoryDownloads`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedDownload {
    pub file_name: String,
    pub data_url: String,
}

/// Keeps downloads in memory; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct MemoryDownloads {
    saved: Arc<Mutex<Vec<SavedDownload>>>,
}

impl MemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<SavedDownload> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DownloadSink for MemoryDownloads {
    fn save(&self, data_url: &str, file_name: &str) -> Result<PathBuf> {
        let mut g = self.saved.lock().unwrap_or_else(|e| e.into_inner());
        g.push(SavedDownload { file_name: file_name.to_string(), data_url: data_url.to_string() });
        Ok(PathBuf::from(file_name))
    }
}
