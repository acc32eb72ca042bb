//! Handing the generated document to the submitter.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::Blob;

const FALLBACK_FILENAME: &str = "document.pdf";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to create download directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("failed to write downloaded file: {0}")]
    Write(#[source] std::io::Error),
}

/// Somewhere a finished document can be delivered to.
pub trait Downloader {
    fn save(&self, filename: &str, blob: &Blob) -> Result<PathBuf, DownloadError>;
}

/// A one-shot reference to a document, activated once and then gone.
pub struct DownloadLink<'a> {
    filename: &'a str,
    blob: &'a Blob,
}

impl<'a> DownloadLink<'a> {
    pub fn new(filename: &'a str, blob: &'a Blob) -> Self {
        Self { filename, blob }
    }

    /// Deliver the document. Failures are logged and otherwise ignored.
    pub fn activate(self, downloader: &dyn Downloader) -> Option<PathBuf> {
        match downloader.save(self.filename, self.blob) {
            Ok(path) => {
                log::info!("Downloaded {} ({} bytes)", path.display(), self.blob.len());
                Some(path)
            }
            Err(e) => {
                log::error!("Failed to download {}: {}", self.filename, e);
                None
            }
        }
    }
}

/// Writes documents into a local directory.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    dir: PathBuf,
}

impl FileDownloader {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for FileDownloader {
    fn save(&self, filename: &str, blob: &Blob) -> Result<PathBuf, DownloadError> {
        fs::create_dir_all(&self.dir).map_err(DownloadError::CreateDir)?;

        let mut safe_name = sanitize_filename::sanitize(filename);
        if safe_name.is_empty() {
            safe_name = FALLBACK_FILENAME.to_string();
        }
        let path = self.dir.join(safe_name);
        fs::write(&path, &blob.bytes).map_err(DownloadError::Write)?;
        Ok(path)
    }
}
