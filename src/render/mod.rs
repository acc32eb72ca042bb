//! Document rendering.
//!
//! The engine that turns a static subtree into a PDF sits behind the
//! [`Renderer`] trait. [`CommandRenderer`] drives an external program.

pub mod command;
pub mod options;

use std::time::Duration;

use async_trait::async_trait;
use kuchiki::NodeRef;
use thiserror::Error;

pub use command::CommandRenderer;
pub use options::RenderOptions;

/// Errors a renderer can reject with.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write render source: {0}")]
    WriteSource(#[source] std::io::Error),
    #[error("failed to encode render options: {0}")]
    Options(#[source] serde_json::Error),
    #[error("renderer could not be started: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("renderer exited with status {0}")]
    Exit(i32),
    #[error("failed to read rendered document: {0}")]
    ReadOutput(#[source] std::io::Error),
    #[error("renderer produced an empty document")]
    EmptyOutput,
    #[error("renderer did not finish within {0:?}")]
    TimedOut(Duration),
    /// Rejection reported by an in-process engine that is not a command,
    /// for [`Renderer`] implementations outside this crate.
    #[error("renderer failed: {0}")]
    Engine(String),
}

/// Binary document content with its media type.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl Blob {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// Media type guessed from the filename extension.
    pub fn for_filename(bytes: Vec<u8>, filename: &str) -> Self {
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        Self::new(bytes, mime.essence_str())
    }

    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "application/pdf")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turns a static subtree into a binary document.
///
/// The subtree is only read. Rejection triggers the fatal fallback path.
#[async_trait(?Send)]
pub trait Renderer {
    async fn render(&self, root: &NodeRef, options: &RenderOptions) -> Result<Blob, RenderError>;
}
