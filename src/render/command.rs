//! External-program renderer.
//!
//! Writes the static subtree and its options into a temporary directory,
//! invokes the configured program, and reads the PDF it leaves behind.

use std::path::Path;

use async_trait::async_trait;
use kuchiki::NodeRef;
use tempfile::tempdir;
use tokio::process::Command;

use super::{Blob, RenderError, RenderOptions, Renderer};

const SOURCE_FILE: &str = "snapshot.html";
const OPTIONS_FILE: &str = "options.json";
const OUTPUT_FILE: &str = "output.pdf";

/// Runs `<program> [args..] snapshot.html options.json output.pdf`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait(?Send)]
impl Renderer for CommandRenderer {
    async fn render(&self, root: &NodeRef, options: &RenderOptions) -> Result<Blob, RenderError> {
        // Serialize before the first await; the tree must not change under us.
        let source = standalone_html(root);
        let options_json = serde_json::to_vec_pretty(options).map_err(RenderError::Options)?;

        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        let source_path = temp_dir.path().join(SOURCE_FILE);
        let options_path = temp_dir.path().join(OPTIONS_FILE);
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        tokio::fs::write(&source_path, source)
            .await
            .map_err(RenderError::WriteSource)?;
        tokio::fs::write(&options_path, options_json)
            .await
            .map_err(RenderError::WriteSource)?;

        log::debug!("Rendering {} with {}", options.filename, self.program);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&source_path)
            .arg(&options_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(RenderError::Spawn)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(RenderError::Exit(code));
        }

        read_output(&output_path, &options.filename).await
    }
}

async fn read_output(path: &Path, filename: &str) -> Result<Blob, RenderError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(RenderError::ReadOutput)?;
    if bytes.is_empty() {
        return Err(RenderError::EmptyOutput);
    }
    Ok(Blob::for_filename(bytes, filename))
}

/// Wrap the subtree in a minimal page so the engine sees a full document.
fn standalone_html(root: &NodeRef) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head><body>{}</body></html>\n",
        root.to_string()
    )
}
